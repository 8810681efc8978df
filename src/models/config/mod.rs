//! Configuration loading and validation.
//!
//! This module provides the gateway configuration and the errors raised while loading it.

mod error;
mod gateway_config;

pub use error::ConfigError;
pub use gateway_config::{
	keys, ContractIds, GatewayConfig, StellarNetwork, DEFAULT_BASE_FEE, DEFAULT_EXPLORER_BASE,
	DEFAULT_MAX_POLL_RETRIES, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RPC_URL, DEFAULT_TX_TIMEOUT_SECS,
};
