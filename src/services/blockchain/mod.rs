//! Blockchain service implementations for Soroban RPC access.
//!
//! This module provides the client and transport used to talk to Soroban RPC nodes:
//! - JSON-RPC transport with endpoint rotation on rate limiting
//! - Typed RPC client implementing [`SorobanRpc`]
//! - Error type shared by both layers

mod clients;
mod error;
mod transports;

pub use clients::{SorobanRpc, StellarClient};
pub use error::BlockChainError;
pub use transports::{
	BlockchainTransport, EndpointManager, RotatingTransport, SorobanTransportClient,
	ROTATE_ON_ERROR_CODES,
};
