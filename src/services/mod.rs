//! Core services implementing the gateway's business logic.
//!
//! - `blockchain`: Soroban RPC client and transport
//! - `gateway`: contract invocation gateway with mock-mode fallback

pub mod blockchain;
pub mod gateway;
