//! Blockchain client implementations.
//!
//! Contains the Soroban RPC client used by the contract gateway:
//! - `SorobanRpc`, the typed RPC surface the gateway depends on
//! - `StellarClient`, its implementation over a JSON-RPC transport
mod stellar {
	pub mod client;
}

pub use stellar::client::{SorobanRpc, StellarClient};
