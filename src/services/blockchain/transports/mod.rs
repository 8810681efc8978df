//! Network transport implementations for blockchain clients.
//!
//! Provides the JSON-RPC transport used to reach Soroban RPC nodes:
//! - Generic transport traits for custom request handling and endpoint rotation
//! - `EndpointManager` for sending requests and rotating to fallback URLs
//! - `SorobanTransportClient`, the HTTP transport for Soroban RPC

mod endpoint_manager;
mod stellar {
	pub mod soroban;
}

pub use endpoint_manager::EndpointManager;
pub use stellar::soroban::SorobanTransportClient;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::services::blockchain::BlockChainError;

/// HTTP status codes that trigger RPC endpoint rotation
/// - 429: Too Many Requests - indicates rate limiting from the current endpoint
pub const ROTATE_ON_ERROR_CODES: [u16; 1] = [429];

/// Base trait for all blockchain transport clients
#[async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the current URL being used by the transport
	async fn get_current_url(&self) -> String;

	/// Send a raw request to the blockchain
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, BlockChainError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Customizes the request body for the transport. Defaults to a JSON-RPC 2.0 envelope.
	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let mut body = json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method
		});
		// JSON-RPC 2.0 allows omitting params but not sending null
		if let Some(params) = params {
			body["params"] = params.into();
		}
		body
	}
}

/// Extension trait for transports that support URL rotation
#[async_trait]
pub trait RotatingTransport: BlockchainTransport {
	/// Attempts to establish a connection with a new URL
	async fn try_connect(&self, url: &str) -> Result<(), BlockChainError>;

	/// Updates the client with a new URL
	async fn update_client(&self, url: &str) -> Result<(), BlockChainError>;
}
