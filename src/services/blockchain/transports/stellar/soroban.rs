//! Soroban RPC transport implementation.
//!
//! This module provides the transport used to reach Soroban RPC nodes via JSON-RPC,
//! supporting endpoint rotation and raw request functionality.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use stellar_rpc_client::Client as StellarHttpClient;
use tokio::sync::RwLock;

use crate::services::blockchain::{
	transports::{BlockchainTransport, EndpointManager, RotatingTransport},
	BlockChainError,
};

/// A client for interacting with Soroban RPC endpoints
#[derive(Clone)]
pub struct SorobanTransportClient {
	/// The underlying RPC client, used to probe endpoints during rotation
	pub client: Arc<RwLock<StellarHttpClient>>,
	/// Manages RPC endpoint rotation and request handling
	endpoint_manager: EndpointManager,
}

impl SorobanTransportClient {
	/// Creates a new Soroban transport client.
	///
	/// No request is made here; reachability is checked by the caller (the gateway's
	/// liveness probe) or lazily on the first request.
	///
	/// # Arguments
	/// * `rpc_url` - Primary RPC endpoint
	/// * `fallback_urls` - Endpoints to rotate to when the active one rate limits
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - A new client instance or an error for a malformed URL
	pub fn new(rpc_url: &str, fallback_urls: Vec<String>) -> Result<Self, BlockChainError> {
		let client = StellarHttpClient::new(rpc_url).map_err(|e| {
			BlockChainError::connection_error(
				"Invalid Soroban RPC URL",
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), rpc_url.to_string())])),
			)
		})?;

		let fallback_urls = fallback_urls
			.into_iter()
			.filter(|url| url != rpc_url)
			.collect();

		Ok(Self {
			client: Arc::new(RwLock::new(client)),
			endpoint_manager: EndpointManager::new(rpc_url.to_string(), fallback_urls),
		})
	}
}

#[async_trait]
impl BlockchainTransport for SorobanTransportClient {
	/// Gets the current active URL
	///
	/// # Returns
	/// * `String` - The current active URL
	async fn get_current_url(&self) -> String {
		self.endpoint_manager.active_url.read().await.clone()
	}

	/// Sends a raw JSON-RPC request to the Soroban RPC endpoint
	///
	/// # Arguments
	/// * `method` - The JSON-RPC method to call
	/// * `params` - Parameters to pass to the method
	///
	/// # Returns
	/// * `Result<Value, BlockChainError>` - JSON response or error
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, BlockChainError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.endpoint_manager
			.send_raw_request(self, method, params)
			.await
	}
}

#[async_trait]
impl RotatingTransport for SorobanTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), BlockChainError> {
		let client = StellarHttpClient::new(url).map_err(|e| {
			BlockChainError::connection_error("Invalid URL", Some(Box::new(e)), None)
		})?;

		client.get_network().await.map(|_| ()).map_err(|e| {
			BlockChainError::connection_error(
				"Failed to connect",
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), url.to_string())])),
			)
		})
	}

	async fn update_client(&self, url: &str) -> Result<(), BlockChainError> {
		let new_client = StellarHttpClient::new(url).map_err(|e| {
			BlockChainError::connection_error("Failed to create client", Some(Box::new(e)), None)
		})?;

		let mut client = self.client.write().await;
		*client = new_client;

		Ok(())
	}
}
