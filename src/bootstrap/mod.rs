//! Composition root helpers.
//!
//! Builds the gateway and its RPC client from configuration so `main.rs` and embedding
//! applications wire the same objects. The gateway is handed to route handlers by value
//! (it is cheaply cloneable); there is no global instance.

use std::error::Error;
use tracing::info;

use crate::{
	models::{GatewayConfig, GetNetworkResponse, StellarNetwork},
	services::{
		blockchain::{BlockChainError, SorobanRpc, StellarClient},
		gateway::{ContractGateway, StellarGateway},
	},
};

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Creates a gateway talking to the configured Soroban RPC endpoints.
///
/// No request is made here; call [`ContractGateway::initialize`] before serving traffic.
///
/// # Arguments
/// * `config` - Validated gateway configuration
///
/// # Returns
/// Returns the gateway, or an error when the RPC URL cannot be used
pub fn create_gateway(config: GatewayConfig) -> Result<StellarGateway> {
	let client = StellarClient::new(&config.rpc_url, config.fallback_rpc_urls.clone())?;
	Ok(ContractGateway::new(config, client))
}

/// Creates and initializes a gateway.
///
/// # Errors
/// Returns an error if the RPC URL is unusable or the operator secret does not parse
pub async fn initialize_gateway(config: GatewayConfig) -> Result<StellarGateway> {
	let gateway = create_gateway(config)?;
	let report = gateway.initialize().await?;

	info!(
		network = %report.network,
		mock = report.mock,
		operator = report.admin_public_key.as_deref().unwrap_or("none"),
		"gateway initialized"
	);
	Ok(gateway)
}

/// Confirms the RPC node serves the configured network.
///
/// # Arguments
/// * `rpc` - RPC client to query
/// * `network` - Network the gateway signs for
///
/// # Returns
/// Returns the node's `getNetwork` answer, or a `RequestError` when its passphrase differs
pub async fn verify_network<R: SorobanRpc + ?Sized>(
	rpc: &R,
	network: StellarNetwork,
) -> std::result::Result<GetNetworkResponse, BlockChainError> {
	let response = rpc.get_network().await?;

	if response.passphrase != network.passphrase() {
		return Err(BlockChainError::request_error(
			format!(
				"RPC node serves '{}' but the gateway is configured for {}",
				response.passphrase, network
			),
			None,
			None,
		));
	}

	Ok(response)
}
