//! Soroban RPC client implementation.
//!
//! This module provides typed access to the Soroban JSON-RPC methods the gateway needs:
//! health and network probes, operator account loading, transaction simulation,
//! submission and status lookup.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use stellar_strkey::ed25519::PublicKey as StrkeyPublicKey;
use stellar_xdr::curr::{
	AccountId, LedgerEntryData, LedgerKey, LedgerKeyAccount, Limits, PublicKey, ReadXdr,
	Uint256, WriteXdr,
};
use tracing::instrument;

use crate::{
	models::{
		GetHealthResponse, GetLedgerEntriesResponse, GetNetworkResponse, GetTransactionResponse,
		SendTransactionResponse, SimulateTransactionResponse,
	},
	services::blockchain::{
		transports::{BlockchainTransport, SorobanTransportClient},
		BlockChainError,
	},
};

/// Typed Soroban RPC operations used by the contract gateway
#[async_trait]
pub trait SorobanRpc: Send + Sync {
	/// Calls `getHealth`
	async fn get_health(&self) -> Result<GetHealthResponse, BlockChainError>;

	/// Calls `getNetwork`
	async fn get_network(&self) -> Result<GetNetworkResponse, BlockChainError>;

	/// Loads the current sequence number of an account
	///
	/// # Arguments
	/// * `account_id` - Account address (`G…`)
	///
	/// # Returns
	/// * `Result<i64, BlockChainError>` - Current sequence number or error
	async fn get_account_sequence(&self, account_id: &str) -> Result<i64, BlockChainError>;

	/// Simulates a base64 transaction envelope
	async fn simulate_transaction(
		&self,
		envelope_xdr: &str,
	) -> Result<SimulateTransactionResponse, BlockChainError>;

	/// Submits a signed base64 transaction envelope
	async fn send_transaction(
		&self,
		envelope_xdr: &str,
	) -> Result<SendTransactionResponse, BlockChainError>;

	/// Looks up a transaction by hash
	async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, BlockChainError>;
}

/// Client for Soroban RPC nodes
///
/// Generic over the transport so tests can substitute it.
#[derive(Clone)]
pub struct StellarClient<T: Send + Sync + Clone> {
	/// The underlying transport for RPC communication
	transport: T,
}

impl<T: Send + Sync + Clone> StellarClient<T> {
	/// Creates a new Stellar client instance with a specific transport client
	pub fn new_with_transport(transport: T) -> Self {
		Self { transport }
	}
}

impl StellarClient<SorobanTransportClient> {
	/// Creates a new Stellar client instance
	///
	/// # Arguments
	/// * `rpc_url` - Primary RPC endpoint
	/// * `fallback_urls` - Endpoints to rotate to when rate limited
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - New client instance or error
	pub fn new(rpc_url: &str, fallback_urls: Vec<String>) -> Result<Self, BlockChainError> {
		let transport = SorobanTransportClient::new(rpc_url, fallback_urls)?;
		Ok(Self::new_with_transport(transport))
	}
}

impl<T: Send + Sync + Clone + BlockchainTransport> StellarClient<T> {
	/// Sends a JSON-RPC request and deserializes its `result`
	async fn call<R: DeserializeOwned>(
		&self,
		method: &str,
		params: Option<Value>,
	) -> Result<R, BlockChainError> {
		let response = self.transport.send_raw_request(method, params).await?;
		extract_result(method, response)
	}
}

/// Extracts the `result` member of a JSON-RPC response.
///
/// A JSON-RPC `error` member becomes a `RequestError` carrying the RPC code and message.
fn extract_result<R: DeserializeOwned>(method: &str, response: Value) -> Result<R, BlockChainError> {
	let metadata = HashMap::from([("method".to_string(), method.to_string())]);

	if let Some(error) = response.get("error") {
		let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
		let message = error
			.get("message")
			.and_then(Value::as_str)
			.unwrap_or("unknown error");
		return Err(BlockChainError::request_error(
			format!("RPC error {}: {}", code, message),
			None,
			Some(metadata),
		));
	}

	let result = response.get("result").cloned().ok_or_else(|| {
		BlockChainError::request_error("Missing 'result' field", None, Some(metadata.clone()))
	})?;

	serde_json::from_value(result).map_err(|e| {
		BlockChainError::request_error(
			format!("Failed to parse {} response", method),
			Some(Box::new(e)),
			Some(metadata),
		)
	})
}

/// Builds the base64 ledger key of an account
fn account_ledger_key(account_id: &str) -> Result<String, BlockChainError> {
	let key = StrkeyPublicKey::from_string(account_id).map_err(|e| {
		BlockChainError::internal_error(
			"Invalid account id",
			Some(Box::new(e)),
			Some(HashMap::from([("account".to_string(), account_id.to_string())])),
		)
	})?;

	LedgerKey::Account(LedgerKeyAccount {
		account_id: AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(key.0))),
	})
	.to_xdr_base64(Limits::none())
	.map_err(|e| {
		BlockChainError::internal_error("Failed to encode ledger key", Some(Box::new(e)), None)
	})
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> SorobanRpc for StellarClient<T> {
	#[instrument(skip(self))]
	async fn get_health(&self) -> Result<GetHealthResponse, BlockChainError> {
		self.call("getHealth", None).await
	}

	#[instrument(skip(self))]
	async fn get_network(&self) -> Result<GetNetworkResponse, BlockChainError> {
		self.call("getNetwork", None).await
	}

	#[instrument(skip(self))]
	async fn get_account_sequence(&self, account_id: &str) -> Result<i64, BlockChainError> {
		let key = account_ledger_key(account_id)?;
		let response: GetLedgerEntriesResponse = self
			.call("getLedgerEntries", Some(json!({ "keys": [key] })))
			.await?;

		let metadata = HashMap::from([("account".to_string(), account_id.to_string())]);
		let entry = response
			.entries
			.unwrap_or_default()
			.into_iter()
			.next()
			.ok_or_else(|| {
				BlockChainError::request_error("Account not found", None, Some(metadata.clone()))
			})?;

		match LedgerEntryData::from_xdr_base64(entry.xdr.as_bytes(), Limits::none()) {
			Ok(LedgerEntryData::Account(account)) => Ok(account.seq_num.0),
			Ok(_) => Err(BlockChainError::request_error(
				"Ledger entry is not an account",
				None,
				Some(metadata),
			)),
			Err(e) => Err(BlockChainError::request_error(
				"Failed to decode account entry",
				Some(Box::new(e)),
				Some(metadata),
			)),
		}
	}

	#[instrument(skip(self, envelope_xdr))]
	async fn simulate_transaction(
		&self,
		envelope_xdr: &str,
	) -> Result<SimulateTransactionResponse, BlockChainError> {
		self.call(
			"simulateTransaction",
			Some(json!({ "transaction": envelope_xdr })),
		)
		.await
	}

	#[instrument(skip(self, envelope_xdr))]
	async fn send_transaction(
		&self,
		envelope_xdr: &str,
	) -> Result<SendTransactionResponse, BlockChainError> {
		self.call("sendTransaction", Some(json!({ "transaction": envelope_xdr })))
			.await
	}

	#[instrument(skip(self))]
	async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, BlockChainError> {
		self.call("getTransaction", Some(json!({ "hash": hash })))
			.await
	}
}
