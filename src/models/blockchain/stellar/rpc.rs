//! Soroban JSON-RPC response models.
//!
//! Only the fields the gateway reads are modelled; everything else in the responses is
//! ignored during deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of `getHealth`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHealthResponse {
	pub status: String,
	#[serde(default)]
	pub latest_ledger: Option<u32>,
}

/// Response of `getNetwork`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNetworkResponse {
	pub passphrase: String,
	#[serde(default)]
	pub protocol_version: Option<u32>,
}

/// One entry of a `getLedgerEntries` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryResult {
	pub key: String,
	pub xdr: String,
	#[serde(default)]
	pub last_modified_ledger_seq: Option<u32>,
}

/// Response of `getLedgerEntries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLedgerEntriesResponse {
	#[serde(default)]
	pub entries: Option<Vec<LedgerEntryResult>>,
	pub latest_ledger: u32,
}

/// Host function result inside a simulation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateHostFunctionResult {
	/// Base64 `ScVal` return value
	pub xdr: String,
	/// Base64 `SorobanAuthorizationEntry` values the call requires
	#[serde(default)]
	pub auth: Vec<String>,
}

/// Response of `simulateTransaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTransactionResponse {
	#[serde(default)]
	pub latest_ledger: Option<u32>,
	#[serde(default)]
	pub min_resource_fee: Option<String>,
	/// Base64 `SorobanTransactionData`
	#[serde(default)]
	pub transaction_data: Option<String>,
	#[serde(default)]
	pub results: Option<Vec<SimulateHostFunctionResult>>,
	#[serde(default)]
	pub error: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub restore_preamble: Option<Value>,
}

impl SimulateTransactionResponse {
	/// The first host function result, if the simulation produced one
	pub fn first_result(&self) -> Option<&SimulateHostFunctionResult> {
		self.results.as_ref().and_then(|results| results.first())
	}

	/// True when the simulation reported an error or produced no result
	pub fn is_failure(&self) -> bool {
		self.error.is_some() || self.first_result().is_none()
	}
}

/// Status reported by `sendTransaction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendTransactionStatus {
	Pending,
	Duplicate,
	TryAgainLater,
	Error,
}

/// Response of `sendTransaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
	pub status: SendTransactionStatus,
	pub hash: String,
	#[serde(default)]
	pub latest_ledger: Option<u32>,
	/// Base64 `TransactionResult` when the status is `ERROR`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_result_xdr: Option<String>,
}

/// Status reported by `getTransaction`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
	Success,
	Failed,
	NotFound,
	Pending,
	Other(String),
}

impl TransactionStatus {
	pub fn parse(raw: &str) -> Self {
		match raw {
			"SUCCESS" => Self::Success,
			"FAILED" => Self::Failed,
			"NOT_FOUND" => Self::NotFound,
			"PENDING" => Self::Pending,
			other => Self::Other(other.to_string()),
		}
	}

	/// True while the transaction has not reached a terminal status
	pub fn is_pending(&self) -> bool {
		matches!(self, Self::NotFound | Self::Pending)
	}
}

/// Response of `getTransaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
	pub status: String,
	#[serde(default)]
	pub latest_ledger: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ledger: Option<u32>,
	/// Close time of the ledger; older RPC versions send a string, newer ones a number
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub application_order: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub envelope_xdr: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result_xdr: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result_meta_xdr: Option<String>,
}

impl GetTransactionResponse {
	pub fn status(&self) -> TransactionStatus {
		TransactionStatus::parse(&self.status)
	}
}
