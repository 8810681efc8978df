//! Gateway error types and handling.
//!
//! Every gateway operation fails with a [`GatewayError`]: a machine-readable [`ErrorKind`]
//! code, an [`ErrorContext`] and an optional JSON detail payload. Serializing the error
//! produces the standard failure body returned to API callers.

use serde::{ser::SerializeStruct, Serialize, Serializer};
use serde_json::Value;
use std::{collections::HashMap, fmt};
use thiserror::Error as ThisError;

use crate::utils::{BoxedSource, ErrorContext};

/// Failure code of a gateway operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	InitFailed,
	CallFailed,
	SimulationFailed,
	InvokeFailed,
	TxFailed,
	Timeout,
	MintFailed,
	GameRecordFailed,
	NftMintFailed,
	BalanceFailed,
	NftFetchFailed,
	TxFetchFailed,
}

impl ErrorKind {
	/// The wire code, e.g. `SIMULATION_FAILED`
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::InitFailed => "INIT_FAILED",
			Self::CallFailed => "CALL_FAILED",
			Self::SimulationFailed => "SIMULATION_FAILED",
			Self::InvokeFailed => "INVOKE_FAILED",
			Self::TxFailed => "TX_FAILED",
			Self::Timeout => "TIMEOUT",
			Self::MintFailed => "MINT_FAILED",
			Self::GameRecordFailed => "GAME_RECORD_FAILED",
			Self::NftMintFailed => "NFT_MINT_FAILED",
			Self::BalanceFailed => "BALANCE_FAILED",
			Self::NftFetchFailed => "NFT_FETCH_FAILED",
			Self::TxFetchFailed => "TX_FETCH_FAILED",
		}
	}

	/// True for the kinds produced by the query and invocation lifecycle.
	///
	/// Adapters return these unchanged instead of re-labelling them.
	pub fn is_lifecycle(&self) -> bool {
		matches!(
			self,
			Self::SimulationFailed
				| Self::TxFailed
				| Self::Timeout
				| Self::InvokeFailed
				| Self::CallFailed
		)
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned by every gateway operation
#[derive(ThisError, Debug)]
#[error("{kind}: {context}")]
pub struct GatewayError {
	pub kind: ErrorKind,
	pub context: Box<ErrorContext>,
	/// Structured detail such as the simulation diagnostic or the transaction hash
	pub detail: Option<Value>,
}

impl GatewayError {
	/// Creates a new gateway error
	pub fn new(
		kind: ErrorKind,
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self {
			kind,
			context: Box::new(ErrorContext::new(msg, source, metadata)),
			detail: None,
		}
	}

	/// Attaches a detail payload
	pub fn with_detail(mut self, detail: impl Into<Value>) -> Self {
		self.detail = Some(detail.into());
		self
	}

	/// Adds a metadata entry to the error context
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.context
			.metadata
			.get_or_insert_with(HashMap::new)
			.insert(key.into(), value.into());
		self
	}

	/// Keeps lifecycle errors unchanged and re-labels anything else with `kind`.
	///
	/// The original code is preserved in the metadata under `cause`.
	pub fn or_kind(self, kind: ErrorKind) -> Self {
		if self.kind.is_lifecycle() || self.kind == kind {
			self
		} else {
			let cause = self.kind.as_str();
			Self { kind, ..self }.with_metadata("cause", cause)
		}
	}

	pub fn init_failed(msg: impl Into<String>, source: Option<BoxedSource>) -> Self {
		Self::new(ErrorKind::InitFailed, msg, source, None)
	}

	pub fn call_failed(msg: impl Into<String>, source: Option<BoxedSource>) -> Self {
		Self::new(ErrorKind::CallFailed, msg, source, None)
	}

	pub fn simulation_failed(msg: impl Into<String>) -> Self {
		Self::new(ErrorKind::SimulationFailed, msg, None, None)
	}

	pub fn invoke_failed(msg: impl Into<String>, source: Option<BoxedSource>) -> Self {
		Self::new(ErrorKind::InvokeFailed, msg, source, None)
	}

	pub fn tx_failed(msg: impl Into<String>) -> Self {
		Self::new(ErrorKind::TxFailed, msg, None, None)
	}

	pub fn timeout(msg: impl Into<String>) -> Self {
		Self::new(ErrorKind::Timeout, msg, None, None)
	}

	/// The error message
	pub fn message(&self) -> &str {
		&self.context.message
	}

	/// Returns the trace id of the error
	pub fn trace_id(&self) -> &str {
		&self.context.trace_id
	}
}

impl Serialize for GatewayError {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut body = serializer.serialize_struct("GatewayError", 6)?;
		body.serialize_field("success", &false)?;
		body.serialize_field("code", self.kind.as_str())?;
		body.serialize_field("message", &self.context.message)?;
		body.serialize_field("detail", &self.detail)?;
		body.serialize_field("timestamp", &self.context.timestamp)?;
		body.serialize_field("traceId", &self.context.trace_id)?;
		body.end()
	}
}
