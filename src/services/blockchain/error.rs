//! Blockchain error types and handling.
//!
//! This module provides the error type for Soroban RPC operations, covering network
//! connectivity, request processing and transaction encoding failures.

use std::collections::HashMap;
use thiserror::Error as ThisError;

use crate::utils::{BoxedSource, ErrorContext};

/// Represents possible errors that can occur during blockchain operations
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	#[error("Connection error: {0}")]
	ConnectionError(Box<ErrorContext>),

	/// Errors related to malformed requests or invalid responses
	#[error("Request error: {0}")]
	RequestError(Box<ErrorContext>),

	/// Errors related to transaction construction or encoding
	#[error("Transaction error: {0}")]
	TransactionError(Box<ErrorContext>),

	/// Internal errors within the blockchain client
	#[error("Internal error: {0}")]
	InternalError(Box<ErrorContext>),
}

impl BlockChainError {
	/// Creates a new connection error
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(Box::new(ErrorContext::new(msg, source, metadata)))
	}

	/// Creates a new request error
	pub fn request_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(Box::new(ErrorContext::new(msg, source, metadata)))
	}

	/// Creates a new transaction error
	pub fn transaction_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::TransactionError(Box::new(ErrorContext::new(msg, source, metadata)))
	}

	/// Creates a new internal error
	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(Box::new(ErrorContext::new(msg, source, metadata)))
	}

	/// Returns the error context
	pub fn context(&self) -> &ErrorContext {
		match self {
			Self::ConnectionError(ctx)
			| Self::RequestError(ctx)
			| Self::TransactionError(ctx)
			| Self::InternalError(ctx) => ctx,
		}
	}

	/// Returns the trace id of the error
	pub fn trace_id(&self) -> &str {
		&self.context().trace_id
	}
}
