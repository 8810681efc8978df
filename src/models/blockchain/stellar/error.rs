//! Error type for Stellar value conversion.

use thiserror::Error as ThisError;

use crate::utils::{BoxedSource, ErrorContext};

/// Errors raised while converting between gateway values and Stellar XDR
#[derive(ThisError, Debug)]
pub enum StellarValueError {
	/// A string could not be parsed as a Stellar address
	#[error("Invalid address: {0}")]
	InvalidAddress(Box<ErrorContext>),

	/// A value could not be encoded or decoded as XDR
	#[error("XDR conversion error: {0}")]
	XdrError(Box<ErrorContext>),
}

impl StellarValueError {
	pub fn invalid_address(address: &str) -> Self {
		Self::InvalidAddress(Box::new(
			ErrorContext::new(format!("'{}' is not a Stellar address", address), None, None)
				.with_metadata("address", address),
		))
	}

	pub fn xdr_error(msg: impl Into<String>, source: Option<BoxedSource>) -> Self {
		Self::XdrError(Box::new(ErrorContext::new(msg, source, None)))
	}
}
