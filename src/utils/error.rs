//! Error handling utilities for the gateway.
//!
//! This module provides a structured approach to error handling with context and metadata.
//! The primary type is [`ErrorContext`], which wraps errors with additional information
//! such as timestamps, trace IDs, and custom metadata.
//!
//! # Examples
//!
//! ```
//! use ecostellar_gateway::utils::ErrorContext;
//!
//! // Create a basic error context
//! let error = ErrorContext::new("Failed to submit transaction", None, None);
//!
//! // Add metadata to provide more context
//! let error_with_metadata = ErrorContext::new("Simulation rejected call", None, None)
//! 	.with_metadata("method", "mint")
//! 	.with_metadata("stage", "SIMULATING");
//!
//! // Get formatted error message with metadata
//! let message = error_with_metadata.format_with_metadata();
//! assert_eq!(message, "Simulation rejected call [method=mint, stage=SIMULATING]");
//! ```

use chrono::Utc;
use std::{collections::HashMap, fmt};
use uuid::Uuid;

/// Boxed error type used as the source of an [`ErrorContext`]
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A context wrapper for errors with additional metadata.
///
/// `ErrorContext` provides a way to enrich errors with contextual information,
/// making them more useful for debugging and logging. Each error context includes:
///
/// - A descriptive message
/// - An optional source error
/// - Optional key-value metadata
/// - A timestamp (automatically generated)
/// - A unique trace ID (automatically generated)
#[derive(Debug)]
pub struct ErrorContext {
	/// The error message
	pub message: String,
	/// The source error that caused this error
	pub source: Option<BoxedSource>,
	/// Additional metadata about the error
	pub metadata: Option<HashMap<String, String>>,
	/// The timestamp of the error in RFC 3339 format
	pub timestamp: String,
	/// The unique identifier for the error (UUID v4)
	pub trace_id: String,
}

impl ErrorContext {
	/// Creates a new error context with the given message, source, and metadata.
	///
	/// # Arguments
	///
	/// * `message` - A descriptive error message
	/// * `source` - An optional source error that caused this error
	/// * `metadata` - Optional key-value pairs providing additional context
	///
	/// # Returns
	///
	/// A new `ErrorContext` instance with automatically generated timestamp and trace ID.
	pub fn new(
		message: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self {
			message: message.into(),
			source,
			metadata,
			timestamp: Utc::now().to_rfc3339(),
			trace_id: Uuid::new_v4().to_string(),
		}
	}

	/// Creates a new error context carrying a source error.
	pub fn with_source(
		message: impl Into<String>,
		source: impl std::error::Error + Send + Sync + 'static,
	) -> Self {
		Self::new(message, Some(Box::new(source)), None)
	}

	/// Adds a single key-value metadata pair to the error context.
	///
	/// This method creates the metadata HashMap if it doesn't already exist.
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		let metadata = self.metadata.get_or_insert_with(HashMap::new);
		metadata.insert(key.into(), value.into());
		self
	}

	/// Looks up a metadata value by key.
	pub fn metadata_value(&self, key: &str) -> Option<&str> {
		self.metadata
			.as_ref()
			.and_then(|metadata| metadata.get(key))
			.map(String::as_str)
	}

	/// Formats the error message with its metadata appended in a readable format.
	///
	/// The format is: `"message [key1=value1, key2=value2, ...]"`.
	/// Metadata keys are sorted alphabetically for consistent output.
	pub fn format_with_metadata(&self) -> String {
		let mut result = self.message.clone();

		if let Some(metadata) = &self.metadata {
			if !metadata.is_empty() {
				let mut keys: Vec<_> = metadata.keys().collect();
				keys.sort();

				let parts: Vec<String> = keys
					.into_iter()
					.filter_map(|key| metadata.get(key).map(|value| format!("{}={}", key, value)))
					.collect();

				if !parts.is_empty() {
					result.push_str(&format!(" [{}]", parts.join(", ")));
				}
			}
		}

		result
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.source {
			Some(source) => write!(f, "{} ({})", self.message, source),
			None => write!(f, "{}", self.message),
		}
	}
}

impl std::error::Error for ErrorContext {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_ref()
			.map(|source| source.as_ref() as &(dyn std::error::Error + 'static))
	}
}

/// Formats the complete error chain of an `anyhow::Error`
pub fn format_error_chain(err: &anyhow::Error) -> String {
	let mut result = err.to_string();
	let mut source = err.source();

	while let Some(err) = source {
		result.push_str(&format!("\n  Caused by: {}", err));
		source = err.source();
	}

	result
}
