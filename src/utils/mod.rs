//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - error: Custom error type for more structured error handling
//! - logging: Tracing subscriber setup
//! - metrics: Prometheus registry and the metrics/health HTTP server

mod error;
pub mod logging;
pub mod metrics;

pub use error::*;
