//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines specific metrics for the application.

pub mod server;
use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, Gauge, Opts, Registry, TextEncoder};

lazy_static! {
	// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	// Counter Vector for gateway operations, labelled by operation and outcome code.
	pub static ref CONTRACT_CALLS: CounterVec = {
		let counter = CounterVec::new(
			Opts::new("contract_calls_total", "Gateway contract operations by outcome"),
			&["operation", "outcome"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Counter Vector for getTransaction polls, labelled by the status the RPC reported.
	pub static ref TRANSACTION_POLLS: CounterVec = {
		let counter = CounterVec::new(
			Opts::new("transaction_polls_total", "Transaction status polls by reported status"),
			&["status"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Gauge set to 1 when the gateway runs without live contracts.
	pub static ref MOCK_MODE: Gauge = {
		let gauge = Gauge::new("gateway_mock_mode", "1 when the gateway runs in mock mode").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Records the outcome of a gateway operation.
///
/// `outcome` is `ok` for success, otherwise the error code.
pub fn record_contract_call(operation: &str, outcome: &str) {
	CONTRACT_CALLS
		.with_label_values(&[operation, outcome])
		.inc();
}

/// Records a single transaction status poll.
pub fn record_transaction_poll(status: &str) {
	TRANSACTION_POLLS.with_label_values(&[status]).inc();
}

/// Publishes whether the gateway is running in mock mode.
pub fn set_mock_mode(mock: bool) {
	MOCK_MODE.set(if mock { 1.0 } else { 0.0 });
}
