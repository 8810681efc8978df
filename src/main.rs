//! EcoStellar gateway entry point.
//!
//! This binary loads the gateway configuration, initializes the contract gateway and,
//! when asked, serves Prometheus metrics and a health endpoint until interrupted.
//!
//! The service follows these main steps:
//! 1. Loads `.env` and the process environment
//! 2. Sets up logging
//! 3. Builds and initializes the gateway (mock mode when contracts are not configured)
//! 4. With `--check`, verifies the RPC node serves the configured network and exits
//! 5. Otherwise serves `/metrics` and `/health` (with `--metrics`) until Ctrl+C

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{error, info};

use ecostellar_gateway::{
	bootstrap::{initialize_gateway, verify_network},
	models::GatewayConfig,
	utils::{format_error_chain, logging::setup_logging, metrics::server::create_metrics_server},
};

#[derive(Parser, Debug)]
#[command(name = "ecostellar-gateway", version, about)]
struct Cli {
	/// Serve Prometheus metrics and the health endpoint
	#[arg(long)]
	metrics: bool,

	/// Address the metrics server binds to
	#[arg(long, default_value = "127.0.0.1:8081")]
	metrics_address: String,

	/// Verify configuration and RPC connectivity, then exit
	#[arg(long)]
	check: bool,
}

#[tokio::main]
async fn main() {
	let _ = dotenvy::dotenv();
	let _guard = setup_logging();

	if let Err(e) = run(Cli::parse()).await {
		error!("{}", format_error_chain(&e));
		std::process::exit(1);
	}
}

async fn run(cli: Cli) -> Result<()> {
	let config = GatewayConfig::from_env().context("Invalid gateway configuration")?;
	let gateway = initialize_gateway(config)
		.await
		.map_err(|e| anyhow!("Failed to initialize gateway: {}", e))?;

	if cli.check {
		if gateway.is_mock_mode() {
			info!("Mock mode: no RPC connectivity to check");
		} else {
			let network = verify_network(gateway.rpc(), gateway.config().network)
				.await
				.context("RPC network check failed")?;
			info!(
				passphrase = %network.passphrase,
				protocol = ?network.protocol_version,
				"RPC network verified"
			);
		}
		println!("{}", serde_json::to_string_pretty(&gateway.config_summary())?);
		return Ok(());
	}

	if cli.metrics {
		let server = create_metrics_server(cli.metrics_address, gateway.health_state())
			.context("Failed to start metrics server")?;
		let handle = server.handle();

		info!("Service started. Press Ctrl+C to shutdown");
		tokio::select! {
			result = server => {
				result.context("Metrics server stopped unexpectedly")?;
			}
			_ = tokio::signal::ctrl_c() => {
				info!("Shutdown signal received, stopping metrics server...");
				handle.stop(true).await;
			}
		}
	} else {
		info!("Service started. Press Ctrl+C to shutdown");
		tokio::signal::ctrl_c()
			.await
			.context("Failed to listen for shutdown signal")?;
	}

	info!("Shutdown complete");
	Ok(())
}
