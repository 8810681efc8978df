//! Metrics server module
//!
//! This module provides an HTTP server to expose Prometheus metrics for scraping,
//! together with a liveness endpoint reporting the gateway's network and mode.

use actix_web::middleware::{Compress, DefaultHeaders, NormalizePath};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::utils::metrics::gather_metrics;

/// Gateway facts reported by `/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthState {
	pub network: String,
	pub mock_mode: bool,
}

/// Body returned by `/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthBody {
	pub status: &'static str,
	pub timestamp: String,
	pub stellar: HealthState,
}

impl HealthBody {
	pub fn ok(state: &HealthState) -> Self {
		Self {
			status: "ok",
			timestamp: Utc::now().to_rfc3339(),
			stellar: state.clone(),
		}
	}
}

/// Metrics endpoint handler
async fn metrics_handler() -> impl Responder {
	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// Health endpoint handler
async fn health_handler(state: web::Data<HealthState>) -> impl Responder {
	HttpResponse::Ok().json(HealthBody::ok(state.get_ref()))
}

/// Registers the operational routes on an actix `App`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
	cfg.route("/metrics", web::get().to(metrics_handler))
		.route("/health", web::get().to(health_handler));
}

/// Resolves the address to bind, forcing all interfaces when running in Docker
fn resolve_bind_address(bind_address: &str, in_docker: bool) -> String {
	if in_docker {
		if let Some(port) = bind_address.split(':').nth(1) {
			format!("0.0.0.0:{}", port)
		} else {
			"0.0.0.0:8081".to_string()
		}
	} else {
		bind_address.to_string()
	}
}

// Create metrics server
pub fn create_metrics_server(
	bind_address: String,
	health: HealthState,
) -> std::io::Result<actix_web::dev::Server> {
	let in_docker = std::env::var("IN_DOCKER").unwrap_or_default() == "true";
	let actual_bind_address = resolve_bind_address(&bind_address, in_docker);

	info!(
		"Starting metrics server on {} (actual bind: {})",
		bind_address, actual_bind_address
	);

	let health = web::Data::new(health);

	Ok(HttpServer::new(move || {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.wrap(DefaultHeaders::new())
			.app_data(health.clone())
			.configure(configure_routes)
	})
	.workers(2)
	.bind(actual_bind_address)?
	.shutdown_timeout(5)
	.run())
}
