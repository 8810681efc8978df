//! Logging utilities for the application
//!
//! This module provides utilities for setting up and configuring logging for the application.
//! It uses the `tracing_subscriber` crate to configure the logging.
//!
//! Output goes to stdout by default. Setting `LOG_MODE=file` switches to a daily rolling
//! file under `LOG_DATA_DIR` (default `logs/`), written through a non-blocking appender.
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default directory for log files when `LOG_MODE=file`
pub const DEFAULT_LOG_DIR: &str = "logs";

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "ecostellar-gateway.log";

/// Where log output should be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMode {
	Stdout,
	File { directory: String },
}

impl LogMode {
	/// Resolves the log mode from `LOG_MODE` and `LOG_DATA_DIR` values
	pub fn from_values(mode: Option<&str>, directory: Option<&str>) -> Self {
		match mode.map(|m| m.trim().to_ascii_lowercase()) {
			Some(m) if m == "file" => LogMode::File {
				directory: directory
					.filter(|d| !d.trim().is_empty())
					.unwrap_or(DEFAULT_LOG_DIR)
					.to_string(),
			},
			_ => LogMode::Stdout,
		}
	}

	/// Resolves the log mode from the process environment
	pub fn from_env() -> Self {
		let mode = std::env::var("LOG_MODE").ok();
		let directory = std::env::var("LOG_DATA_DIR").ok();
		Self::from_values(mode.as_deref(), directory.as_deref())
	}
}

/// Setup logging for the application
///
/// Uses `RUST_LOG` when set, otherwise defaults to `info`.
///
/// # Returns
///
/// The appender guard when logging to a file. It must be held for the lifetime of the
/// process so buffered lines are flushed on shutdown.
pub fn setup_logging() -> Option<WorkerGuard> {
	// Create a filter based on environment variable or default to INFO
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	match LogMode::from_env() {
		LogMode::Stdout => {
			let subscriber = tracing_subscriber::registry().with(filter).with(
				fmt::layer()
					.with_writer(std::io::stdout)
					.event_format(
						fmt::format()
							.with_level(true)
							.with_target(true)
							.with_thread_ids(false)
							.with_thread_names(false)
							.with_ansi(true)
							.compact(),
					)
					.fmt_fields(fmt::format::PrettyFields::new()),
			);

			// Try to set the subscriber, but don't panic if it fails
			let _ = subscriber.try_init();
			None
		}
		LogMode::File { directory } => {
			let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
			let (writer, guard) = tracing_appender::non_blocking(appender);

			let subscriber = tracing_subscriber::registry().with(filter).with(
				fmt::layer().with_writer(writer).event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_ansi(false)
						.compact(),
				),
			);

			let _ = subscriber.try_init();
			Some(guard)
		}
	}
}
