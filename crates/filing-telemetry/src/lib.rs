//! # Filing Telemetry
//!
//! Structured logging bootstrap for the filing platform.
//!
//! Every subsystem logs through `tracing` with a `subsystem` field
//! (e.g. `subsystem = "df-02"`); this crate installs the subscriber that
//! formats and filters those events.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use filing_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())
//!         .expect("Failed to init telemetry");
//!     // Application code here; logs are now collected.
//! }
//! ```

mod config;

pub use config::TelemetryConfig;

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log-level filter string did not parse.
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// The rejected filter string.
        filter: String,
        /// Parser detail.
        message: String,
    },

    /// A global subscriber was already installed.
    #[error("Telemetry already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Guard that keeps telemetry active. Drop flushes pending output.
pub struct TelemetryGuard {
    _private: (),
}

/// Initialize structured logging.
///
/// Installs a `tracing-subscriber` with an env-filter built from
/// `config.log_level` (overridable per-target via `RUST_LOG` syntax) and
/// either a human-readable or JSON fmt layer.
///
/// Returns a guard to hold for the application's lifetime.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter =
        EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::InvalidFilter {
            filter: config.log_level.clone(),
            message: e.to_string(),
        })?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { _private: () })
}
