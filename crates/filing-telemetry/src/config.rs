//! Telemetry configuration, read from the environment.

/// Configuration for logging setup.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on every log line.
    pub service_name: String,
    /// Log level filter (tracing-subscriber `EnvFilter` syntax).
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "filing-platform".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Build configuration from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `FILING_SERVICE_NAME` | `filing-platform` | Service name in logs |
    /// | `FILING_LOG_LEVEL` | `info` | Log level filter |
    /// | `FILING_LOG_JSON` | `false` | JSON log output |
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_name: std::env::var("FILING_SERVICE_NAME")
                .unwrap_or(defaults.service_name),
            log_level: std::env::var("FILING_LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logs: std::env::var("FILING_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.json_logs),
        }
    }
}
