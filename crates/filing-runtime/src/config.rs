//! Node configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for one filing node.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Event-store data directory.
    pub data_dir: PathBuf,
    /// Ownership partitions for the entity registry.
    pub shard_count: u16,
    /// Entity mailbox depth (upload backpressure bound).
    pub mailbox_capacity: usize,
    /// Idle time before an entity passivates.
    pub idle_timeout: Duration,
    /// Deadline for entity request/response calls.
    pub ask_timeout: Duration,
    /// HTTP bind host.
    pub http_host: String,
    /// HTTP bind port.
    pub http_port: u16,
    /// Institutions/filings to seed the directory with, as
    /// `INSTITUTION:PERIOD` pairs.
    pub seed_filings: Vec<(String, String)>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            shard_count: 16,
            mailbox_capacity: 64,
            idle_timeout: Duration::from_secs(300),
            ask_timeout: Duration::from_secs(5),
            http_host: "127.0.0.1".to_string(),
            http_port: 8080,
            seed_filings: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Build configuration from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `FILING_DATA_DIR` | `./data` | Event store directory |
    /// | `FILING_SHARD_COUNT` | `16` | Ownership partitions |
    /// | `FILING_MAILBOX_CAPACITY` | `64` | Entity mailbox depth |
    /// | `FILING_ENTITY_IDLE_SECS` | `300` | Entity idle timeout |
    /// | `FILING_ASK_TIMEOUT_MS` | `5000` | Request/response deadline |
    /// | `FILING_HTTP_HOST` | `127.0.0.1` | HTTP bind host |
    /// | `FILING_HTTP_PORT` | `8080` | HTTP bind port |
    /// | `FILING_SEED_FILINGS` | empty | `INST:PERIOD,INST:PERIOD` seeds |
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: env_var("FILING_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            shard_count: env_parse("FILING_SHARD_COUNT").unwrap_or(defaults.shard_count),
            mailbox_capacity: env_parse("FILING_MAILBOX_CAPACITY")
                .unwrap_or(defaults.mailbox_capacity),
            idle_timeout: env_parse("FILING_ENTITY_IDLE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
            ask_timeout: env_parse("FILING_ASK_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.ask_timeout),
            http_host: env_var("FILING_HTTP_HOST").unwrap_or(defaults.http_host),
            http_port: env_parse("FILING_HTTP_PORT").unwrap_or(defaults.http_port),
            seed_filings: env_var("FILING_SEED_FILINGS")
                .map(|raw| parse_seed_filings(&raw))
                .unwrap_or_default(),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_var(name).and_then(|v| v.parse().ok())
}

fn parse_seed_filings(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (institution, period) = pair.split_once(':')?;
            let institution = institution.trim();
            let period = period.trim();
            if institution.is_empty() || period.is_empty() {
                return None;
            }
            Some((institution.to_string(), period.to_string()))
        })
        .collect()
}
