//! Gateway configuration.

use crate::error::GatewayError;

/// Configuration for the HTTP boundary.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Maximum accepted request body, bytes.
    pub body_limit_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            body_limit_bytes: 64 * 1024 * 1024,
        }
    }
}

impl GatewayConfig {
    /// Validate the configuration before binding.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.host.is_empty() {
            return Err(GatewayError::Config("bind host is empty".to_string()));
        }
        if self.body_limit_bytes == 0 {
            return Err(GatewayError::Config(
                "body limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
