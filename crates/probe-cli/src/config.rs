//! Application configuration.

use crate::error::{AppError, AppResult};
use probe_session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_host() -> String {
    // Empty means loopback.
    String::new()
}

fn default_port() -> u16 {
    7496
}

fn default_client_id() -> i64 {
    0
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gateway host. Empty means loopback.
    #[serde(default = "default_host")]
    pub host: String,
    /// Gateway port. Default: 7496.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Client id sent in the connect handshake. Default: 0.
    #[serde(default = "default_client_id")]
    pub client_id: i64,
    /// Scripted-session parameters.
    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_id: default_client_id(),
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_core::OrderSide;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.host, "");
        assert_eq!(config.port, 7496);
        assert_eq!(config.client_id, 0);
        assert_eq!(config.session.ack_timeout_ms, 2_000);
        assert_eq!(config.session.idle_interval_ms, 30_000);
        assert_eq!(config.session.instrument.symbol, "IBM");
    }

    #[test]
    fn test_partial_config_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
            host = "gw.example.com"
            client_id = 42

            [session]
            ack_timeout_ms = 5000

            [session.order]
            side = "SELL"
            order_type = "LMT"
            quantity = 10
            limit_price = "1.25"
            "#,
        )
        .unwrap();

        assert_eq!(config.host, "gw.example.com");
        assert_eq!(config.port, 7496);
        assert_eq!(config.client_id, 42);
        assert_eq!(config.session.ack_timeout_ms, 5_000);
        assert_eq!(config.session.idle_interval_ms, 30_000);
        assert_eq!(config.session.order.side, OrderSide::Sell);
        assert_eq!(config.session.order.quantity, 10);
        assert_eq!(config.session.order.limit_price, dec!(1.25));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("/nonexistent/probe.toml").unwrap();
        assert_eq!(config.port, 7496);
    }
}
