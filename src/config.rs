//! Configuration management
//!
//! Handles loading and parsing of JSON configuration files with environment
//! variable support for API credentials. Keys never live in source code;
//! they come from the config file or `DELTA_API_KEY`/`DELTA_API_SECRET`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::exchange::DEFAULT_BASE_URL;
use crate::types::Symbol;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    pub trading: TradingConfig,
    pub strategy: serde_json::Value,
    #[serde(default)]
    pub accounts: Vec<AccountCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<TelegramConfig>,
}

impl Config {
    /// Load configuration from JSON file
    ///
    /// If `DELTA_API_KEY` and `DELTA_API_SECRET` are both set, an extra
    /// account is appended to the configured list.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;

        if let (Ok(api_key), Ok(api_secret)) = (
            std::env::var("DELTA_API_KEY"),
            std::env::var("DELTA_API_SECRET"),
        ) {
            config.accounts.push(AccountCredentials {
                api_key,
                api_secret,
            });
        }

        Ok(config)
    }
}

/// Exchange endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        ExchangeConfig {
            base_url: default_base_url(),
        }
    }
}

/// Per-account API credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCredentials {
    pub api_key: String,
    pub api_secret: String,
}

/// Trading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    pub symbol: Symbol,
    /// Candle resolution, e.g. "1m", "5m", "1h"
    #[serde(default = "default_resolution")]
    pub resolution: String,
    /// Contracts per order
    #[serde(default = "default_order_size")]
    pub order_size: u32,
    /// Seconds between evaluation cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_resolution() -> String {
    "1m".to_string()
}
fn default_order_size() -> u32 {
    1
}
fn default_poll_interval() -> u64 {
    60
}

/// Telegram alerting configuration (optional)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let json = r#"{
            "trading": { "symbol": "BTCUSD" },
            "strategy": { "name": "candle_reversal" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.trading.symbol.as_str(), "BTCUSD");
        assert_eq!(config.trading.resolution, "1m");
        assert_eq!(config.trading.order_size, 1);
        assert_eq!(config.trading.poll_interval_secs, 60);
        assert_eq!(config.exchange.base_url, DEFAULT_BASE_URL);
        assert!(config.accounts.is_empty());
        assert!(config.telegram.is_none());
        assert_eq!(config.strategy["name"], "candle_reversal");
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "exchange": { "base_url": "https://testnet.example" },
            "trading": {
                "symbol": "ETHUSD",
                "resolution": "5m",
                "order_size": 3,
                "poll_interval_secs": 300
            },
            "strategy": { "name": "rsi_momentum", "rsi_period": 21 },
            "accounts": [
                { "api_key": "k1", "api_secret": "s1" },
                { "api_key": "k2", "api_secret": "s2" }
            ],
            "telegram": { "bot_token": "t", "chat_id": "-100" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.exchange.base_url, "https://testnet.example");
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.trading.order_size, 3);
        assert!(config.telegram.is_some());
        assert_eq!(config.strategy["rsi_period"], 21);
    }

}
