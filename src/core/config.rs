use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use super::session::SessionSettings;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BinanceProviderConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for BinanceProviderConfig {
    fn default() -> Self {
        BinanceProviderConfig {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub binance: Option<BinanceProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            binance: Some(BinanceProviderConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Coins tracked when none are given on the command line.
    pub coins: Vec<String>,
    pub interval_secs: u64,
    pub quote_asset: String,
    pub display_currency: String,
    pub providers: ProvidersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            coins: vec!["BTC".to_string(), "ETH".to_string(), "LTC".to_string()],
            interval_secs: 10,
            quote_asset: "USDT".to_string(),
            display_currency: "EUR".to_string(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, or built-in defaults when
    /// no file has been set up yet.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "megatux", "crypticker")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            quote_asset: self.quote_asset.trim().to_uppercase(),
            display_currency: self.display_currency.trim().to_uppercase(),
        }
    }

    pub fn binance(&self) -> BinanceProviderConfig {
        self.providers.binance.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
coins: ["sol", "ada"]
interval_secs: 30
quote_asset: "usdc"
display_currency: "gbp"
providers:
  binance:
    base_url: "http://example.com/binance"
    timeout_secs: 3
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.coins, vec!["sol", "ada"]);
        assert_eq!(config.interval_secs, 30);
        assert_eq!(
            config.session_settings(),
            SessionSettings {
                quote_asset: "USDC".to_string(),
                display_currency: "GBP".to_string(),
            }
        );
        let binance = config.binance();
        assert_eq!(binance.base_url, "http://example.com/binance");
        assert_eq!(binance.timeout_secs, 3);
    }

    #[test]
    fn test_config_defaults_for_missing_fields() {
        let config: AppConfig = serde_yaml::from_str("interval_secs: 5").unwrap();
        assert_eq!(config.interval_secs, 5);
        assert_eq!(config.quote_asset, "USDT");
        assert_eq!(config.display_currency, "EUR");
        assert_eq!(config.binance().base_url, "https://api.binance.com");

        let config: AppConfig = serde_yaml::from_str(
            r#"
providers:
  binance:
    base_url: "http://localhost:9000"
"#,
        )
        .unwrap();
        assert_eq!(config.binance().timeout_secs, 10);
        assert_eq!(config.coins, vec!["BTC", "ETH", "LTC"]);
    }

    #[test]
    fn test_missing_provider_falls_back_to_default() {
        let config: AppConfig = serde_yaml::from_str("providers:\n  binance: null\n").unwrap();
        assert!(config.providers.binance.is_none());
        assert_eq!(config.binance(), BinanceProviderConfig::default());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
