use crate::core::synthetic::SyntheticConfig;
use crate::providers::er_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable overriding the dataset location.
pub const DATA_PATH_ENV: &str = "DATA_PATH";
pub const DEFAULT_DATA_PATH: &str = "data/raw/global_housing_market_extended.csv";

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExchangeRatesProviderConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ExchangeRatesProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExchangeRatesProviderConfig {
    fn default() -> Self {
        ExchangeRatesProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub exchange_rates: Option<ExchangeRatesProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchange_rates: Some(ExchangeRatesProviderConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub data_path: Option<String>,
    /// Default target for currency conversion panels.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

impl AppConfig {
    /// Loads `path` when given. Otherwise loads the default config file,
    /// falling back to built-in defaults when it does not exist.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }
        match Self::default_config_path() {
            Ok(default_path) if default_path.exists() => Self::load_from_path(&default_path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "housedash", "housedash")
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

    /// Picks the dataset path: explicit override, then `DATA_PATH`, then the
    /// config file, then the default relative path.
    pub fn resolve_data_path(&self, cli_override: Option<&str>) -> PathBuf {
        self.resolve_data_path_with(cli_override, std::env::var(DATA_PATH_ENV).ok())
    }

    fn resolve_data_path_with(&self, cli_override: Option<&str>, env: Option<String>) -> PathBuf {
        let path = cli_override
            .map(str::to_string)
            .or(env.filter(|v| !v.is_empty()))
            .or_else(|| self.data_path.clone())
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
        debug!("Resolved data path: {path}");
        PathBuf::from(path)
    }

    pub fn exchange_rates(&self) -> ExchangeRatesProviderConfig {
        self.providers.exchange_rates.clone().unwrap_or_default()
    }
}
