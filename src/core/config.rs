use crate::core::country::Country;
use crate::core::price::FALLBACK_PRICE;
use crate::core::structure::Structure;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com";
pub const DEFAULT_ASSET_ID: &str = "usd-coin";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub coingecko: Option<CoinGeckoProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: DEFAULT_COINGECKO_URL.to_string(),
            }),
        }
    }
}

fn default_asset_id() -> String {
    DEFAULT_ASSET_ID.to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_fallback_price() -> f64 {
    FALLBACK_PRICE
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_asset_id")]
    pub asset_id: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_fallback_price")]
    pub fallback_price: f64,
    /// Preselected country when none is given on the command line.
    #[serde(default)]
    pub country: Country,
    #[serde(default)]
    pub structure: Structure,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            asset_id: default_asset_id(),
            poll_interval_secs: default_poll_interval_secs(),
            fallback_price: default_fallback_price(),
            country: Country::default(),
            structure: Structure::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or built-in defaults when
    /// no config file has been created.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "afritax", "afritax")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Rejects values that would publish a meaningless live price.
    pub fn validate(&self) -> Result<()> {
        if !self.fallback_price.is_finite() || self.fallback_price <= 0.0 {
            bail!(
                "fallback_price must be a positive number, got {}",
                self.fallback_price
            );
        }
        if self.asset_id.trim().is_empty() {
            bail!("asset_id must not be empty");
        }
        Ok(())
    }

    pub fn coingecko_base_url(&self) -> &str {
        self.providers
            .coingecko
            .as_ref()
            .map_or(DEFAULT_COINGECKO_URL, |p| &p.base_url)
    }

    /// Poll interval, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
