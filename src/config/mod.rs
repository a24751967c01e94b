//! Runtime configuration: YAML settings/watchlists plus environment accessors.

use crate::signals::thresholds::{ThresholdConfig, ThresholdError};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const SETTINGS_FILE: &str = "settings.yml";
pub const WATCHLISTS_FILE: &str = "watchlists.yml";
pub const DEFAULT_CONFIG_DIR: &str = "configs";
pub const DEFAULT_SCHEDULE: &str = "0 30 7 * * Mon-Fri";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing config file: {}", .0.display())]
    Missing(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid thresholds: {0}")]
    Thresholds(#[from] ThresholdError),
    #[error("Unknown timezone '{0}'")]
    Timezone(String),
    #[error("Missing env vars: {}", .0.join(", "))]
    MissingEnv(Vec<String>),
}

/// Deployment environment name (`APP_ENV`, falling back to `ENVIRONMENT`).
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "development".to_string())
}

pub fn get_config_dir() -> PathBuf {
    env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR))
}

pub fn get_finnhub_api_key() -> Result<String, ConfigError> {
    require_env("FINNHUB_API_KEY")
}

/// `DRY_RUN=1` prints the digest instead of sending it.
pub fn is_dry_run() -> bool {
    env::var("DRY_RUN").map(|v| v == "1").unwrap_or(false)
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingEnv(vec![key.to_string()])),
    }
}

/// Read a YAML file; an empty document deserializes from `{}`.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = if raw.trim().is_empty() { "{}" } else { raw.as_str() };
    serde_yaml::from_str(raw).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    Tz::from_str(name).map_err(|_| ConfigError::Timezone(name.to_string()))
}

fn default_lookback_days() -> u32 {
    120
}

fn default_schedule() -> String {
    DEFAULT_SCHEDULE.to_string()
}

fn default_concurrency() -> usize {
    4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestSettings {
    pub timezone: String,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Six-field cron expression, evaluated in `timezone`.
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Symbols fetched and scored concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wording {
    pub warn_label: String,
    pub suggested_action_warn: String,
    pub critical_label: String,
    pub suggested_action_critical: String,
}

impl Default for Wording {
    fn default() -> Self {
        Self {
            warn_label: "Heads-up".to_string(),
            suggested_action_warn: "Review position size and stop levels".to_string(),
            critical_label: "Critical".to_string(),
            suggested_action_critical: "Consider trimming or hedging".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialSettings {
    #[serde(default)]
    pub instagram_handle: Option<String>,
}

fn default_news_max_items() -> usize {
    4
}

fn default_news_lookback_days() -> i64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSettings {
    #[serde(default = "default_news_max_items")]
    pub max_items: usize,
    #[serde(default = "default_news_lookback_days")]
    pub lookback_days: i64,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            max_items: default_news_max_items(),
            lookback_days: default_news_lookback_days(),
        }
    }
}

/// Contents of `settings.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub digest: DigestSettings,
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub wording: Wording,
    #[serde(default)]
    pub social: SocialSettings,
    #[serde(default)]
    pub news: NewsSettings,
}

impl Settings {
    pub fn instagram_handle(&self) -> Option<&str> {
        self.social
            .instagram_handle
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }
}

/// Contents of `watchlists.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Watchlists {
    #[serde(default)]
    pub core: Vec<String>,
    #[serde(default)]
    pub conviction: Vec<String>,
    #[serde(default)]
    pub risky_watchlist: Vec<String>,
    #[serde(default)]
    pub signals_etfs: Vec<String>,
}

/// Settings and watchlists loaded and validated together.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub watchlists: Watchlists,
    pub timezone: Tz,
}

impl Config {
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let watchlists: Watchlists = load_yaml(&dir.join(WATCHLISTS_FILE))?;
        let settings: Settings = load_yaml(&dir.join(SETTINGS_FILE))?;
        Self::from_parts(settings, watchlists)
    }

    pub fn from_parts(settings: Settings, watchlists: Watchlists) -> Result<Self, ConfigError> {
        settings.thresholds.validate()?;
        let timezone = parse_timezone(&settings.digest.timezone)?;
        Ok(Self {
            settings,
            watchlists,
            timezone,
        })
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&get_config_dir())
    }
}
