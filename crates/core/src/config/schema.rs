//! Configuration schema definitions

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Reject values no component can work with
    pub fn validate(&self) -> Result<()> {
        let ratio = self.matching.max_edit_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::config_invalid(format!(
                "matching.max_edit_ratio must be within 0.0..=1.0, got {}",
                ratio
            )));
        }
        if self.matching.max_phrase_words == 0 {
            return Err(Error::config_invalid(
                "matching.max_phrase_words must be at least 1",
            ));
        }
        if self.session.ttl_secs == 0 {
            return Err(Error::config_invalid("session.ttl_secs must be at least 1"));
        }
        if self.catalog.default_page_size == 0 {
            return Err(Error::config_invalid(
                "catalog.default_page_size must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Candidate generation and fuzzy matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Edit budget as a fraction of candidate length
    #[serde(default = "default_max_edit_ratio")]
    pub max_edit_ratio: f64,

    /// Longest candidate phrase in words
    #[serde(default = "default_max_phrase_words")]
    pub max_phrase_words: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_edit_ratio: default_max_edit_ratio(),
            max_phrase_words: default_max_phrase_words(),
        }
    }
}

fn default_max_edit_ratio() -> f64 {
    0.2
}

fn default_max_phrase_words() -> usize {
    5
}

/// Admin session lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds a freshly issued token stays valid
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Seconds between expiry sweeps
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    300
}

/// Catalog snapshot location and listing defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of the JSON snapshot
    #[serde(default = "default_catalog_path")]
    pub path: String,

    /// Rows returned by a listing when no count is given
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            default_page_size: default_page_size(),
        }
    }
}

fn default_catalog_path() -> String {
    "pantry-catalog.json".to_string()
}

fn default_page_size() -> usize {
    10
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
