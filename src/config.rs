//! Configuration: per-sheet cache options and the optional YAML config file

use crate::cache::CacheOptions;
use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cache settings for a sheet handle. Keys mirror the flat option names
/// `cache`, `cache_dir` and `cache_expires`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    /// Use the cache at all
    pub cache: bool,
    /// Root directory of the file cache
    pub cache_dir: PathBuf,
    /// Freshness window in seconds
    pub cache_expires: u64,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            cache: false,
            cache_dir: PathBuf::from("cache"),
            cache_expires: 600,
        }
    }
}

impl SyncOptions {
    /// Apply one flat `key = value` option. Unknown keys are ignored.
    pub fn apply(&mut self, key: &str, value: &str) -> SyncResult<()> {
        match key {
            "cache" => self.cache = parse_bool(key, value)?,
            "cache_dir" => self.cache_dir = PathBuf::from(value),
            "cache_expires" => {
                self.cache_expires = value.trim().parse().map_err(|_| {
                    SyncError::Config(format!(
                        "cache_expires must be a whole number of seconds, got '{}'",
                        value
                    ))
                })?
            }
            _ => debug!(key, "ignoring unknown option"),
        }
        Ok(())
    }

    /// Apply several options in order
    pub fn apply_all<'a, I>(&mut self, options: I) -> SyncResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in options {
            self.apply(key, value)?;
        }
        Ok(())
    }

    /// Cache behaviour for one fetch
    pub fn cache_options(&self, force_refresh: bool) -> CacheOptions {
        CacheOptions {
            enabled: self.cache,
            freshness_window_secs: self.cache_expires,
            force_refresh,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> SyncResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SyncError::Config(format!(
            "{} must be true or false, got '{}'",
            key, value
        ))),
    }
}

/// Contents of a `sheetsync.yaml` file. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spreadsheet file id
    pub file_id: Option<String>,
    /// Sheet (tab) name
    pub sheet: Option<String>,
    /// Environment variable holding the bearer token
    pub token_env: Option<String>,
    /// Override for the Sheets API base URL
    pub base_url: Option<String>,
    /// Read through the legacy cell feed of this worksheet id instead of the values API
    pub worksheet_id: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    pub options: SyncOptions,
}

impl Config {
    pub fn load(path: &Path) -> SyncResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> SyncResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
