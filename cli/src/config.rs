//! Settings file for the `bookfinder` CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bookfinder_core::{OrderBy, SearchOptions, Timeouts, DEFAULT_BASE_URL, DEFAULT_MAX_RESULTS};
use directories::ProjectDirs;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub search: Option<SearchConfig>,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    pub order_by: Option<OrderBy>,
    pub max_results: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    pub base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

impl Config {
    pub fn order_by(&self) -> OrderBy {
        self.search
            .as_ref()
            .and_then(|search| search.order_by)
            .unwrap_or_default()
    }

    pub fn max_results(&self) -> u32 {
        self.search
            .as_ref()
            .and_then(|search| search.max_results)
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub fn base_url(&self) -> &str {
        self.http
            .as_ref()
            .and_then(|http| http.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeouts(&self) -> Timeouts {
        let defaults = Timeouts::default();
        let http = self.http.as_ref();
        Timeouts {
            connect: http
                .and_then(|h| h.connect_timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect),
            read: http
                .and_then(|h| h.read_timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.read),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub max_results: Option<u32>,
    pub order_by: Option<OrderBy>,
    pub base_url: Option<String>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub options: SearchOptions,
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl Settings {
    pub fn resolve(config: &Config, overrides: Overrides) -> Self {
        Self {
            options: SearchOptions {
                max_results: overrides.max_results.unwrap_or_else(|| config.max_results()),
                order_by: overrides.order_by.unwrap_or_else(|| config.order_by()),
            },
            base_url: overrides
                .base_url
                .unwrap_or_else(|| config.base_url().to_string()),
            timeouts: config.timeouts(),
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "bookfinder").context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&contents).context("Failed to parse config file as TOML")?;
    Ok(config)
}
