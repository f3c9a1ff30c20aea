use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;

use crate::errors::LocalizationError;
use crate::sheet::Rgb;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Batch translation endpoint (required unless dry run)
    #[serde(default)]
    pub api_url: String,

    /// Optional key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Header carrying the key; `Authorization` gets a `Bearer ` prefix
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum rows per API request; non-positive values fall back to the default
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,

    /// Retry settings for failed API calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Highlighting of freshly written cells
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Fabricate responses instead of calling the API
    #[serde(default)]
    pub dry_run: bool,

    /// Header of the source text column
    #[serde(default = "default_source_column")]
    pub source_column: String,

    /// Legacy flag: only empty cells are ever requested, whatever its value
    #[serde(default)]
    pub overwrite: bool,

    /// Attach a generated prompt to every batch item
    #[serde(default)]
    pub include_prompt: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Retry behavior of the translation client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds, doubled on each retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Highlight settings for written cells
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct HighlightConfig {
    /// Background color as an "R,G,B" triple, empty to disable
    #[serde(default)]
    pub color: String,

    /// Minutes before the highlight is cleared again (0 disables)
    #[serde(default)]
    pub auto_clear_minutes: u64,
}

impl HighlightConfig {
    /// Parsed highlight color, `None` when highlighting is disabled
    pub fn rgb(&self) -> Result<Option<Rgb>, LocalizationError> {
        if self.color.trim().is_empty() {
            return Ok(None);
        }
        Rgb::parse_triple(&self.color)
            .map(Some)
            .ok_or_else(|| LocalizationError::Config(format!(
                "highlight color must be \"R,G,B\" with values 0-255, got \"{}\"",
                self.color
            )))
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_auth_header() -> String {
    "Authorization".to_string()
}

fn default_timeout_ms() -> u64 {
    360_000
}

fn default_batch_size() -> i64 {
    3
}

fn default_max_retries() -> u32 {
    2 // three attempts in total
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_source_column() -> String {
    "en".to_string()
}

impl Config {
    /// Load a configuration file, writing a default one if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), LocalizationError> {
        if !self.dry_run {
            if self.api_url.trim().is_empty() {
                return Err(LocalizationError::Config(
                    "api_url is required unless dry_run is enabled".to_string(),
                ));
            }
            url::Url::parse(self.api_url.trim()).map_err(|e| {
                LocalizationError::Config(format!("invalid api_url \"{}\": {}", self.api_url, e))
            })?;
        }

        if self.source_column.trim().is_empty() {
            return Err(LocalizationError::Config("source_column must not be empty".to_string()));
        }

        if !self.api_key.is_empty() && self.auth_header.trim().is_empty() {
            return Err(LocalizationError::Config(
                "auth_header must be set when api_key is configured".to_string(),
            ));
        }

        self.highlight.rgb()?;

        if self.overwrite {
            warn!("'overwrite' is a legacy option: only empty cells are ever requested and written");
        }

        Ok(())
    }

    /// Batch size, falling back to the default for non-positive values
    pub fn effective_batch_size(&self) -> usize {
        if self.batch_size > 0 {
            self.batch_size as usize
        } else {
            default_batch_size() as usize
        }
    }

    /// Value of the auth header, if a key is configured
    pub fn auth_header_value(&self) -> Option<String> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return None;
        }
        if self.auth_header.eq_ignore_ascii_case("authorization") && !key.starts_with("Bearer ") {
            Some(format!("Bearer {}", key))
        } else {
            Some(key.to_string())
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: String::new(),
            api_key: String::new(),
            auth_header: default_auth_header(),
            timeout_ms: default_timeout_ms(),
            batch_size: default_batch_size(),
            retry: RetryConfig::default(),
            highlight: HighlightConfig::default(),
            dry_run: false,
            source_column: default_source_column(),
            overwrite: false,
            include_prompt: false,
            log_level: LogLevel::default(),
        }
    }
}
