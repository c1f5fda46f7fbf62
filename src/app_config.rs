use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), the Halunder side
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO), the German side
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Database file path; falls back to the platform data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Scoring config
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the batch recalculation workflow
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScoringConfig {
    /// Number of pairs written per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Maximum number of concurrent database writes within a chunk
    #[serde(default = "default_concurrent_writes")]
    pub concurrent_writes: usize,

    /// Number of bucket changes echoed back after a recalculation run
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            concurrent_writes: default_concurrent_writes(),
            sample_size: default_sample_size(),
        }
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

fn default_source_language() -> String {
    crate::language_utils::SOURCE_LANGUAGE_CODE.to_string()
}

fn default_target_language() -> String {
    crate::language_utils::TARGET_LANGUAGE_CODE.to_string()
}

fn default_chunk_size() -> usize {
    50
}

fn default_concurrent_writes() -> usize {
    4
}

fn default_sample_size() -> usize {
    5
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            )
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content).map_err(|e| {
            anyhow!(
                "Failed to write config file {}: {}",
                path.as_ref().display(),
                e
            )
        })?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.scoring.chunk_size == 0 {
            return Err(anyhow!("scoring.chunk_size must be at least 1"));
        }
        if self.scoring.concurrent_writes == 0 {
            return Err(anyhow!("scoring.concurrent_writes must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            database_path: None,
            scoring: ScoringConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl From<&ScoringConfig> for crate::scoring::RecalcOptions {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            max_concurrent_writes: config.concurrent_writes,
            sample_size: config.sample_size,
        }
    }
}
