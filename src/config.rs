//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\brain-radio\config.toml
//! - macOS: ~/Library/Application Support/brain-radio/config.toml
//! - Linux: ~/.config/brain-radio/config.toml
//!
//! The config file is human-readable and editable. Every section falls back
//! to defaults, so a file with a single key is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::enrichment::{search, spotify};
use crate::pipeline::{DEFAULT_DURATION_MINUTES, PipelineConfig};

/// Environment variable consulted when no token is configured.
pub const SPOTIFY_TOKEN_ENV: &str = "SPOTIFY_ACCESS_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Orchestrator tunables
    pub pipeline: PipelineSettings,

    /// Web search provider
    pub search: SearchSettings,

    /// Catalog provider
    pub catalog: CatalogSettings,
}

/// API credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Spotify bearer token for catalog lookups
    pub spotify_access_token: Option<String>,
}

/// Orchestrator settings, in file-friendly units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub max_concurrency: usize,
    pub call_timeout_ms: u64,
    pub retry_backoff_ms: u64,
    pub search_result_limit: usize,
    pub default_duration_minutes: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            max_concurrency: defaults.max_concurrency,
            call_timeout_ms: defaults.call_timeout.as_millis() as u64,
            retry_backoff_ms: defaults.retry_backoff.as_millis() as u64,
            search_result_limit: defaults.search_result_limit,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl PipelineSettings {
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_concurrency: self.max_concurrency.max(1),
            call_timeout: Duration::from_millis(self.call_timeout_ms),
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            search_result_limit: self.search_result_limit.max(1),
            default_duration_minutes: self.default_duration_minutes,
        }
    }
}

/// Web search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Instant Answer endpoint
    pub endpoint: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: search::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Catalog settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// API root
    pub base_url: String,

    /// ISO 3166-1 market code for track relinking (empty = account default)
    pub market: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: spotify::DEFAULT_BASE_URL.to_string(),
            market: None,
        }
    }
}

impl Config {
    /// Configured token, else the environment variable. Blank values count as unset.
    pub fn spotify_token(&self) -> Option<String> {
        self.credentials
            .spotify_access_token
            .clone()
            .or_else(|| std::env::var(SPOTIFY_TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty())
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("brain-radio"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the standard location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from `path`, with the same fallbacks as [`load`].
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the standard location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
