//! Configuration management for the wikimipt bot.
//!
//! Provides configuration loading from TOML files with support for
//! multiple file locations, environment variable overrides, and sensible defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;


/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the configuration file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as TOML.
    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        /// Path to the configuration file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML parse error.
        source: toml::de::Error,
    },
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Wiki site location and HTTP client settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Tag renderer limits.
    #[serde(default)]
    pub render: RenderConfig,

    /// Teacher search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Telegram bot settings. Absent when the token comes from the environment.
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,

    /// File logging. When absent, logs go to stdout only.
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// `[site]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Host name links are qualified with.
    pub host: String,
    /// Scheme used to fetch pages.
    pub scheme: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: "wikimipt.org".to_string(),
            scheme: "http".to_string(),
            timeout_secs: 30,
            user_agent: concat!("wikimipt-bot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum element nesting the renderer descends into.
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// `[search]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of names offered for one query.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

/// `[telegram]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TelegramConfig {
    /// Bot token. The `WIKIMIPT_TGTOKEN` environment variable takes priority.
    #[serde(default)]
    pub token: Option<String>,
}

/// Log file rotation period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// New file every day.
    #[default]
    Daily,
    /// New file every hour.
    Hourly,
    /// Single file, never rotated.
    Never,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Directory the log files are written to.
    #[serde(default = "default_log_directory")]
    pub directory: String,
    /// How often to start a new file.
    #[serde(default)]
    pub rotation: Rotation,
    /// How many rotated files to keep.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_max_files() -> usize {
    7
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            rotation: Rotation::default(),
            max_files: default_max_files(),
        }
    }
}

impl Config {
    /// Load configuration from file system.
    ///
    /// Priority order:
    /// 1. `explicit` path (e.g. from `--config`)
    /// 2. WIKIMIPT_CONFIG environment variable
    /// 3. ./config.toml (local directory)
    /// 4. ~/.config/wikimipt/config.toml (user config)
    ///
    /// Returns default config if no config file found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if a found file cannot be read.
    /// Returns [`ConfigError::ParseError`] if a found file is not valid TOML.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // An explicit path must exist; a missing file is an error, not a fallback.
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(path) = std::env::var("WIKIMIPT_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                return Self::load_from(p);
            }
        }

        let local = PathBuf::from("config.toml");
        if local.exists() {
            return Self::load_from(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config/wikimipt/config.toml");
            if user_config.exists() {
                return Self::load_from(user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read.
    /// Returns [`ConfigError::ParseError`] if the file is not valid TOML.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }
}
