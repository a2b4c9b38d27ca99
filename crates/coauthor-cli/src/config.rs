//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use coauthor_openalex::config as oa;

/// Global configuration for coauthor
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub openalex: OpenAlexConfig,
    pub years: YearsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout: u64,
    /// Attempts per request, including the first
    pub max_attempts: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = coauthor_core::HttpConfig::default();
        Self {
            timeout: defaults.request_timeout.as_secs(),
            max_attempts: defaults.max_attempts,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAlexConfig {
    pub api_url: String,
    pub concept: String,
    pub per_page: u32,
    pub max_pages: u32,
    pub max_work_pages: u32,
}

impl Default for OpenAlexConfig {
    fn default() -> Self {
        Self {
            api_url: oa::OPENALEX_API_URL.to_string(),
            concept: oa::DEFAULT_CONCEPT.to_string(),
            per_page: oa::MAX_PER_PAGE,
            max_pages: oa::DEFAULT_MAX_PAGES,
            max_work_pages: oa::DEFAULT_MAX_WORK_PAGES,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct YearsConfig {
    pub first: i32,
    pub last: i32,
}

impl Default for YearsConfig {
    fn default() -> Self {
        Self {
            first: oa::DEFAULT_FIRST_YEAR,
            last: oa::DEFAULT_LAST_YEAR,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(oa::DEFAULT_OUTPUT),
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./coauthor.toml (current directory)
    /// 2. ~/.config/coauthor/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("coauthor.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "coauthor") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
