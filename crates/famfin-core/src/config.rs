//! Application configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. TOML file: an explicit path, else the data-dir file
//!    (~/.local/share/famfin/config.toml) if present, else built-in defaults
//! 2. Environment overrides (`FAMFIN_*`) applied on top
//!
//! Example file:
//!
//! ```toml
//! [database]
//! path = "/home/me/family_finance.db"
//!
//! [analysis]
//! url = "https://example.com/api/v1/chat/completions"
//! token = "secret"
//! chat_id = "family_finance"
//! timeout_secs = 60
//!
//! [export]
//! locale = "en"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::export::ExportLocale;

/// Environment variable overriding the database path
pub const DB_ENV: &str = "FAMFIN_DB";
/// Environment variable overriding the analysis endpoint URL
pub const AI_URL_ENV: &str = "FAMFIN_AI_URL";
/// Environment variable holding the analysis bearer token
pub const AI_TOKEN_ENV: &str = "FAMFIN_AI_TOKEN";
/// Environment variable overriding the analysis chat id
pub const AI_CHAT_ID_ENV: &str = "FAMFIN_AI_CHAT_ID";
/// Environment variable overriding the export locale
pub const EXPORT_LOCALE_ENV: &str = "FAMFIN_EXPORT_LOCALE";

pub const DEFAULT_ANALYSIS_URL: &str = "https://towa.fofinvesting.com/api/v1/chat/completions";
pub const DEFAULT_CHAT_ID: &str = "family_finance";
pub const DEFAULT_DB_PATH: &str = "family_finance.db";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub analysis: AnalysisConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub url: String,
    /// Bearer token; analysis is disabled without one
    pub token: Option<String>,
    pub chat_id: String,
    /// Request timeout; the transport default applies when unset
    pub timeout_secs: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ANALYSIS_URL.to_string(),
            token: None,
            chat_id: DEFAULT_CHAT_ID.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub locale: ExportLocale,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production)
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DB_ENV) {
            self.database.path = PathBuf::from(path);
        }
        if let Some(url) = lookup(AI_URL_ENV) {
            self.analysis.url = url;
        }
        if let Some(token) = lookup(AI_TOKEN_ENV) {
            self.analysis.token = Some(token);
        }
        if let Some(chat_id) = lookup(AI_CHAT_ID_ENV) {
            self.analysis.chat_id = chat_id;
        }
        if let Some(locale) = lookup(EXPORT_LOCALE_ENV) {
            self.export.locale = locale.parse().map_err(Error::Config)?;
        }
        Ok(())
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("famfin").join("config.toml"))
}
