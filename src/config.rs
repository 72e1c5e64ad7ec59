//! Application Configuration
//!
//! JSON file (`url`, `token`, optional `table`, `timeout_secs`, `log_dir`,
//! `local_db`) with environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tasklist_core::remote::{DEFAULT_TABLE, DEFAULT_TIMEOUT};
use tasklist_core::{ConfigError, RestConfig};

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "tasklist.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub local_db: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Explicit path must exist; the default file is optional
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Override fields from `TASKLIST_*` variables
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = var("TASKLIST_URL") {
            self.url = url;
        }
        if let Some(token) = var("TASKLIST_TOKEN") {
            self.token = token;
        }
        if let Some(table) = var("TASKLIST_TABLE") {
            self.table = Some(table);
        }
        if let Some(secs) = var("TASKLIST_TIMEOUT_SECS") {
            let parsed = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "TASKLIST_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            self.timeout_secs = Some(parsed);
        }
        if let Some(dir) = var("TASKLIST_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("tasklist-logs"))
    }

    pub fn rest_config(&self) -> Result<RestConfig, ConfigError> {
        let config = RestConfig::new(self.url.trim(), self.token.trim())
            .with_table(self.table.as_deref().unwrap_or(DEFAULT_TABLE))
            .with_timeout(self.timeout());
        config.validate()?;
        Ok(config)
    }
}
