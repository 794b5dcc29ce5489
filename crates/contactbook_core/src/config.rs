//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database location and logging settings for one process.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - The log directory, when set, is absolute.

use crate::logging::{default_log_level, normalize_level, LogSettings};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_VAR: &str = "CONTACTBOOK_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "CONTACTBOOK_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "CONTACTBOOK_LOG_DIR";
const DEFAULT_DB_FILE: &str = "contactbook.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(detail) => write!(f, "{LOG_LEVEL_VAR}: {detail}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "{LOG_DIR_VAR} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log: LogSettings,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, e.g. a fixed map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE));

        let level = match read(LOG_LEVEL_VAR) {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = read(LOG_DIR_VAR).map(PathBuf::from);
        if let Some(dir) = &log_dir {
            if !Path::new(dir).is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }

        Ok(Self {
            db_path,
            log: LogSettings { level, log_dir },
        })
    }
}
