//! Storage and logging configuration for todo hosts.
//!
//! # Responsibility
//! - Describe where the collection lives and which backend persists it.
//! - Resolve the final store path from directory, backend and file name.
//!
//! # Invariants
//! - `data_dir` must be absolute, matching the logging directory rule.
//! - A custom file name is a bare name, never a path.

use crate::logging::default_log_level;
use crate::store::{DEFAULT_DB_FILE, DEFAULT_SAVE_FILE};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

/// Persistence backend selected by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Single JSON file (`JsonFileStore`).
    #[default]
    Json,
    /// Single SQLite database file (`SqliteTodoStore`).
    Sqlite,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Json => DEFAULT_SAVE_FILE,
            Self::Sqlite => DEFAULT_DB_FILE,
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
    RelativeDataDir(PathBuf),
    InvalidFileName(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => {
                write!(f, "unsupported store backend `{value}`; expected json|sqlite")
            }
            Self::RelativeDataDir(path) => {
                write!(f, "data_dir must be an absolute path, got `{}`", path.display())
            }
            Self::InvalidFileName(value) => {
                write!(f, "store file name must be a bare file name, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Host-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    pub data_dir: PathBuf,
    pub backend: StoreBackend,
    /// Overrides the backend's default file name when set.
    pub file_name: Option<String>,
    pub log_level: String,
}

impl TodoConfig {
    /// Configuration with default backend, file name and build-mode log level.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend: StoreBackend::default(),
            file_name: None,
            log_level: default_log_level().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(self.data_dir.clone()));
        }
        if let Some(name) = &self.file_name {
            let trimmed = name.trim();
            if trimmed.is_empty()
                || trimmed.contains(['/', '\\'])
                || trimmed == "."
                || trimmed == ".."
            {
                return Err(ConfigError::InvalidFileName(name.clone()));
            }
        }
        Ok(())
    }

    /// Full path of the store file for the configured backend.
    pub fn store_path(&self) -> PathBuf {
        let name = self
            .file_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_else(|| self.backend.default_file_name());
        self.data_dir.join(name)
    }

    /// Directory used for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
