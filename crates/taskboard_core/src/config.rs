//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Provide defaults for the data directory, log level and page size.
//! - Merge an optional JSON file and `TASKBOARD_*` environment overrides.
//!
//! # Invariants
//! - A loaded config is normalized: absolute `data_dir`, canonical level
//!   name, page size within pager bounds.
//! - Precedence is defaults, then file, then environment.

use crate::logging::{default_log_level, normalize_dir, normalize_level};
use crate::view::pager::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "TASKBOARD_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "TASKBOARD_LOG_LEVEL";
pub const ENV_PAGE_SIZE: &str = "TASKBOARD_PAGE_SIZE";

const LOG_SUBDIR: &str = "logs";

/// Configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid { field, message } => write!(f, "invalid `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// Holds the SQLite file and the `logs/` directory.
    pub data_dir: PathBuf,
    pub log_level: String,
    pub page_size: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level().to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CoreConfig {
    /// Defaults overlaid with process environment overrides.
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads `path` as JSON; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.normalized()
    }

    /// Optional file, then process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let base = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `TASKBOARD_*` values resolved through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            self.page_size = size.trim().parse().map_err(|err| ConfigError::Invalid {
                field: "page_size",
                message: format!("`{size}` is not a number: {err}"),
            })?;
        }
        self.normalized()
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_SUBDIR)
    }

    fn normalized(self) -> ConfigResult<Self> {
        let data_dir = normalize_dir(&self.data_dir).map_err(|message| ConfigError::Invalid {
            field: "data_dir",
            message,
        })?;
        let log_level = normalize_level(&self.log_level).map_err(|message| {
            ConfigError::Invalid {
                field: "log_level",
                message,
            }
        })?;
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ConfigError::Invalid {
                field: "page_size",
                message: format!(
                    "{} is outside {MIN_PAGE_SIZE}..={MAX_PAGE_SIZE}",
                    self.page_size
                ),
            });
        }
        Ok(Self {
            data_dir,
            log_level: log_level.to_string(),
            page_size: self.page_size,
        })
    }
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if Path::new(&home).is_absolute() => Path::new(&home).join(".taskboard"),
        _ => std::env::temp_dir().join("taskboard"),
    }
}
