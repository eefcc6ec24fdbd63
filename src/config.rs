// Configuration loading and parsing (config/puckboard.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/puckboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataPaths,
    pub database: DatabaseSection,
}

/// CSV input locations, one file per roster table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub skaters: String,
    pub goalies: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub path: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            skaters: "data/skaters.csv".to_string(),
            goalies: "data/goalies.csv".to_string(),
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        DatabaseSection {
            path: "puckboard.db".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataPaths::default(),
            database: DatabaseSection::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration from `path`. A missing file is not an error: the
/// defaults stand in, so the tool runs without any setup.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = if path.exists() {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        Config::default()
    };

    validate(&config)?;
    Ok(config)
}

/// Convenience wrapper: loads config from the default location.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_PATH))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let fields: &[(&str, &str)] = &[
        ("data.skaters", &config.data.skaters),
        ("data.goalies", &config.data.goalies),
        ("database.path", &config.database.path),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".to_string(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
