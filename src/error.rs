//! Error types for yrun

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for yrun operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for yrun
#[derive(Error, Debug)]
pub enum Error {
    /// Loading the project document or its environment file failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Strict resolution found a variable no source defines
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),
}

/// Errors raised while loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to load environment file '{path}': {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Variable interpolation errors (strict mode only)
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

impl ConfigError {
    /// Path of the file the error refers to, when there is one
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::EnvFile { path, .. } => Some(path),
            ConfigError::NotFound(_) | ConfigError::Invalid(_) => None,
        }
    }
}
