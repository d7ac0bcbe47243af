use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::metrics::Counter;

/// Error types for a single probe invocation
#[derive(Error, Debug)]
pub enum ProbeError {
    // Counter source errors
    #[error("Statistics source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Statistics command timed out after {timeout:?}")]
    SourceTimeout { timeout: Duration },

    #[error("Counter {counter} missing from statistics output")]
    MissingCounter { counter: Counter },

    #[error("Counter {counter} has a non-numeric value: {value:?}")]
    MalformedCounter { counter: Counter, value: String },

    // Sample store errors
    #[error("State file error at {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("State file format error: {0}")]
    StoreFormat(#[from] serde_json::Error),

    #[error("Snapshot is missing counter {counter}")]
    InvalidSnapshot { counter: Counter },

    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid duration: {field} = {duration:?} (must be > 0)")]
    InvalidDuration { field: String, duration: Duration },

    #[error("Invalid configuration format: {message}")]
    InvalidFormat { message: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Environment variable error: {variable} - {message}")]
    EnvironmentVariable { variable: String, message: String },
}

impl ProbeError {
    /// Wrap an I/O error raised while touching the state file
    pub fn store(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProbeError::Store {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;
