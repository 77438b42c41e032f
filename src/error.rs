//! Error types for FoamSweep
//!
//! This module defines all error types used throughout the application,
//! giving enough context (paths, tools, log files) to find out which step
//! of a sweep went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for FoamSweep operations
#[derive(Error, Debug)]
pub enum SweepError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Dictionary does not contain the requested key
    #[error("Key '{key}' not found in dictionary '{path}'")]
    KeyNotFound { path: PathBuf, key: String },

    /// Dictionary value could not be interpreted
    #[error("Invalid value '{value}' for key '{key}' in '{path}'")]
    InvalidValue {
        path: PathBuf,
        key: String,
        value: String,
    },

    /// Sweep range is empty or malformed
    #[error("Invalid sweep range: {0}")]
    InvalidRange(String),

    /// External tool could not be started
    #[error("Failed to launch '{tool}': {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// External tool exited with a failure status
    #[error("'{tool}' failed ({status}), see {log}")]
    ToolFailed {
        tool: String,
        status: String,
        log: String,
    },

    /// Turbine performance output is missing or malformed
    #[error("Performance data error in '{path}': {message}")]
    PerformanceData { path: PathBuf, message: String },

    /// Existing result log has different columns
    #[error("Result log '{path}' has header '{found}', expected '{expected}'")]
    HeaderMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// Result log could not be read or written as CSV
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Summary serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SweepError>,
    },
}

impl SweepError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a missing-key error
    pub fn key_not_found(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self::KeyNotFound {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Create a performance data error
    pub fn perf(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::PerformanceData {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

/// Result type alias for FoamSweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

impl From<std::io::Error> for SweepError {
    fn from(err: std::io::Error) -> Self {
        SweepError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        SweepError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(err: toml::de::Error) -> Self {
        SweepError::ConfigError(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            let path = path.into();
            if e.kind() == std::io::ErrorKind::NotFound {
                SweepError::NotFound(path)
            } else {
                SweepError::io(path, e)
            }
        })
    }
}
