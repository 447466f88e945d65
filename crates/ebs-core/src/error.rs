//! Core error types for ebs-core.
//!
//! This module defines the error hierarchy using thiserror. Every calendar,
//! walker and forecast operation returns one of these instead of panicking,
//! so callers can tell a malformed date apart from an unschedulable calendar.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ebs-core.
#[derive(Error, Debug)]
pub enum EbsError {
    /// A date literal did not match `YYYY-MM-DDTHH:MM:SS`
    #[error("Bad time string: '{input}' (expected YYYY-MM-DDTHH:MM:SS)")]
    BadFormat { input: String },

    /// Date arithmetic left the representable range
    #[error("Time out of range: {detail}")]
    OutOfRange { detail: String },

    /// No completion date could be found within the day ceiling
    #[error("Incomplete task: work could not be scheduled within {days} days")]
    IncompleteTask { days: u64 },

    /// The host clock could not be read
    #[error("Current time unavailable")]
    TimeUnavailable,

    /// A bounded collection would grow past its configured capacity
    #[error("Capacity exceeded for {collection}: at most {capacity} entries")]
    CapacityExceeded {
        collection: &'static str,
        capacity: usize,
    },

    /// The work sheet could not be read or parsed
    #[error("Failed to read work sheet {path}: {message}")]
    WorkSheet { path: PathBuf, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EbsError {
    pub(crate) fn out_of_range(detail: impl Into<String>) -> Self {
        EbsError::OutOfRange {
            detail: detail.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Key not present in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for EbsError
pub type Result<T, E = EbsError> = std::result::Result<T, E>;
