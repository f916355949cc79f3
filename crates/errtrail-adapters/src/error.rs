//! Leaf error types raised by the adapters.
//!
//! These are plain `thiserror` enums. The config loader wraps them in an
//! [`ErrorNode`](errtrail_core::ErrorNode) before returning; the timestamp
//! hooks return them directly.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or decoding a configuration file.
#[derive(Debug, Error)]
pub enum ConfigerError {
    /// The file extension does not map to a supported format.
    #[error("Unsupported configuration format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// The file or the environment overlay could not be decoded.
    #[error("Failed to decode configuration from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },
}

/// Failures of the timestamp marshaling hooks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeError {
    /// A storage value that is neither null nor a timestamp.
    #[error("invalid time value: {0}")]
    InvalidScanValue(String),

    /// Text that is not an RFC 3339 timestamp.
    #[error("invalid RFC 3339 timestamp '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}
