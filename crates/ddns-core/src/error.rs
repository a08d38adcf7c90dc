//! Error types for the DDNS system
//!
//! This module defines all error types used throughout the crate.
//!
//! `Config` errors are startup-only and fatal. Every other variant is scoped
//! to a single reconcile cycle: the engine logs it and moves on.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The public IP could not be determined
    #[error("IP resolution failed: {0}")]
    IpResolution(String),

    /// The published record could not be read
    #[error("Failed to read A record {record}: {message}")]
    RecordRead {
        /// Fully qualified record name
        record: String,
        /// Error message
        message: String,
    },

    /// The provider returned no A record for the name
    #[error("No A record published for {0}")]
    EmptyRecordSet(String),

    /// The provider rejected or failed the replacement
    #[error("Failed to write {ip} to A record {record}: {message}")]
    RecordWrite {
        /// Fully qualified record name
        record: String,
        /// The address that was being written
        ip: String,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Runtime failures outside a cycle, e.g. installing signal handlers
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IP resolution error
    pub fn ip_resolution(msg: impl Into<String>) -> Self {
        Self::IpResolution(msg.into())
    }

    /// Create a record read error
    pub fn record_read(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordRead {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Create an empty record set error
    pub fn empty_record_set(record: impl Into<String>) -> Self {
        Self::EmptyRecordSet(record.into())
    }

    /// Create a record write error
    pub fn record_write(
        record: impl Into<String>,
        ip: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RecordWrite {
            record: record.into(),
            ip: ip.into(),
            message: message.into(),
        }
    }

    /// Whether this error must stop the process at startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
