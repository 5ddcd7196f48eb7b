//! Error types for series-sides.
//!
//! The resolution engine itself never fails: inference, reconciliation and
//! enrichment are total functions over well-typed input. Errors only arise
//! at the boundaries (storage reads, configuration, concurrent gathers), and
//! each boundary has its own narrow enum that rolls up into [`SidesError`].

use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Top-level error type for series-sides.
#[derive(Debug, Error)]
pub enum SidesError {
    /// Storage read failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl SidesError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns true if this is a storage error.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if a requested record does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::SeriesNotFound(_)))
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(e) => matches!(e, StorageError::ConnectionError(_)),
            Self::Config(_) | Self::Serialization { .. } | Self::Internal { .. } => false,
        }
    }
}

impl From<serde_json::Error> for SidesError {
    fn from(e: serde_json::Error) -> Self {
        Self::serialization(e.to_string())
    }
}

/// Result type alias for series-sides operations.
pub type SidesResult<T> = Result<T, SidesError>;
