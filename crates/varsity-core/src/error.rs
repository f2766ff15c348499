//! Error types for the Varsity application.

use thiserror::Error;

/// A shared error type for the entire Varsity application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum VarsityError {
    /// Configuration error (missing or invalid credentials/settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A remote backend call failed (HTTP transport or non-success status)
    #[error("{provider} request failed: {message}")]
    Backend {
        provider: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// The backend answered but the expected content was absent
    #[error("{0} returned no content in the response")]
    EmptyResponse(&'static str),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VarsityError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Backend error
    pub fn backend(
        provider: &'static str,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Backend {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a backend error
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }
}

impl From<std::io::Error> for VarsityError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for VarsityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, VarsityError>`.
pub type Result<T> = std::result::Result<T, VarsityError>;
