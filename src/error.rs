//! Error types and handling for the Ramble 66 planner

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Main error type for the Ramble 66 planner
///
/// The type is `Clone` because a coalesced weather request hands the same
/// outcome to every caller waiting on it.
#[derive(Error, Debug, Clone)]
pub enum RambleError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Lookup of a named resource failed
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A coalesced request did not settle in time
    #[error("Request '{key}' timed out after {}ms", .after.as_millis())]
    Timeout { key: String, after: Duration },

    /// Key-value store errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io { source: Arc<std::io::Error> },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl From<std::io::Error> for RambleError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source: Arc::new(source),
        }
    }
}

impl RambleError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(key: S, after: Duration) -> Self {
        Self::Timeout {
            key: key.into(),
            after,
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RambleError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            RambleError::Api { .. } => {
                "Unable to reach the weather service. Please try again.".to_string()
            }
            RambleError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            RambleError::NotFound { message } => {
                format!("Not found: {message}")
            }
            RambleError::Timeout { .. } => {
                "The weather service took too long to answer. Please retry.".to_string()
            }
            RambleError::Storage { .. } => {
                "Saved trip data could not be read or written.".to_string()
            }
            RambleError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            RambleError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = RambleError::config("bad port");
        assert!(matches!(config_err, RambleError::Config { .. }));

        let api_err = RambleError::api("connection failed");
        assert!(matches!(api_err, RambleError::Api { .. }));

        let validation_err = RambleError::validation("zero travel days");
        assert!(matches!(validation_err, RambleError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let api_err = RambleError::api("test");
        assert!(api_err.user_message().contains("weather service"));

        let validation_err = RambleError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));

        let timeout = RambleError::timeout("tulsa-2026-10-18", Duration::from_secs(10));
        assert!(timeout.user_message().contains("retry"));
    }

    #[test]
    fn test_timeout_display() {
        let err = RambleError::timeout("amarillo-2026-06-01", Duration::from_millis(10_000));
        assert_eq!(
            err.to_string(),
            "Request 'amarillo-2026-06-01' timed out after 10000ms"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ramble_err: RambleError = io_err.into();
        let cloned = ramble_err.clone();
        assert!(matches!(cloned, RambleError::Io { .. }));
    }
}
