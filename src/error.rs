//! Error types and handling for the propcast service

use thiserror::Error;

/// Main error type for the propcast service
#[derive(Error, Debug)]
pub enum PropcastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Weather provider communication errors
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl PropcastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
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
            PropcastError::Config { .. } => {
                "Configuration error. Please check your config file and environment overrides."
                    .to_string()
            }
            PropcastError::Provider { .. } => {
                "Unable to reach the weather provider. Listings are served without weather data."
                    .to_string()
            }
            PropcastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            PropcastError::Cache { .. } => {
                "Cache operation failed. You may need to clear the cache directory.".to_string()
            }
            PropcastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            PropcastError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = PropcastError::config("missing data file");
        assert!(matches!(config_err, PropcastError::Config { .. }));

        let provider_err = PropcastError::provider("connection failed");
        assert!(matches!(provider_err, PropcastError::Provider { .. }));

        let validation_err = PropcastError::validation("invalid coordinates");
        assert!(matches!(validation_err, PropcastError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = PropcastError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let provider_err = PropcastError::provider("test");
        assert!(provider_err.user_message().contains("weather provider"));

        let validation_err = PropcastError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let propcast_err: PropcastError = io_err.into();
        assert!(matches!(propcast_err, PropcastError::Io { .. }));
    }
}
