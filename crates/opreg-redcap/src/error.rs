//! Error types for registry configuration and record export.

use thiserror::Error;

/// Configuration problems detected before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required environment variable is not set or empty.
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    /// An environment variable holds a value that cannot be used.
    #[error("environment variable {name} has an invalid value: {value}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

impl ConfigError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingVariable(name) => {
                format!("Registry access is not configured. Set {name} and try again.")
            }
            Self::InvalidValue { name, .. } => {
                format!("Registry configuration is invalid. Check the value of {name}.")
            }
        }
    }
}

/// Errors that can occur while exporting records from the registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Invalid or missing configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {seconds} seconds")]
    Timeout {
        /// Configured timeout.
        seconds: u64,
    },

    /// The registry answered with a non-success status.
    #[error("registry returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// The response body is not a JSON array of flat records.
    #[error("could not decode registry response: {0}")]
    Decode(String),

    /// The payload could not be turned into a data frame.
    #[error("could not build data frame: {0}")]
    Frame(String),
}

impl FetchError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Network(_) => {
                "Could not connect to the registry. Please check your network connection."
                    .to_string()
            }
            Self::Timeout { seconds } => {
                format!("The registry did not respond within {seconds} seconds.")
            }
            Self::Status { status: 401 | 403, .. } => {
                "The registry rejected the API token. Check REDCAP_API_TOKEN.".to_string()
            }
            Self::Status { status, .. } => {
                format!("The registry returned an error (HTTP {status}).")
            }
            Self::Decode(_) | Self::Frame(_) => {
                "The registry response could not be read.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<polars::prelude::PolarsError> for FetchError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Frame(err.to_string())
    }
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = FetchError::Network("connection refused".to_string());
        assert!(err.user_message().contains("network connection"));

        let err = FetchError::Status {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert!(err.user_message().contains("REDCAP_API_TOKEN"));

        let err = FetchError::Status {
            status: 500,
            body: String::new(),
        };
        assert!(err.user_message().contains("HTTP 500"));

        let err = FetchError::from(ConfigError::MissingVariable("REDCAP_API_TOKEN"));
        assert!(err.user_message().contains("REDCAP_API_TOKEN"));
    }

    #[test]
    fn test_timeout_message() {
        let err = FetchError::Timeout { seconds: 30 };
        assert_eq!(err.to_string(), "request timed out after 30 seconds");
        assert!(err.user_message().contains("30 seconds"));
    }
}
