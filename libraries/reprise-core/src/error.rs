/// Core error types for Reprise
use thiserror::Error;

/// Result type alias using `RepriseError`
pub type Result<T> = std::result::Result<T, RepriseError>;

/// Core error type for Reprise
#[derive(Error, Debug)]
pub enum RepriseError {
    /// Storage backend errors (unavailable, quota, permission)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RepriseError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<config::ConfigError> for RepriseError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
