//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid {0} timeout")]
    InvalidProviderTimeout(&'static str),

    #[error("Model name must not be blank")]
    BlankModel,

    #[error("Places base URL must be http(s): {0}")]
    InvalidPlacesUrl(String),

    #[error("Page size must be between 1 and 20")]
    InvalidPageSize,

    #[error("Provider pages must be between 1 and 3")]
    InvalidProviderPages,

    #[error("Session TTL must be positive")]
    InvalidSessionTtl,

    #[error("Sweep interval must be positive")]
    InvalidSweepInterval,
}
