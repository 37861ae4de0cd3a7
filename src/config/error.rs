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
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout (must be 1-600 seconds)")]
    InvalidTimeout,

    #[error("Request timeout ({server}s) must exceed the AI provider timeout ({provider}s)")]
    TimeoutOrdering { server: u64, provider: u64 },

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid AI provider timeout (must be 1-300 seconds)")]
    InvalidAiTimeout,

    #[error("Invalid AI base URL: {0}")]
    InvalidAiBaseUrl(String),

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Max output tokens must be positive")]
    InvalidMaxOutputTokens,

    #[error("Support contact info must not be blank")]
    BlankContactInfo,
}
