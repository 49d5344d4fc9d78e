// Error types for the model module
#![allow(dead_code)]

use thiserror::Error;

/// Runtime errors from the model client
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model backend error: {0}")]
    Backend(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Interrupted by user")]
    Interrupted,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Initialization errors for the model client
#[derive(Debug, Error)]
pub enum ModelInitError {
    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("Failed to create HTTP client: {0}")]
    ClientError(#[from] reqwest::Error),
}
