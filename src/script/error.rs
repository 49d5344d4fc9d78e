// Error types for the script module
#![allow(dead_code)]

use thiserror::Error;

/// Script runner error types
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to spawn interpreter '{0}': {1}")]
    SpawnFailed(String, String),

    #[error("Failed to capture output: {0}")]
    OutputCapture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScriptError>;
