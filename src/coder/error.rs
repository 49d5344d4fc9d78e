// Coder errors

use crate::model::ModelError;
use crate::script::ScriptError;
use thiserror::Error;

/// Coder errors
#[derive(Debug, Error)]
pub enum CoderError {
    #[error("Model error: {0}")]
    Model(ModelError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Interrupted by user")]
    Interrupted,
}

impl From<ModelError> for CoderError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::Interrupted => CoderError::Interrupted,
            other => CoderError::Model(other),
        }
    }
}
