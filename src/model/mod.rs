// Model module - streaming chat-completion client
// See docs/model-design.md for design details
#![allow(dead_code)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{ChatClient, ModelClient, TokenSink};
pub use error::{ModelError, ModelInitError};
pub use types::{ChatMessage, ChatRole, ConversationHistory};

/// Model client configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Chat-completion backend URL
    pub endpoint: String,
    /// API key for authentication
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ModelConfig {
    pub fn from_env() -> Result<Self, ModelInitError> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("CODA_API_KEY")
            .map_err(|_| ModelInitError::ConfigMissing("CODA_API_KEY".into()))?;

        let endpoint = std::env::var("CODA_ENDPOINT")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());

        let model = std::env::var("CODA_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let request_timeout_secs = std::env::var("CODA_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        Ok(Self {
            endpoint,
            api_key,
            model,
            request_timeout_secs,
        })
    }
}
