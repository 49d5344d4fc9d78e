// Model client - streaming HTTP communication with the chat-completion backend
#![allow(dead_code)]

use super::types::{ChatRequest, StreamChunk};
use super::{ChatMessage, ModelConfig, ModelError};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Sink for streamed completion tokens, called as each delta arrives
pub type TokenSink<'a> = &'a mut (dyn FnMut(&str) + Send);

/// Collaborator that turns a conversation into a streamed completion.
/// The full reply text is returned after the stream ends; each delta is
/// forwarded to the sink as it arrives.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn stream_completion(
        &self,
        history: &[ChatMessage],
        sink: TokenSink<'_>,
    ) -> Result<String, ModelError>;
}

/// Chat-completion client for an OpenAI-compatible backend
#[derive(Clone)]
pub struct ChatClient {
    config: ModelConfig,
    client: Client,
}

impl ChatClient {
    pub fn new(config: ModelConfig) -> Result<Self, super::ModelInitError> {
        info!(
            endpoint = %config.endpoint,
            model = %config.model,
            timeout_secs = config.request_timeout_secs,
            "initializing model client"
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(super::ModelInitError::ClientError)?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn open_stream(&self, history: &[ChatMessage]) -> Result<reqwest::Response, ModelError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: history.to_vec(),
            stream: true,
        };

        debug!(url = %url, messages_count = history.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", &self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "received HTTP response");

        if status.is_success() {
            Ok(response)
        } else if status.as_u16() == 401 {
            Err(ModelError::AuthenticationFailed(
                response.text().await.unwrap_or_default(),
            ))
        } else if status.is_server_error() {
            Err(ModelError::Backend(response.text().await.unwrap_or_default()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ModelError::InvalidRequest(format!("HTTP {status}: {body}")))
        }
    }
}

#[async_trait]
impl ModelClient for ChatClient {
    /// Stream a completion for the given history. Ctrl-C while waiting on
    /// the stream aborts the whole call with `ModelError::Interrupted`.
    async fn stream_completion(
        &self,
        history: &[ChatMessage],
        sink: TokenSink<'_>,
    ) -> Result<String, ModelError> {
        let start = Instant::now();
        let response = self.open_stream(history).await?;

        let mut stream = response.bytes_stream();
        let mut pending = String::new();
        let mut reply = String::new();

        loop {
            let chunk = tokio::select! {
                chunk = stream.next() => chunk,
                _ = tokio::signal::ctrl_c() => return Err(ModelError::Interrupted),
            };

            let Some(chunk) = chunk else { break };
            let bytes = chunk.map_err(|e| ModelError::Stream(e.to_string()))?;
            pending.push_str(&String::from_utf8_lossy(&bytes));

            // SSE frames are newline-delimited; keep any partial line buffered
            while let Some(pos) = pending.find('\n') {
                let line = pending[..pos].trim().to_string();
                pending.drain(..=pos);

                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim();
                if data == "[DONE]" {
                    continue;
                }

                let parsed: StreamChunk = serde_json::from_str(data)?;
                if let Some(part) = parsed.choices.first().and_then(|c| c.delta.content.as_deref())
                {
                    reply.push_str(part);
                    sink(part);
                }
            }
        }

        info!(
            model = %self.config.model,
            reply_bytes = reply.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "completion stream finished"
        );

        Ok(reply)
    }
}
