// Tool execution supervisor - deadline-raced invocation of bound tools
#![allow(dead_code)]

use crate::model::ChatMessage;
use crate::tools::error::{Result, ToolError};
use crate::tools::types::{ToolArgs, ToolDescriptor, ToolExecutionResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Fixed error string for an invocation that exceeded its budget
pub const TOOL_TIMEOUT_ERROR: &str = "Timed out the tool";

/// Trait for tool implementations
#[async_trait]
pub trait ToolImpl: Send + Sync {
    /// Run the tool with the supervisor-assembled arguments
    async fn execute(&self, args: ToolArgs) -> Result<Value>;
}

/// A validated descriptor bound to its implementation
#[derive(Clone)]
pub struct BoundTool {
    pub descriptor: ToolDescriptor,
    implementation: Arc<dyn ToolImpl>,
}

impl BoundTool {
    pub fn new(descriptor: ToolDescriptor, implementation: Arc<dyn ToolImpl>) -> Self {
        Self {
            descriptor,
            implementation,
        }
    }
}

/// Invoke a bound tool under its descriptor's deadline.
///
/// The call runs on a dedicated task raced against a timer. On expiry the
/// supervisor stops waiting and reports a timeout; the worker task is not
/// forcibly stopped and may still be running in the background. Any error
/// or panic from the implementation is converted to a textual error.
pub async fn invoke(
    tool: &BoundTool,
    history: Option<&[ChatMessage]>,
    piped_input: Option<&str>,
) -> ToolExecutionResult {
    let descriptor = &tool.descriptor;
    let continue_chat = descriptor.pipe_output;

    let mut args = ToolArgs::default();
    if descriptor.include_history {
        args.chat_history = history.map(<[ChatMessage]>::to_vec);
    }
    if descriptor.pipe_input {
        args.piped_input = Some(piped_input.unwrap_or_default().to_string());
    }

    info!(tool = %descriptor.name, timeout_secs = descriptor.timeout_secs, "invoking tool");

    let implementation = Arc::clone(&tool.implementation);
    let worker = tokio::spawn(async move { implementation.execute(args).await });

    match timeout(Duration::from_secs(descriptor.timeout_secs), worker).await {
        Err(_) => {
            warn!(
                tool = %descriptor.name,
                timeout_secs = descriptor.timeout_secs,
                "tool invocation exceeded its budget, abandoning the call"
            );
            ToolExecutionResult::failure(TOOL_TIMEOUT_ERROR, continue_chat)
        }
        Ok(Err(join_error)) => {
            warn!(tool = %descriptor.name, error = %join_error, "tool task aborted");
            ToolExecutionResult::failure(join_error.to_string(), continue_chat)
        }
        Ok(Ok(Ok(value))) => {
            debug!(tool = %descriptor.name, "tool invocation succeeded");
            ToolExecutionResult::success(value, continue_chat)
        }
        Ok(Ok(Err(error))) => {
            warn!(tool = %descriptor.name, error = %error, "tool invocation failed");
            ToolExecutionResult::failure(error.to_string(), continue_chat)
        }
    }
}

/// Registry of bound tools, looked up by name or alias
#[derive(Default)]
pub struct Supervisor {
    tools: HashMap<String, BoundTool>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: BoundTool) {
        debug!(tool = %tool.descriptor.name, "registering tool");
        self.tools.insert(tool.descriptor.name.clone(), tool);
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up a tool by canonical name or alias
    pub fn find(&self, key: &str) -> Option<&BoundTool> {
        self.tools.get(key).or_else(|| {
            self.tools
                .values()
                .find(|tool| tool.descriptor.alias.as_deref() == Some(key))
        })
    }

    /// Invoke a registered tool by name or alias
    pub async fn invoke_by_name(
        &self,
        key: &str,
        history: Option<&[ChatMessage]>,
        piped_input: Option<&str>,
    ) -> Result<ToolExecutionResult> {
        let tool = self
            .find(key)
            .ok_or_else(|| ToolError::UnknownTool(key.to_string()))?;
        Ok(invoke(tool, history, piped_input).await)
    }
}
