// Data types for the tools module
#![allow(dead_code)]

use crate::model::ConversationHistory;
use serde_json::Value;

/// Metadata for one externally pluggable capability. Validated once at load
/// time; the supervisor assumes a descriptor handed to it is already valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    /// Canonical tool name
    pub name: String,
    /// Optional short alias the chat loop matches against
    pub alias: Option<String>,
    /// Wall-clock budget for one invocation, in seconds
    pub timeout_secs: u64,
    /// Pass the running conversation to the implementation
    pub include_history: bool,
    /// Pass the user's question text to the implementation
    pub pipe_input: bool,
    /// Feed the tool's result back as the next turn's input
    pub pipe_output: bool,
}

/// Call arguments assembled from descriptor flags
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    pub chat_history: Option<ConversationHistory>,
    pub piped_input: Option<String>,
}

/// Outcome of one supervised tool invocation. `result` and `error` are
/// mutually exclusive.
#[derive(Debug, Clone)]
pub struct ToolExecutionResult {
    pub result: Option<Value>,
    pub error: Option<String>,
    /// Mirrors the descriptor's pipe_output flag
    pub continue_chat: bool,
}

impl ToolExecutionResult {
    pub fn success(value: Value, continue_chat: bool) -> Self {
        Self {
            result: Some(value),
            error: None,
            continue_chat,
        }
    }

    pub fn failure(error: impl Into<String>, continue_chat: bool) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
            continue_chat,
        }
    }
}
