// Shell tool implementation
#![allow(dead_code)]

use crate::tools::error::{Result, ToolError};
use crate::tools::supervisor::ToolImpl;
use crate::tools::types::{ToolArgs, ToolDescriptor};
use crate::tools::validate::DEFAULT_TOOL_TIMEOUT_SECS;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

/// Builtin shell tool: runs the piped question text as a shell command
pub struct ShellTool {
    shell: String,
}

impl ShellTool {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Descriptor used when tools.toml does not override it
    pub fn default_descriptor() -> ToolDescriptor {
        ToolDescriptor {
            name: "shell".to_string(),
            alias: Some("sh".to_string()),
            timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            include_history: false,
            pipe_input: true,
            pipe_output: true,
        }
    }
}

impl Default for ShellTool {
    fn default() -> Self {
        Self::new("/bin/sh")
    }
}

#[async_trait]
impl ToolImpl for ShellTool {
    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let start = Instant::now();

        let command = args.piped_input.unwrap_or_default();
        if command.trim().is_empty() {
            return Err(ToolError::InvalidInput(
                "shell".to_string(),
                "empty command".to_string(),
            ));
        }

        debug!(command = %command, "executing shell command");

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&command)
            .output()
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let mut content = String::new();

        if !output.stdout.is_empty() {
            content.push_str("[stdout]\n");
            content.push_str(&String::from_utf8_lossy(&output.stdout));
        }

        if !output.stderr.is_empty() {
            if !content.is_empty() {
                content.push('\n');
            }
            content.push_str("[stderr]\n");
            content.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        let exit_code = output.status.code().unwrap_or(-1);

        info!(
            command = %command.chars().take(100).collect::<String>(),
            duration_ms = start.elapsed().as_millis() as u64,
            exit_code = exit_code,
            output_bytes = content.len(),
            "shell command executed"
        );

        if !output.status.success() {
            return Err(ToolError::ExecutionFailed(format!(
                "exit code {exit_code}: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(Value::String(content))
    }
}
