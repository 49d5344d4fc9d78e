// Data types for the script module
#![allow(dead_code)]

use crate::script::runner::detect_interactive;
use crate::script::sanitize::sanitize;

/// A candidate script produced by the model. Immutable after creation;
/// superseded, not mutated, on each retry iteration.
#[derive(Debug, Clone)]
pub struct GeneratedScript {
    /// The model reply as received
    pub raw: String,
    /// Fence-stripped executable source
    pub sanitized: String,
    /// Whether the source appears to block on standard input
    pub interactive: bool,
}

impl GeneratedScript {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let sanitized = sanitize(&raw);
        let interactive = detect_interactive(&sanitized);
        Self {
            raw,
            sanitized,
            interactive,
        }
    }
}

/// Exit classification for one script execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Clean exit, non-empty stdout, empty stderr
    Success,
    /// Non-zero exit, stderr output, or no output produced
    ProcessError,
    /// Deadline elapsed; the process group was killed
    Timeout,
}

/// Sentinel failure reason for a run that produced no output at all
pub const NO_OUTPUT_SENTINEL: &str = "[no output produced]";

/// Fixed failure reason attached to a timed-out run
pub const TIMEOUT_REASON: &str = "[execution timed out]";

/// Result of one script execution. Produced exactly once per run; owned by
/// the caller.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub classification: Classification,
    /// Whether output was already streamed to the terminal during the run
    pub interactive: bool,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.classification == Classification::Success
    }

    /// The failure reason fed back to the model: captured stderr, a fixed
    /// timeout string, or the no-output sentinel.
    pub fn failure_reason(&self) -> Option<String> {
        match self.classification {
            Classification::Success => None,
            Classification::Timeout => Some(TIMEOUT_REASON.to_string()),
            Classification::ProcessError => {
                if self.stderr.is_empty() {
                    Some(NO_OUTPUT_SENTINEL.to_string())
                } else {
                    Some(self.stderr.clone())
                }
            }
        }
    }
}
