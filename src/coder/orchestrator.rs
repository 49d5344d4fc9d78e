// Retry orchestrator - generate, confirm, run, classify, retry

use crate::model::{ChatMessage, ConversationHistory, ModelClient};
use crate::script::{ExecutionResult, GeneratedScript, ScriptRunner};

use super::config::CoderConfig;
use super::error::CoderError;
use super::types::{Confirmation, CoderOutcome, RetryState, SessionStatus};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Collaborator for everything the orchestrator needs from the user:
/// line input at its waiting points and display of streamed or buffered
/// output. Implementations own all user-visible formatting.
#[async_trait]
pub trait UserInteraction: Send + Sync {
    /// Prompt for one line of input. A user interrupt at this waiting
    /// point surfaces as `CoderError::Interrupted`.
    async fn ask(&self, prompt: &str) -> Result<String, CoderError>;

    /// One streamed model token, shown as it arrives
    fn stream_chunk(&self, chunk: &str);

    /// Buffered output of a non-interactive run, shown after the fact
    fn show_output(&self, result: &ExecutionResult);

    /// A failure reason, shown ahead of the retry offer
    fn show_issue(&self, issue: &str);

    /// Free-form status line
    fn notify(&self, message: &str);
}

fn fix_request(code: &str, issue: &str) -> String {
    format!(
        "Here was the previous script that failed or produced no output:\n{code}\nError or issue:\n{issue}\nPlease return a FIXED version."
    )
}

/// The retry orchestrator. Owns the conversation history for the duration
/// of one `run` call; appends on every model call and every execution
/// outcome, never removes.
pub struct Coder {
    model: Arc<dyn ModelClient>,
    ui: Arc<dyn UserInteraction>,
    runner: ScriptRunner,
    config: CoderConfig,
}

impl Coder {
    pub fn new(
        model: Arc<dyn ModelClient>,
        ui: Arc<dyn UserInteraction>,
        runner: ScriptRunner,
        config: CoderConfig,
    ) -> Self {
        Self {
            model,
            ui,
            runner,
            config,
        }
    }

    async fn stream_to_user(&self, history: &[ChatMessage]) -> Result<String, CoderError> {
        let ui = Arc::clone(&self.ui);
        let mut sink = move |chunk: &str| ui.stream_chunk(chunk);
        let reply = self.model.stream_completion(history, &mut sink).await?;
        Ok(reply.trim().to_string())
    }

    /// Ask for confirmation until the reply parses; invalid short replies
    /// re-ask rather than re-generating.
    async fn confirm(&self) -> Result<Confirmation, CoderError> {
        loop {
            let answer = self.ui.ask("Run this code? [Y/n] or modify? ").await?;
            match Confirmation::parse(&answer, self.config.modify_threshold) {
                Confirmation::Invalid => {
                    self.ui.notify(
                        "Invalid input. Please enter 'y', 'n', or a modification prompt (>5 characters).",
                    );
                }
                decision => return Ok(decision),
            }
        }
    }

    /// One further model call using only the latest history entry, under
    /// the answer-synthesis instruction.
    async fn synthesize_answer(
        &self,
        history: &ConversationHistory,
    ) -> Result<String, CoderError> {
        let last = history
            .last()
            .cloned()
            .ok_or_else(|| CoderError::Input("empty history".to_string()))?;
        let answer_history = vec![ChatMessage::system(&self.config.prompt_answer), last];

        self.ui.notify("Response:");
        self.stream_to_user(&answer_history).await
    }

    /// Run one full request: generate a script, confirm with the user,
    /// execute, and loop on failure until success, budget exhaustion, or
    /// abort. The returned history carries every model reply and execution
    /// outcome in append order.
    pub async fn run(&self, initial_prompt: &str) -> Result<CoderOutcome, CoderError> {
        let mut history: ConversationHistory = vec![
            ChatMessage::system(&self.config.prompt_code),
            ChatMessage::user(initial_prompt),
        ];
        let mut state = RetryState::new(self.config.max_retries);

        loop {
            // Prompting
            info!(attempt = state.attempts + 1, "generating code");
            let reply = self.stream_to_user(&history).await?;
            let script = GeneratedScript::new(reply);
            history.push(ChatMessage::assistant(&script.raw));

            // AwaitingConfirmation
            match self.confirm().await? {
                Confirmation::Accept => {}
                Confirmation::Reject => {
                    info!("user rejected the generated code");
                    return Ok(CoderOutcome {
                        status: SessionStatus::Aborted,
                        history,
                    });
                }
                Confirmation::Modify(instruction) => {
                    info!("user supplied a modification instruction");
                    history.push(ChatMessage::user(instruction));
                    continue;
                }
                Confirmation::Invalid => unreachable!("confirm() never returns Invalid"),
            }

            // Running
            let result = self.runner.run(&script.sanitized).await?;
            if !result.interactive {
                self.ui.show_output(&result);
            }

            if result.is_success() {
                history.push(ChatMessage::user(format!(
                    "Execution output:\n{}",
                    result.stdout
                )));
                let answer = self.synthesize_answer(&history).await?;
                history.push(ChatMessage::assistant(answer));
                return Ok(CoderOutcome {
                    status: SessionStatus::Success,
                    history,
                });
            }

            // RetryableFailure
            let issue = result
                .failure_reason()
                .unwrap_or_else(|| "[no output produced]".to_string());
            warn!(attempt = state.attempts + 1, issue = %issue, "execution failed");
            self.ui.show_issue(&issue);

            state.record_failure(&script.sanitized, &issue);
            history.push(ChatMessage::user(fix_request(
                &state.prev_code,
                &state.prev_issue,
            )));

            if state.budget_exhausted() {
                warn!(attempts = state.attempts, "retry budget exhausted");
                self.ui.notify("Reached maximum retries - exiting.");
                return Ok(CoderOutcome {
                    status: SessionStatus::FatalFailure,
                    history,
                });
            }

            let again = self.ui.ask("Attempt to auto-fix and rerun? [y/N]: ").await?;
            if !again.trim().to_lowercase().starts_with('y') {
                info!("user declined auto-fix");
                return Ok(CoderOutcome {
                    status: SessionStatus::Aborted,
                    history,
                });
            }
        }
    }
}
