mod coder;
mod model;
mod script;
mod tools;

use coder::{Coder, CoderConfig, CoderError, SessionStatus, UserInteraction};
use model::{ChatClient, ConversationHistory, ModelConfig};
use script::{ExecutionResult, ScriptConfig, ScriptRunner};
use tools::{BoundTool, ShellTool, Supervisor, ToolValidation, ToolsConfig};

use async_trait::async_trait;
use clap::Parser;
use owo_colors::OwoColorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{Level, error, info, warn};
use tracing_subscriber::fmt;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "coda")]
#[command(about = "Chat client that writes, runs, and repairs scripts")]
struct Args {
    /// Model identifier (overrides CODA_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum automatic retries after a failed run
    #[arg(short = 'r', long)]
    max_retries: Option<u32>,

    /// Script execution timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Interpreter used to run generated scripts
    #[arg(long)]
    interpreter: Option<String>,

    /// Tool descriptor file (defaults to ~/.coda/tools.toml)
    #[arg(long)]
    tools: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Terminal-backed user interaction: rustyline for input, colored output
struct CliInteraction {
    editor: Arc<Mutex<DefaultEditor>>,
}

impl CliInteraction {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            editor: Arc::new(Mutex::new(DefaultEditor::new()?)),
        })
    }
}

#[async_trait]
impl UserInteraction for CliInteraction {
    async fn ask(&self, prompt: &str) -> Result<String, CoderError> {
        let editor = Arc::clone(&self.editor);
        let prompt = prompt.blue().to_string();
        tokio::task::spawn_blocking(move || {
            let mut editor = editor
                .lock()
                .map_err(|_| CoderError::Input("readline lock poisoned".to_string()))?;
            match editor.readline(&prompt) {
                Ok(line) => {
                    let _ = editor.add_history_entry(&line);
                    Ok(line)
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    Err(CoderError::Interrupted)
                }
                Err(e) => Err(CoderError::Input(e.to_string())),
            }
        })
        .await
        .map_err(|e| CoderError::Input(e.to_string()))?
    }

    fn stream_chunk(&self, chunk: &str) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{}", chunk.green());
        let _ = out.flush();
    }

    fn show_output(&self, result: &ExecutionResult) {
        if !result.stdout.is_empty() {
            println!("{}", result.stdout);
        }
        if !result.stderr.is_empty() {
            eprintln!("{}", result.stderr.red());
        }
    }

    fn show_issue(&self, issue: &str) {
        eprintln!("{}", "Issue detected:".red());
        eprintln!("{}", issue.red());
    }

    fn notify(&self, message: &str) {
        println!("{}", message.blue());
    }
}

/// Load tool specs, validate them, and bind the builtin implementations.
/// A spec named "shell" overrides the builtin shell descriptor; valid specs
/// with no matching implementation are reported and skipped.
fn build_supervisor(config: &ToolsConfig) -> Supervisor {
    let mut supervisor = Supervisor::new();
    let mut shell_descriptor = ShellTool::default_descriptor();

    match tools::config::load_specs(&config.descriptor_path) {
        Ok(specs) => {
            for validation in tools::validate_specs(&specs) {
                match validation {
                    ToolValidation::Valid(descriptor) => {
                        if descriptor.name == "shell" {
                            shell_descriptor = descriptor;
                        } else {
                            warn!(
                                tool = %descriptor.name,
                                "no implementation registered for tool, skipping"
                            );
                        }
                    }
                    ToolValidation::Invalid { id, reasons } => {
                        for reason in reasons {
                            warn!(tool = %id, reason = %reason, "invalid tool spec");
                        }
                    }
                }
            }
        }
        Err(e) => warn!(error = %e, "failed to load tool specs"),
    }

    supervisor.register(BoundTool::new(
        shell_descriptor,
        Arc::new(ShellTool::default()),
    ));
    supervisor
}

fn tool_value_to_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => serde_json::to_string_pretty(&other).unwrap_or_default(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_target(true)
        .init();

    let mut model_config = ModelConfig::from_env()?;
    if let Some(model) = args.model {
        model_config.model = model;
    }

    let mut coder_config = CoderConfig::from_env();
    if let Some(max_retries) = args.max_retries {
        coder_config.max_retries = max_retries;
    }

    let mut script_config = ScriptConfig::default();
    if let Some(timeout) = args.timeout {
        script_config.timeout_secs = timeout;
    }
    if let Some(interpreter) = args.interpreter {
        script_config.interpreter = interpreter;
    }

    info!(
        model = %model_config.model,
        max_retries = coder_config.max_retries,
        timeout_secs = script_config.timeout_secs,
        "Configuration loaded"
    );

    let client = Arc::new(ChatClient::new(model_config)?);
    let ui = Arc::new(CliInteraction::new()?);
    let runner = ScriptRunner::new(script_config);
    let coder = Coder::new(
        client,
        Arc::clone(&ui) as Arc<dyn UserInteraction>,
        runner,
        coder_config,
    );

    let tools_config = args
        .tools
        .map(|descriptor_path| ToolsConfig { descriptor_path })
        .unwrap_or_default();
    let supervisor = build_supervisor(&tools_config);

    let mut last_history: ConversationHistory = Vec::new();

    loop {
        let input = match ui.ask("Prompt: ").await {
            Ok(line) => line.trim().to_string(),
            Err(CoderError::Interrupted) => break,
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        };

        if input.is_empty() {
            continue;
        }

        // "!<name> <text>" invokes a registered tool instead of the coder
        let prompt = if let Some(rest) = input.strip_prefix('!') {
            let (key, text) = rest.split_once(' ').unwrap_or((rest, ""));
            match supervisor
                .invoke_by_name(key, Some(last_history.as_slice()), Some(text))
                .await
            {
                Ok(outcome) => {
                    if let Some(tool_error) = outcome.error {
                        eprintln!("{}", tool_error.red());
                        continue;
                    }
                    let text = outcome.result.map(tool_value_to_text).unwrap_or_default();
                    if !outcome.continue_chat {
                        println!("{text}");
                        continue;
                    }
                    text
                }
                Err(e) => {
                    eprintln!("{}", e.to_string().red());
                    continue;
                }
            }
        } else {
            input
        };

        match coder.run(&prompt).await {
            Ok(outcome) => {
                match outcome.status {
                    SessionStatus::Success => {}
                    SessionStatus::FatalFailure => {
                        eprintln!("{}", "Could not produce a working script.".red());
                    }
                    SessionStatus::Aborted => {
                        println!("{}", "Okay, not running it.".blue());
                    }
                }
                last_history = outcome.history;
            }
            Err(CoderError::Interrupted) => {
                println!();
                continue;
            }
            Err(e) => {
                error!(error = %e, "request failed");
                eprintln!("{}", e.to_string().red());
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
