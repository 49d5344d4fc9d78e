// Script runner - process lifecycle, output draining, deadline enforcement
#![allow(dead_code)]

use crate::script::config::ScriptConfig;
use crate::script::error::{Result, ScriptError};
use crate::script::types::{Classification, ExecutionResult};
use owo_colors::OwoColorize;
use std::io::Write;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Syntactic check for a blocking read from standard input.
///
/// A textual pattern match, not a reachability analysis: a script that
/// calls `input()` conditionally is still flagged, and a script that blocks
/// on stdin some other way is not. Misdetected scripts are caught by the
/// execution deadline instead.
pub fn detect_interactive(code: &str) -> bool {
    code.contains("input(")
}

/// Which terminal stream a drained byte is echoed to
#[derive(Debug, Clone, Copy)]
enum EchoStream {
    Stdout,
    Stderr,
}

fn echo_byte(stream: EchoStream, byte: u8) {
    match stream {
        EchoStream::Stdout => {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(&[byte]);
            let _ = out.flush();
        }
        EchoStream::Stderr => {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "{}", String::from_utf8_lossy(&[byte]).red());
            let _ = err.flush();
        }
    }
}

/// Drain one pipe to EOF, byte by byte, optionally echoing each byte to the
/// terminal as it arrives. Returns the complete captured stream.
async fn drain<R>(mut pipe: R, echo: Option<EchoStream>) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match pipe.read(&mut byte).await {
            Ok(0) => break,
            Ok(_) => {
                if let Some(stream) = echo {
                    echo_byte(stream, byte[0]);
                }
                captured.push(byte[0]);
            }
            Err(_) => break,
        }
    }
    captured
}

#[cfg(unix)]
fn kill_process_group(pid: u32) {
    // Negative PID targets the whole group; the child was spawned with
    // process_group(0), so its PID is the PGID.
    unsafe {
        libc::kill(-(pid as libc::pid_t), libc::SIGKILL);
    }
}

/// Runs sanitized scripts as supervised child processes
pub struct ScriptRunner {
    config: ScriptConfig,
}

impl ScriptRunner {
    pub fn new(config: ScriptConfig) -> Self {
        Self { config }
    }

    /// Run with the configured default timeout
    pub async fn run(&self, code: &str) -> Result<ExecutionResult> {
        self.run_with_timeout(code, Duration::from_secs(self.config.timeout_secs))
            .await
    }

    /// Execute `code` as a child process under a wall-clock deadline.
    ///
    /// Interactive scripts (per `detect_interactive`) have both output
    /// streams echoed to the terminal in real time while being captured;
    /// non-interactive scripts are captured silently. Both reader tasks are
    /// joined before this returns, so the captured output is complete on
    /// every path. The temporary script file is removed on every exit path.
    pub async fn run_with_timeout(&self, code: &str, deadline: Duration) -> Result<ExecutionResult> {
        let start = Instant::now();
        let interactive = detect_interactive(code);

        let mut file = tempfile::Builder::new()
            .prefix("coda-")
            .suffix(".py")
            .tempfile()?;
        file.write_all(code.as_bytes())?;
        file.flush()?;
        // TempPath removes the file when dropped, on every exit path below
        let script_path = file.into_temp_path();

        debug!(
            interpreter = %self.config.interpreter,
            script = %script_path.display(),
            interactive = interactive,
            timeout_secs = deadline.as_secs(),
            "spawning script"
        );

        let mut command = Command::new(&self.config.interpreter);
        command
            .arg(&*script_path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        let mut child = command
            .spawn()
            .map_err(|e| ScriptError::SpawnFailed(self.config.interpreter.clone(), e.to_string()))?;

        let pid = child.id();

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ScriptError::OutputCapture("stdout pipe missing".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ScriptError::OutputCapture("stderr pipe missing".to_string()))?;

        let echo = interactive && self.config.echo;
        let out_task = tokio::spawn(drain(stdout, echo.then_some(EchoStream::Stdout)));
        let err_task = tokio::spawn(drain(stderr, echo.then_some(EchoStream::Stderr)));

        let wait_result = timeout(deadline, child.wait()).await;
        let (timed_out, exit_ok) = match wait_result {
            Ok(Ok(status)) => (false, status.success()),
            Ok(Err(e)) => return Err(ScriptError::Io(e)),
            Err(_) => {
                warn!(
                    pid = pid,
                    timeout_secs = deadline.as_secs(),
                    "execution deadline elapsed, killing process group"
                );
                #[cfg(unix)]
                {
                    if let Some(pid) = pid {
                        kill_process_group(pid);
                    }
                }
                #[cfg(not(unix))]
                {
                    let _ = child.start_kill();
                }
                let _ = child.wait().await;
                (true, false)
            }
        };

        // Join both readers so no output is lost or reordered relative to
        // process exit.
        let stdout_bytes = out_task
            .await
            .map_err(|e| ScriptError::OutputCapture(e.to_string()))?;
        let stderr_bytes = err_task
            .await
            .map_err(|e| ScriptError::OutputCapture(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&stdout_bytes).trim().to_string();
        let stderr = String::from_utf8_lossy(&stderr_bytes).trim().to_string();

        let classification = if timed_out {
            Classification::Timeout
        } else if exit_ok && !stdout.is_empty() && stderr.is_empty() {
            Classification::Success
        } else {
            Classification::ProcessError
        };

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            stdout_bytes = stdout_bytes.len(),
            stderr_bytes = stderr_bytes.len(),
            interactive = interactive,
            classification = ?classification,
            "script execution finished"
        );

        drop(script_path);

        Ok(ExecutionResult {
            stdout,
            stderr,
            classification,
            interactive,
        })
    }
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new(ScriptConfig::default())
    }
}
