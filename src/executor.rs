//! Sandboxed execution of candidate code.
//!
//! Candidates run in a child process under an interpreter, from a scratch
//! directory, with a wall-clock timeout. The host process never executes
//! candidate text in its own memory space; a fault comes back as a captured
//! trace, exactly one per failed attempt. Retrying is the engine's job.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::ExecutorError;
use crate::workflow::ExecutionFailure;

/// Result of one execution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    Failure(ExecutionFailure),
}

/// Runs candidate code, a seam so tests can script execution results.
pub trait CodeRunner {
    async fn run(&self, code: &str) -> Result<ExecutionOutcome, ExecutorError>;
}

/// Executes candidates with a Python interpreter in a temp directory.
pub struct PythonRunner {
    interpreter: String,
    timeout: Duration,
}

impl PythonRunner {
    pub fn new(interpreter: impl Into<String>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout,
        }
    }
}

impl CodeRunner for PythonRunner {
    async fn run(&self, code: &str) -> Result<ExecutionOutcome, ExecutorError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("candidate.py");
        std::fs::write(&path, code)?;

        let result = tokio::time::timeout(
            self.timeout,
            Command::new(&self.interpreter)
                .arg(&path)
                .current_dir(dir.path())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let output = match result {
            Err(_elapsed) => {
                let message = format!(
                    "execution timed out after {}s",
                    self.timeout.as_secs()
                );
                return Ok(ExecutionOutcome::Failure(ExecutionFailure {
                    trace: message.clone(),
                    message,
                }));
            }
            Ok(output) => output?,
        };

        if output.status.success() {
            return Ok(ExecutionOutcome::Success);
        }

        let trace = String::from_utf8_lossy(&output.stderr).to_string();
        Ok(ExecutionOutcome::Failure(ExecutionFailure {
            message: format!("process exited with {}", output.status),
            trace,
        }))
    }
}
