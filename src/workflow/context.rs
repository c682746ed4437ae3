use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::state::WorkflowState;
use crate::dataset::DatasetLocation;

/// The machine-learning task to solve. Anything outside this set is
/// rejected during collection, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    Classification,
    Regression,
    Clustering,
}

impl Task {
    pub const ALL: [Task; 3] = [Task::Classification, Task::Regression, Task::Clustering];
}

#[derive(Debug, Error)]
#[error("unsupported machine learning task: {0}")]
pub struct UnknownTask(pub String);

impl FromStr for Task {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classification" => Ok(Task::Classification),
            "regression" => Ok(Task::Regression),
            "clustering" => Ok(Task::Clustering),
            other => Err(UnknownTask(other.to_string())),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Classification => write!(f, "classification"),
            Task::Regression => write!(f, "regression"),
            Task::Clustering => write!(f, "clustering"),
        }
    }
}

/// The fully validated inputs the workflow runs on. All-or-nothing: a
/// partially filled set is never represented by this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedInputs {
    pub dataset_location: DatasetLocation,
    pub task: Task,
    pub target_column: String,
}

/// A captured fault from one failed execution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
    /// Short description of what went wrong.
    pub message: String,
    /// Full diagnostic trace, as emitted by the failing process.
    pub trace: String,
}

impl fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Shared mutable context for one workflow run, exclusively owned by the
/// engine. Each state handler touches only the fields relevant to its
/// state: collecting writes `inputs`, generating and fixing write `code`,
/// executing reads `code` and writes `last_error`/`success`.
#[derive(Debug)]
pub struct WorkflowContext {
    /// `Some` only when every field passed its individual validator.
    pub inputs: Option<CollectedInputs>,
    /// Current candidate source. Empty until the first generation.
    pub code: String,
    /// Error captured from the most recent failed execution.
    pub last_error: Option<ExecutionFailure>,
    /// Tri-state execution result: unknown / succeeded / failed.
    pub success: Option<bool>,
    documentation: String,
}

impl WorkflowContext {
    pub fn new(documentation: String) -> Self {
        Self {
            inputs: None,
            code: String::new(),
            last_error: None,
            success: None,
            documentation,
        }
    }

    /// Scraped library documentation, set once at construction.
    pub fn documentation(&self) -> &str {
        &self.documentation
    }
}

/// Append-only log entry produced on every state visit. Observability
/// only; control logic never reads these.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRecord {
    pub from: WorkflowState,
    pub to: WorkflowState,
    pub component: &'static str,
    pub at: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn new(from: WorkflowState, to: WorkflowState, component: &'static str) -> Self {
        Self {
            from,
            to,
            component,
            at: Utc::now(),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowOutcome {
    /// The candidate code executed successfully.
    Completed,
    /// The repair budget was spent without a successful execution.
    RetriesExhausted,
    /// The collecting-visit budget was spent without valid inputs.
    CollectionExhausted,
    /// The whole-run deadline expired.
    DeadlineExceeded,
}

impl fmt::Display for WorkflowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowOutcome::Completed => write!(f, "completed"),
            WorkflowOutcome::RetriesExhausted => write!(f, "retries exhausted"),
            WorkflowOutcome::CollectionExhausted => write!(f, "collection exhausted"),
            WorkflowOutcome::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Structured record of a finished run, produced by the engine at loop
/// exit.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub final_state: WorkflowState,
    pub outcome: WorkflowOutcome,
    pub collect_visits: u32,
    pub fix_attempts: u32,
    pub transitions: Vec<TransitionRecord>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl RunReport {
    pub fn new(
        final_state: WorkflowState,
        outcome: WorkflowOutcome,
        collect_visits: u32,
        fix_attempts: u32,
        transitions: Vec<TransitionRecord>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let completed_at = Utc::now();
        let duration_ms = (completed_at - started_at).num_milliseconds();
        Self {
            run_id: Uuid::new_v4().to_string(),
            final_state,
            outcome,
            collect_visits,
            fix_attempts,
            transitions,
            started_at,
            completed_at,
            duration_ms,
        }
    }
}
