pub mod context;
pub mod state;

pub use context::{
    CollectedInputs, ExecutionFailure, RunReport, Task, TransitionRecord, WorkflowContext,
    WorkflowOutcome,
};
pub use state::{Event, WorkflowState, transition};
