use std::fmt;

use serde::{Deserialize, Serialize};

/// The six states of the code-generation workflow.
///
/// `Collecting` is initial; `Finished` and `MaxRetriesReached` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    Collecting,
    Generating,
    Executing,
    Fixing,
    Finished,
    MaxRetriesReached,
}

impl WorkflowState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WorkflowState::Finished | WorkflowState::MaxRetriesReached
        )
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowState::Collecting => write!(f, "COLLECTING_INPUTS"),
            WorkflowState::Generating => write!(f, "GENERATING_CODE"),
            WorkflowState::Executing => write!(f, "EXECUTING_CODE"),
            WorkflowState::Fixing => write!(f, "FIXING_ERRORS"),
            WorkflowState::Finished => write!(f, "FINISHED"),
            WorkflowState::MaxRetriesReached => write!(f, "MAX_RETRIES_REACHED"),
        }
    }
}

/// The outcome of running one state's component, fed into [`transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// All three inputs validated in this collecting visit.
    InputsCollected,
    /// At least one input is still unset after the visit's rounds.
    InputsIncomplete,
    /// The bounded number of collecting visits has been used up.
    CollectBudgetExhausted,
    /// The generator produced candidate code.
    CodeGenerated,
    /// The candidate ran to completion.
    ExecutionSucceeded,
    /// The candidate raised a fault; a trace was captured.
    ExecutionFailed,
    /// The repairer produced replacement code and retries remain.
    CodeRepaired,
    /// The repairer ran but the repair budget is now spent.
    FixBudgetExhausted,
}

/// The single transition function of the workflow.
///
/// Every legal transition and its guard lives in this one match. An event
/// that does not apply to the current state holds position, and terminal
/// states ignore every event.
pub fn transition(state: WorkflowState, event: Event) -> WorkflowState {
    use Event::*;
    use WorkflowState::*;

    match (state, event) {
        (Collecting, InputsCollected) => Generating,
        (Collecting, InputsIncomplete) => Collecting,
        (Collecting, CollectBudgetExhausted) => MaxRetriesReached,
        (Generating, CodeGenerated) => Executing,
        (Executing, ExecutionSucceeded) => Finished,
        (Executing, ExecutionFailed) => Fixing,
        (Fixing, CodeRepaired) => Executing,
        (Fixing, FixBudgetExhausted) => MaxRetriesReached,
        (current, _) => current,
    }
}

#[cfg(test)]
mod tests {
    use super::Event::*;
    use super::WorkflowState::*;
    use super::*;

    #[test]
    fn happy_path_walks_all_states() {
        let s = transition(Collecting, InputsCollected);
        assert_eq!(s, Generating);
        let s = transition(s, CodeGenerated);
        assert_eq!(s, Executing);
        let s = transition(s, ExecutionSucceeded);
        assert_eq!(s, Finished);
        assert!(s.is_terminal());
    }

    #[test]
    fn collecting_self_loops_on_incomplete_inputs() {
        assert_eq!(transition(Collecting, InputsIncomplete), Collecting);
    }

    #[test]
    fn collecting_budget_exhaustion_is_terminal() {
        let s = transition(Collecting, CollectBudgetExhausted);
        assert_eq!(s, MaxRetriesReached);
        assert!(s.is_terminal());
    }

    #[test]
    fn repair_loop_cycles_until_budget_spent() {
        let s = transition(Executing, ExecutionFailed);
        assert_eq!(s, Fixing);
        let s = transition(s, CodeRepaired);
        assert_eq!(s, Executing);
        let s = transition(s, ExecutionFailed);
        assert_eq!(s, Fixing);
        let s = transition(s, FixBudgetExhausted);
        assert_eq!(s, MaxRetriesReached);
    }

    #[test]
    fn terminal_states_ignore_events() {
        assert_eq!(transition(Finished, ExecutionFailed), Finished);
        assert_eq!(transition(MaxRetriesReached, InputsCollected), MaxRetriesReached);
    }

    #[test]
    fn mismatched_events_hold_position() {
        assert_eq!(transition(Generating, ExecutionFailed), Generating);
        assert_eq!(transition(Executing, InputsCollected), Executing);
    }

    #[test]
    fn only_finished_and_max_retries_are_terminal() {
        assert!(!Collecting.is_terminal());
        assert!(!Generating.is_terminal());
        assert!(!Executing.is_terminal());
        assert!(!Fixing.is_terminal());
        assert!(Finished.is_terminal());
        assert!(MaxRetriesReached.is_terminal());
    }

    #[test]
    fn state_display() {
        assert_eq!(Collecting.to_string(), "COLLECTING_INPUTS");
        assert_eq!(Fixing.to_string(), "FIXING_ERRORS");
        assert_eq!(MaxRetriesReached.to_string(), "MAX_RETRIES_REACHED");
    }
}
