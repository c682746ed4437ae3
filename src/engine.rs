//! The workflow engine: drives collection, generation, execution and repair
//! through the state machine until a terminal state, producing one
//! transition record per state visit and a structured run report at exit.

use std::time::Instant;

use anyhow::{Result, anyhow};
use chrono::Utc;

use crate::codegen::CodeGenerator;
use crate::dataset::ColumnProbe;
use crate::executor::{CodeRunner, ExecutionOutcome};
use crate::extractor::{EntityExtractor, UserInput};
use crate::generation::TextGenerator;
use crate::repairer::Repairer;
use crate::workflow::{
    Event, RunReport, TransitionRecord, WorkflowContext, WorkflowOutcome, WorkflowState,
    transition,
};

/// Budgets that guarantee termination: an attempt ceiling for the repair
/// loop, a visit ceiling for the collecting self-loop, and a wall-clock
/// deadline so a hung backend cannot stall the run forever.
#[derive(Debug, Clone)]
pub struct EngineLimits {
    /// Total repair attempts per run, never reset between errors.
    pub max_fix_retries: u32,
    /// Total `Collecting` visits before giving up on the user.
    pub max_collect_visits: u32,
    /// Whole-run deadline, checked before every state visit.
    pub run_deadline: std::time::Duration,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_fix_retries: 3,
            max_collect_visits: 3,
            run_deadline: std::time::Duration::from_secs(1800),
        }
    }
}

/// Composes the extractor, generator, executor and repairer into the
/// workflow state machine. Exclusively owns the context for the duration of
/// a run; there is one logical thread of control and no parallelism between
/// states.
pub struct WorkflowEngine<G, R, P, U> {
    generator: G,
    runner: R,
    probe: P,
    input: U,
    extractor: EntityExtractor,
    limits: EngineLimits,
    verbose: bool,
}

impl<G, R, P, U> WorkflowEngine<G, R, P, U>
where
    G: TextGenerator,
    R: CodeRunner,
    P: ColumnProbe,
    U: UserInput,
{
    pub fn new(
        generator: G,
        runner: R,
        probe: P,
        input: U,
        extractor: EntityExtractor,
        limits: EngineLimits,
    ) -> Self {
        Self {
            generator,
            runner,
            probe,
            input,
            extractor,
            limits,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Drive the context to a terminal state (or to the deadline) and
    /// return the run report.
    pub async fn run(&mut self, ctx: &mut WorkflowContext) -> Result<RunReport> {
        let started_at = Utc::now();
        let deadline = Instant::now() + self.limits.run_deadline;

        let mut state = WorkflowState::Collecting;
        let mut transitions: Vec<TransitionRecord> = Vec::new();
        let mut collect_visits: u32 = 0;
        let mut fix_attempts: u32 = 0;
        let mut collection_exhausted = false;
        let mut deadline_hit = false;

        while !state.is_terminal() {
            if Instant::now() >= deadline {
                deadline_hit = true;
                break;
            }
            if self.verbose {
                eprintln!("workflow state: {state}");
            }

            let (event, component) = match state {
                WorkflowState::Collecting => {
                    collect_visits += 1;
                    let event = match self
                        .extractor
                        .collect(&self.generator, &self.probe, &mut self.input)
                        .await?
                    {
                        Some(inputs) => {
                            ctx.inputs = Some(inputs);
                            Event::InputsCollected
                        }
                        None if collect_visits >= self.limits.max_collect_visits => {
                            collection_exhausted = true;
                            Event::CollectBudgetExhausted
                        }
                        None => Event::InputsIncomplete,
                    };
                    (event, "entity_extractor")
                }
                WorkflowState::Generating => {
                    let inputs = ctx
                        .inputs
                        .as_ref()
                        .ok_or_else(|| anyhow!("entered GENERATING_CODE without collected inputs"))?;
                    ctx.code =
                        CodeGenerator::generate_code(&self.generator, ctx.documentation(), inputs)
                            .await?;
                    (Event::CodeGenerated, "code_generator")
                }
                WorkflowState::Executing => {
                    let event = match self.runner.run(&ctx.code).await? {
                        ExecutionOutcome::Success => {
                            ctx.success = Some(true);
                            ctx.last_error = None;
                            Event::ExecutionSucceeded
                        }
                        ExecutionOutcome::Failure(failure) => {
                            ctx.success = Some(false);
                            ctx.last_error = Some(failure);
                            Event::ExecutionFailed
                        }
                    };
                    (event, "executor")
                }
                WorkflowState::Fixing => {
                    let failure = ctx
                        .last_error
                        .clone()
                        .ok_or_else(|| anyhow!("entered FIXING_ERRORS without a captured error"))?;
                    ctx.code = Repairer::repair(&self.generator, &failure, &ctx.code).await?;
                    fix_attempts += 1;
                    log_repair(fix_attempts, self.limits.max_fix_retries, &failure.message);
                    let event = if fix_attempts >= self.limits.max_fix_retries {
                        Event::FixBudgetExhausted
                    } else {
                        Event::CodeRepaired
                    };
                    (event, "repairer")
                }
                WorkflowState::Finished | WorkflowState::MaxRetriesReached => {
                    unreachable!("terminal states never run a component")
                }
            };

            let next = transition(state, event);
            transitions.push(TransitionRecord::new(state, next, component));
            state = next;
        }

        let outcome = if deadline_hit {
            WorkflowOutcome::DeadlineExceeded
        } else if state == WorkflowState::Finished {
            WorkflowOutcome::Completed
        } else if collection_exhausted {
            WorkflowOutcome::CollectionExhausted
        } else {
            WorkflowOutcome::RetriesExhausted
        };

        Ok(RunReport::new(
            state,
            outcome,
            collect_visits,
            fix_attempts,
            transitions,
            started_at,
        ))
    }
}

fn log_repair(attempt: u32, max: u32, reason: &str) {
    eprintln!("  ↻ Repair attempt {attempt}/{max}: {reason}");
}
