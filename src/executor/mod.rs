//! Executor - interactive, sequential application of a plan

pub mod confirm;
pub mod copy;
pub mod ops;

pub use confirm::{ApprovalMemory, LinePrompter, PromptRecord, Prompter, Response};
pub use copy::copy_file_preserving;
pub use ops::{apply_action, Applied};

use crate::analyze::ActionPlan;
use crate::types::{ActionKind, CleanError};
use crate::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Execution statistics for one plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Number of actions in the input plan
    pub total_actions: usize,
    /// Approved and applied successfully
    pub completed_actions: usize,
    /// Answered "no"
    pub declined_actions: usize,
    /// Approved but the filesystem operation failed
    pub failed_actions: usize,
    /// SKIP actions passed through without prompting
    pub skipped_actions: usize,
}

/// How plan execution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Every action was considered
    Finished,
    /// The user answered "quit" at this 1-based action index
    Aborted { at: usize },
}

/// Result of executing one plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub stats: ExecutionStats,
    pub outcome: PlanOutcome,
}

impl ExecutionReport {
    pub fn is_aborted(&self) -> bool {
        matches!(self.outcome, PlanOutcome::Aborted { .. })
    }
}

/// Events emitted while executing a plan
#[derive(Debug)]
pub enum ExecutionEvent<'a> {
    /// An action is about to be confirmed; `auto_approved` means no prompt
    ActionStart {
        index: usize,
        total: usize,
        record: &'a PromptRecord,
        auto_approved: bool,
    },
    /// Action applied
    ActionSuccess {
        index: usize,
        total: usize,
        kind: ActionKind,
        path: &'a Path,
        applied: &'a Applied,
    },
    /// User answered "no"
    ActionDeclined {
        index: usize,
        total: usize,
        kind: ActionKind,
        path: &'a Path,
    },
    /// SKIP action, nothing to confirm
    ActionSkipped {
        index: usize,
        total: usize,
        path: &'a Path,
        reason: &'a str,
    },
    /// Action failed but executor continued
    ActionError {
        index: usize,
        total: usize,
        kind: ActionKind,
        path: &'a Path,
        error: &'a CleanError,
    },
    /// User answered "quit"
    Aborted { index: usize, total: usize },
    /// Plan execution ended (finished, aborted or stopped)
    Complete { stats: &'a ExecutionStats },
}

/// Optional callback used to receive execution events
pub type ExecutionCallback = dyn Fn(&ExecutionEvent<'_>) + Send + Sync;

/// Execute a plan under the confirmation protocol
///
/// Actions run strictly in plan order, one filesystem operation at a time.
/// For each action whose kind is not in `memory`, the prompter is asked:
///
/// - `Yes` applies the action
/// - `No` leaves the file alone
/// - `Always` adds the kind to `memory` and applies the action; later
///   actions of that kind are applied without asking
/// - `Quit` stops at once, returning [`PlanOutcome::Aborted`]; no later
///   action is considered
///
/// `memory` is owned by the caller so "always" answers carry over into the
/// following phases of the same run.
///
/// A failed action is reported through `on_event` and execution continues.
/// Only `config.failure_limit` consecutive failures (when non-zero) or a
/// broken prompter end execution with an error. A declined action ends a
/// failure streak.
pub fn execute_plan(
    plan: &ActionPlan,
    config: &Config,
    prompter: &mut dyn Prompter,
    memory: &mut ApprovalMemory,
    on_event: Option<&ExecutionCallback>,
) -> Result<ExecutionReport, CleanError> {
    let total = plan.actions.len();
    let mut stats = ExecutionStats {
        total_actions: total,
        ..Default::default()
    };
    // original path → where an earlier RENAME/MOVE of this plan left it
    let mut relocations: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut consecutive_failures = 0usize;

    for (idx, action) in plan.actions.iter().enumerate() {
        let index = idx + 1;
        let current = relocations
            .get(action.path())
            .cloned()
            .unwrap_or_else(|| action.path().clone());

        if action.is_skip() {
            stats.skipped_actions += 1;
            emit_event(
                on_event,
                ExecutionEvent::ActionSkipped {
                    index,
                    total,
                    path: &current,
                    reason: &action.reason,
                },
            );
            continue;
        }

        let record = PromptRecord::new(index, total, action, &current);
        let auto_approved = memory.is_always(action.kind);
        emit_event(
            on_event,
            ExecutionEvent::ActionStart {
                index,
                total,
                record: &record,
                auto_approved,
            },
        );

        if !auto_approved {
            match prompter.confirm(&record)? {
                Response::Yes => {}
                Response::Always => memory.remember(action.kind),
                Response::No => {
                    stats.declined_actions += 1;
                    consecutive_failures = 0;
                    emit_event(
                        on_event,
                        ExecutionEvent::ActionDeclined {
                            index,
                            total,
                            kind: action.kind,
                            path: &current,
                        },
                    );
                    continue;
                }
                Response::Quit => {
                    debug!("Quit at action {}/{}", index, total);
                    emit_event(on_event, ExecutionEvent::Aborted { index, total });
                    emit_event(on_event, ExecutionEvent::Complete { stats: &stats });
                    return Ok(ExecutionReport {
                        stats,
                        outcome: PlanOutcome::Aborted { at: index },
                    });
                }
            }
        }

        match apply_action(action, &current, config) {
            Ok(applied) => {
                stats.completed_actions += 1;
                consecutive_failures = 0;
                if action.relocates() {
                    if let Some(new_path) = &applied.new_path {
                        relocations.insert(action.path().clone(), new_path.clone());
                    }
                }
                emit_event(
                    on_event,
                    ExecutionEvent::ActionSuccess {
                        index,
                        total,
                        kind: action.kind,
                        path: &current,
                        applied: &applied,
                    },
                );
            }
            Err(err) => {
                stats.failed_actions += 1;
                consecutive_failures += 1;
                warn!("{} {} failed: {}", action.kind, current.display(), err);
                emit_event(
                    on_event,
                    ExecutionEvent::ActionError {
                        index,
                        total,
                        kind: action.kind,
                        path: &current,
                        error: &err,
                    },
                );

                if config.failure_limit > 0 && consecutive_failures >= config.failure_limit {
                    emit_event(on_event, ExecutionEvent::Complete { stats: &stats });
                    return Err(CleanError::FailureLimit {
                        count: consecutive_failures,
                    });
                }
            }
        }
    }

    emit_event(on_event, ExecutionEvent::Complete { stats: &stats });

    Ok(ExecutionReport {
        stats,
        outcome: PlanOutcome::Finished,
    })
}

fn emit_event(on_event: Option<&ExecutionCallback>, event: ExecutionEvent<'_>) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}
