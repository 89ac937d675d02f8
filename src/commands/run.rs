//! Main cleanup command: scan, analyze and execute each phase in turn

use crate::analyze::{analyze_phase, ActionPlan, Phase, PlanStats};
use crate::executor::{execute_plan, ApprovalMemory, ExecutionEvent, ExecutionReport, Prompter};
use crate::scanner::{scan_roots, ProgressCallback};
use crate::types::{CleanError, Inventory};
use crate::ui::{
    format_dry_run_actions, format_error_summary, format_execution_summary, format_phase_banner,
    format_plan_summary, format_run_header, format_scan_issues, ErrorRecord, ScanProgress,
};
use crate::Config;
use console::style;
use std::sync::{Arc, Mutex};
use tracing::info;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All four phases were considered
    Completed,
    /// The user quit during this phase; later phases never ran
    Aborted { phase: Phase },
}

/// What happened in one phase
#[derive(Debug, Clone)]
pub struct PhaseReport {
    pub phase: Phase,
    pub plan: PlanStats,
    /// `None` for dry runs and for plans with nothing to execute
    pub execution: Option<ExecutionReport>,
}

impl PhaseReport {
    fn is_aborted(&self) -> bool {
        self.execution.as_ref().is_some_and(ExecutionReport::is_aborted)
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub phases: Vec<PhaseReport>,
}

/// Run the cleanup
///
/// Phases run in their fixed order and each one starts from a fresh scan, so
/// it only ever sees the tree left behind by the previous phase. "Always"
/// answers are remembered for the whole run. Quitting ends the run at once.
pub fn run(config: &Config, prompter: &mut dyn Prompter) -> Result<RunReport, CleanError> {
    println!("{}", format_run_header(config));

    let mut memory = if config.assume_yes {
        ApprovalMemory::approve_all()
    } else {
        ApprovalMemory::new()
    };
    let mut phases = Vec::with_capacity(Phase::ALL.len());

    for phase in Phase::ALL {
        let report = run_phase(phase, config, prompter, &mut memory)?;
        let aborted = report.is_aborted();
        phases.push(report);

        if aborted {
            println!("\nQuitting...");
            info!("Run aborted by user during {}", phase);
            return Ok(RunReport {
                outcome: RunOutcome::Aborted { phase },
                phases,
            });
        }
    }

    println!("\n{}\nFinished\n{}", "=".repeat(50), "=".repeat(50));
    Ok(RunReport {
        outcome: RunOutcome::Completed,
        phases,
    })
}

/// Scan, analyze and (unless dry-running) execute a single phase
pub fn run_phase(
    phase: Phase,
    config: &Config,
    prompter: &mut dyn Prompter,
    memory: &mut ApprovalMemory,
) -> Result<PhaseReport, CleanError> {
    println!("{}", format_phase_banner(phase));

    let mut inventory = scan_with_progress(config);
    if !inventory.issues.is_empty() {
        println!("{}", format_scan_issues(&inventory.issues));
    }
    let plan = analyze_phase(phase, &mut inventory, config);
    println!("{}", format_plan_summary(&plan));

    if config.dry_run {
        if plan.has_executable_actions() {
            println!("{}", format_dry_run_actions(&plan));
        }
        return Ok(PhaseReport {
            phase,
            plan: plan.stats,
            execution: None,
        });
    }

    if !plan.has_executable_actions() {
        return Ok(PhaseReport {
            phase,
            plan: plan.stats,
            execution: None,
        });
    }

    let execution = execute_with_output(&plan, config, prompter, memory)?;
    Ok(PhaseReport {
        phase,
        plan: plan.stats,
        execution: Some(execution),
    })
}

fn scan_with_progress(config: &Config) -> Inventory {
    let roots = config.roots();
    let progress = Arc::new(ScanProgress::start(roots.len()));
    let on_progress: ProgressCallback = {
        let progress = Arc::clone(&progress);
        Box::new(move |files: u64, bytes: u64| progress.update(files, bytes))
    };

    let inventory = scan_roots(&roots, Some(&on_progress));
    progress.finish(inventory.len(), inventory.total_size, inventory.issues.len());
    inventory
}

fn execute_with_output(
    plan: &ActionPlan,
    config: &Config,
    prompter: &mut dyn Prompter,
    memory: &mut ApprovalMemory,
) -> Result<ExecutionReport, CleanError> {
    let error_records: Arc<Mutex<Vec<ErrorRecord>>> = Arc::new(Mutex::new(Vec::new()));
    let on_event = {
        let error_records = Arc::clone(&error_records);
        move |event: &ExecutionEvent<'_>| match event {
            // Prompted actions are rendered by the prompter itself
            ExecutionEvent::ActionStart {
                record,
                auto_approved: true,
                ..
            } => println!("{}", record.render()),
            ExecutionEvent::ActionSuccess { applied, .. } => {
                println!("{}", style(applied.describe()).green());
            }
            ExecutionEvent::ActionDeclined { .. } => println!("Skipped."),
            ExecutionEvent::ActionError { path, error, .. } => {
                println!("{} {}", style("Error:").red().bold(), error);
                if let Ok(mut records) = error_records.lock() {
                    records.push(ErrorRecord::new(Some(*path), error));
                }
            }
            _ => {}
        }
    };

    let result = execute_plan(plan, config, prompter, memory, Some(&on_event));

    if let Ok(records) = error_records.lock() {
        if !records.is_empty() {
            println!("{}", format_error_summary(&records));
        }
    }

    let report = result?;
    if !report.is_aborted() {
        println!("{}", format_execution_summary(&report.stats));
    }
    Ok(report)
}
