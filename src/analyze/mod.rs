//! Analyzer - four-phase classification and plan generation
//!
//! Each phase is a function of (fresh inventory, config) and returns the
//! ordered actions for that phase only. Nothing is remembered between phases;
//! the caller re-scans after executing a plan.

mod consolidate;
mod dedup;
mod junk;
pub mod naming;
mod phase;
mod plan;
mod sanitize;

pub use consolidate::plan_consolidation;
pub use dedup::plan_deduplication;
pub use junk::plan_junk_removal;
pub use phase::Phase;
pub use plan::{ActionPlan, PlanStats};
pub use sanitize::plan_sanitization;

use crate::types::Inventory;
use crate::Config;
use tracing::info;

/// Build the plan for one phase
///
/// The inventory is mutable only so the deduplication phase can cache the
/// content hashes it computes.
pub fn analyze_phase(phase: Phase, inventory: &mut Inventory, config: &Config) -> ActionPlan {
    let plan = match phase {
        Phase::Sanitization => plan_sanitization(inventory, config),
        Phase::JunkRemoval => plan_junk_removal(inventory, config),
        Phase::Deduplication => plan_deduplication(inventory),
        Phase::Consolidation => plan_consolidation(inventory, config),
    };

    info!(
        "{}: {} action(s) proposed for {} file(s)",
        phase,
        plan.stats.executable_count(),
        inventory.len()
    );
    plan
}
