//! Action plan for one phase and its statistics

use super::Phase;
use crate::types::{Action, ActionKind};

/// Ordered actions proposed by one phase
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPlan {
    /// Phase that produced the plan
    pub phase: Phase,

    /// Actions in execution order
    pub actions: Vec<Action>,

    /// Aggregate statistics about the plan
    pub stats: PlanStats,
}

impl ActionPlan {
    /// Create a new empty plan
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            actions: Vec::new(),
            stats: PlanStats::default(),
        }
    }

    /// Append an action and update statistics
    pub fn add_action(&mut self, action: Action) {
        let size = action.target.size;
        match action.kind {
            ActionKind::Delete => {
                self.stats.delete_count += 1;
                self.stats.bytes_freed += size;
            }
            ActionKind::Move => {
                self.stats.move_count += 1;
                self.stats.bytes_moved += size;
            }
            ActionKind::Copy => {
                self.stats.copy_count += 1;
                self.stats.bytes_moved += size;
            }
            ActionKind::Rename => self.stats.rename_count += 1,
            ActionKind::Chmod => self.stats.chmod_count += 1,
            ActionKind::Skip => self.stats.skip_count += 1,
        }

        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// True when at least one action would change the filesystem
    pub fn has_executable_actions(&self) -> bool {
        self.actions.iter().any(|action| !action.is_skip())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}

/// Statistics about a plan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanStats {
    pub delete_count: usize,
    pub move_count: usize,
    pub rename_count: usize,
    pub chmod_count: usize,
    pub copy_count: usize,
    pub skip_count: usize,

    /// Bytes held by files proposed for deletion
    pub bytes_freed: u64,

    /// Bytes proposed to be moved or copied
    pub bytes_moved: u64,
}

impl PlanStats {
    /// Number of actions of a kind
    pub fn count_of(&self, kind: ActionKind) -> usize {
        match kind {
            ActionKind::Delete => self.delete_count,
            ActionKind::Move => self.move_count,
            ActionKind::Rename => self.rename_count,
            ActionKind::Chmod => self.chmod_count,
            ActionKind::Copy => self.copy_count,
            ActionKind::Skip => self.skip_count,
        }
    }

    /// Actions that would change something
    pub fn executable_count(&self) -> usize {
        self.delete_count + self.move_count + self.rename_count + self.chmod_count + self.copy_count
    }
}
