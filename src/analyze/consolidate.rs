//! Phase 4: move survivors into the target

use super::naming::{suffix_separator, NameClaims};
use super::{ActionPlan, Phase};
use crate::types::{Action, Inventory};
use crate::Config;

/// Propose MOVE into the target root for every file under a source root
///
/// The basename is kept; when the target already holds that name (or an
/// earlier MOVE of this plan claimed it) a numeric suffix is added. Files
/// already under the target root get SKIP.
pub fn plan_consolidation(inventory: &Inventory, config: &Config) -> ActionPlan {
    let separator = suffix_separator(&config.settings);
    let mut claims = NameClaims::new();
    let mut plan = ActionPlan::new(Phase::Consolidation);

    for record in inventory.iter() {
        if config.is_in_target(&record.path) {
            plan.add_action(Action::skip(record.clone(), "Already in target directory"));
            continue;
        }

        let name = record.file_name();
        let to = claims.claim_free_path(&config.target, &name, separator);
        let reason = if to.file_name() == record.path.file_name() {
            "Unique file in source - consolidate to target".to_string()
        } else {
            format!(
                "Name {} taken in target - consolidate under a new name",
                name
            )
        };
        plan.add_action(Action::move_to(record.clone(), to, reason));
    }

    plan
}
