//! Phase 2: empty and temporary files

use super::{ActionPlan, Phase};
use crate::types::{Action, Inventory};
use crate::Config;

/// Propose DELETE for empty files and files with a temp suffix
///
/// A file that is both empty and temporary gets a single DELETE.
pub fn plan_junk_removal(inventory: &Inventory, config: &Config) -> ActionPlan {
    let settings = &config.settings;
    let mut plan = ActionPlan::new(Phase::JunkRemoval);

    for record in inventory.iter() {
        if record.size == 0 {
            plan.add_action(Action::delete(record.clone(), "Empty file (0 bytes)"));
            continue;
        }

        let name = record.file_name();
        if let Some(suffix) = settings.temp_suffix_of(&name) {
            plan.add_action(Action::delete(
                record.clone(),
                format!("Temporary file ({})", suffix),
            ));
        }
    }

    plan
}
