//! Phase 1: names and permissions

use super::naming::{sanitize_name, suffix_separator, NameClaims};
use super::{ActionPlan, Phase};
use crate::types::{Action, Inventory};
use crate::Config;
use std::ffi::OsStr;
use tracing::debug;

/// Propose RENAME for names with bad characters and CHMOD for odd modes
///
/// A file needing both gets its RENAME first; the executor then applies the
/// CHMOD to the renamed file. Rename collisions get a numeric suffix.
pub fn plan_sanitization(inventory: &Inventory, config: &Config) -> ActionPlan {
    let settings = &config.settings;
    let separator = suffix_separator(settings);
    let mut claims = NameClaims::new();
    let mut plan = ActionPlan::new(Phase::Sanitization);

    for record in inventory.iter() {
        match record.path.file_name().and_then(OsStr::to_str) {
            Some(name) => {
                let clean = sanitize_name(name, &settings.bad_chars, settings.replacement_char);
                if clean != name {
                    let to = claims.claim_free_path(record.parent(), &clean, separator);
                    plan.add_action(Action::rename(
                        record.clone(),
                        to,
                        "Invalid characters in name",
                    ));
                }
            }
            None => debug!("Name of {} is not UTF-8, left as is", record.path.display()),
        }

        let current = record.mode_bits();
        if current != settings.default_permissions {
            plan.add_action(Action::chmod(
                record.clone(),
                settings.default_permissions,
                format!("Non-standard permissions ({:03o})", current),
            ));
        }
    }

    plan
}
