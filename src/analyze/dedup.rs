//! Phase 3: duplicates and versions
//!
//! Files are grouped by basename first. Only members of a group with more
//! than one file are hashed, so unrelated files are never read.
//!
//! Within a group:
//! - copies with identical content are duplicates: the oldest (smallest
//!   mtime, then smallest path) is kept, the rest are deleted;
//! - distinct contents are versions: the content edited most recently
//!   (largest mtime of any copy, then smallest path) survives, the others
//!   are deleted.
//!
//! A group mixing both is handled in that order: duplicates collapse onto
//! their oldest copy, then the distinct contents compete on the mtime of
//! their newest copy. A content's only surviving copy is never deleted
//! unless another content was edited more recently.

use super::{ActionPlan, Phase};
use crate::hash::short_hex;
use crate::types::{Action, FileRecord, Inventory};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Propose DELETE for duplicates and superseded versions
///
/// Content hashes computed here are cached on the inventory's records.
pub fn plan_deduplication(inventory: &mut Inventory) -> ActionPlan {
    let mut plan = ActionPlan::new(Phase::Deduplication);

    let mut by_name: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for record in inventory.iter() {
        by_name
            .entry(record.file_name())
            .or_default()
            .push(record.path.clone());
    }

    for (name, paths) in by_name {
        if paths.len() < 2 {
            continue;
        }

        let mut members: Vec<([u8; 32], FileRecord)> = Vec::with_capacity(paths.len());
        for path in &paths {
            let Some(record) = inventory.get_mut(path) else {
                continue;
            };
            match record.ensure_hash() {
                Ok(hash) => members.push((hash, record.clone())),
                Err(e) => warn!(
                    "Cannot hash {}: {}. Left out of duplicate detection.",
                    path.display(),
                    e
                ),
            }
        }

        for action in plan_name_group(&name, members) {
            plan.add_action(action);
        }
    }

    plan
}

fn oldest_first(a: &FileRecord, b: &FileRecord) -> Ordering {
    a.mtime.cmp(&b.mtime).then_with(|| a.path.cmp(&b.path))
}

/// One distinct content: the copy that survives and its latest edit time
struct Version {
    kept: FileRecord,
    latest: SystemTime,
}

fn newest_first(a: &Version, b: &Version) -> Ordering {
    b.latest
        .cmp(&a.latest)
        .then_with(|| a.kept.path.cmp(&b.kept.path))
}

/// Deletions for one group of same-named files, sorted by path
fn plan_name_group(name: &str, members: Vec<([u8; 32], FileRecord)>) -> Vec<Action> {
    if members.len() < 2 {
        return Vec::new();
    }

    let mut by_hash: BTreeMap<[u8; 32], Vec<FileRecord>> = BTreeMap::new();
    for (hash, record) in members {
        by_hash.entry(hash).or_default().push(record);
    }

    let mut deletions = Vec::new();
    let mut versions = Vec::with_capacity(by_hash.len());

    for (hash, mut copies) in by_hash {
        copies.sort_by(oldest_first);
        let latest = copies.iter().map(|c| c.mtime).max();
        let mut copies = copies.into_iter();
        let Some(original) = copies.next() else {
            continue;
        };
        for duplicate in copies {
            debug!(
                "{} duplicates {} ({})",
                duplicate.path.display(),
                original.path.display(),
                short_hex(&hash)
            );
            deletions.push(Action::delete(
                duplicate,
                format!("Duplicate of {}", original.path.display()),
            ));
        }
        let latest = latest.unwrap_or(original.mtime);
        versions.push(Version {
            kept: original,
            latest,
        });
    }

    if versions.len() > 1 {
        versions.sort_by(newest_first);
        let mut versions = versions.into_iter();
        if let Some(current) = versions.next() {
            for older in versions {
                debug!(
                    "{} is an older version of {}",
                    older.kept.path.display(),
                    current.kept.path.display()
                );
                deletions.push(Action::delete(
                    older.kept,
                    format!(
                        "Older version of {} (current: {})",
                        name,
                        current.kept.path.display()
                    ),
                ));
            }
        }
    }

    deletions.sort_by(|a, b| a.path().cmp(b.path()));
    deletions
}
