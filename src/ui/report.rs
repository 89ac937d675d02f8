//! Plain-text rendering of banners, plans and outcomes

use crate::analyze::{ActionPlan, Phase};
use crate::executor::ExecutionStats;
use crate::types::{ActionKind, CleanError, ScanIssue};
use crate::Config;
use indicatif::HumanBytes;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 50;

/// Header printed once per run
pub fn format_run_header(config: &Config) -> String {
    let sources: Vec<String> = config
        .sources
        .iter()
        .map(|s| s.display().to_string())
        .collect();
    let mut lines = vec![
        "=".repeat(RULE_WIDTH),
        format!("cleanfiles v{}", crate::VERSION),
        "=".repeat(RULE_WIDTH),
        format!("Target directory: {}", config.target.display()),
        format!("Source directories: {}", sources.join(", ")),
    ];
    if config.dry_run {
        lines.push("Dry-run mode: no changes will be made.".to_string());
    }
    lines.join("\n")
}

/// Ruled banner naming the phase and what it looks for
pub fn format_phase_banner(phase: Phase) -> String {
    let mut lines = vec![String::new(), "-".repeat(RULE_WIDTH), phase.to_string()];
    for item in phase.description() {
        lines.push(format!("  - {}", item));
    }
    lines.push("-".repeat(RULE_WIDTH));
    lines.join("\n")
}

/// One warning line per entry the scan had to skip; empty when none
pub fn format_scan_issues(issues: &[ScanIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("Warning: {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-kind counts of a plan, or a note that nothing needs doing
pub fn format_plan_summary(plan: &ActionPlan) -> String {
    let executable = plan.stats.executable_count();
    if executable == 0 {
        return "No actions needed.".to_string();
    }

    let counts: Vec<String> = ActionKind::ALL
        .iter()
        .filter(|kind| **kind != ActionKind::Skip)
        .filter_map(|kind| match plan.stats.count_of(*kind) {
            0 => None,
            n => Some(format!("{}: {}", kind.label(), n)),
        })
        .collect();

    let mut summary = format!("Found {} action(s).\n  {}", executable, counts.join("  "));
    if plan.stats.bytes_freed > 0 {
        summary.push_str(&format!(
            "\n  Space to reclaim: {}",
            HumanBytes(plan.stats.bytes_freed)
        ));
    }
    if plan.stats.bytes_moved > 0 {
        summary.push_str(&format!(
            "\n  Data to move: {}",
            HumanBytes(plan.stats.bytes_moved)
        ));
    }
    summary
}

/// Full listing of a plan for `--dry-run`
pub fn format_dry_run_actions(plan: &ActionPlan) -> String {
    if plan.actions.is_empty() {
        return "Dry-run actions:\n  (no planned actions)".to_string();
    }

    let mut lines = Vec::with_capacity(plan.actions.len() + 1);
    lines.push("Dry-run actions:".to_string());
    let mut skipped = 0usize;
    for action in &plan.actions {
        if action.is_skip() {
            skipped += 1;
            continue;
        }
        let destination = action
            .destination
            .as_ref()
            .map(|d| format!(" -> {}", d))
            .unwrap_or_default();
        lines.push(format!(
            "  {:<8}  {}{}",
            action.kind.to_string(),
            action.path().display(),
            destination
        ));
        lines.push(format!("            ({})", action.reason));
    }

    if skipped > 0 {
        lines.push(format!("  ({skipped} file(s) already in place omitted)"));
    }

    lines.join("\n")
}

/// Counts after a plan was executed
pub fn format_execution_summary(stats: &ExecutionStats) -> String {
    format!(
        "Done: {} performed, {} declined, {} failed",
        stats.completed_actions, stats.declined_actions, stats.failed_actions
    )
}

/// One failed action, phrased for the user
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    kind: &'static str,
    path: Option<PathBuf>,
    message: String,
    suggestion: Option<String>,
}

impl ErrorRecord {
    pub fn new(path: Option<&Path>, error: &CleanError) -> Self {
        let (message, suggestion) = humanize_error(error);
        Self {
            kind: error.kind_label(),
            path: path.map(PathBuf::from),
            message,
            suggestion,
        }
    }
}

fn humanize_error(error: &CleanError) -> (String, Option<String>) {
    match error {
        CleanError::NotFound { .. } => (
            "The file disappeared after it was scanned".to_string(),
            Some("Another program may have moved it; re-run to rescan.".to_string()),
        ),
        CleanError::PermissionDenied { .. } => (
            "Permission denied while changing file".to_string(),
            Some("Check directory permissions or run with a user that has access.".to_string()),
        ),
        CleanError::DestinationExists { .. } => (
            "The destination name is already taken".to_string(),
            Some("Rename the conflicting file, then re-run.".to_string()),
        ),
        CleanError::Io(io) => (
            format!("I/O operation failed: {}", io),
            Some("Re-run the tool. If this keeps happening, check disk health.".to_string()),
        ),
        CleanError::Config(msg) | CleanError::Validation(msg) | CleanError::Prompt(msg) => {
            (msg.clone(), None)
        }
        CleanError::FailureLimit { count } => (
            format!("{} actions in a row failed", count),
            Some("Fix the underlying problem or raise --failure-limit.".to_string()),
        ),
    }
}

/// Failures grouped by kind, at most three examples per group
pub fn format_error_summary(records: &[ErrorRecord]) -> String {
    let mut groups: BTreeMap<&'static str, Vec<&ErrorRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.kind).or_default().push(record);
    }

    let mut lines = Vec::new();
    lines.push("Error summary:".to_string());
    for (kind, items) in groups {
        lines.push(format!("  {} ({}):", kind, items.len()));
        for record in items.iter().take(3) {
            lines.push(format!("    - {}", record.message));
            if let Some(path) = &record.path {
                lines.push(format!("      Path: {}", path.display()));
            }
            if let Some(suggestion) = &record.suggestion {
                lines.push(format!("      Try: {}", suggestion));
            }
        }
        if items.len() > 3 {
            lines.push(format!("    - ... {} more", items.len() - 3));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, FileRecord};
    use std::time::UNIX_EPOCH;

    fn record(path: &str, size: u64) -> FileRecord {
        FileRecord::new(PathBuf::from(path), size, UNIX_EPOCH, 0o644)
    }

    #[test]
    fn test_scan_issues_one_warning_each() {
        let issues = vec![
            ScanIssue {
                path: PathBuf::from("/y/locked"),
                message: "Permission denied".to_string(),
            },
            ScanIssue {
                path: PathBuf::from("/z"),
                message: "Not a directory".to_string(),
            },
        ];

        assert_eq!(
            format_scan_issues(&issues),
            "Warning: /y/locked: Permission denied\nWarning: /z: Not a directory"
        );
        assert!(format_scan_issues(&[]).is_empty());
    }

    #[test]
    fn test_phase_banner_lists_description() {
        let banner = format_phase_banner(Phase::JunkRemoval);
        assert!(banner.contains("PHASE 2: Junk removal"));
        assert!(banner.contains("  - Delete empty files (0 bytes)"));
    }

    #[test]
    fn test_plan_summary_for_empty_plan() {
        let mut plan = ActionPlan::new(Phase::Consolidation);
        plan.add_action(Action::skip(record("/x/a", 1), "Already in target directory"));
        assert_eq!(format_plan_summary(&plan), "No actions needed.");
    }

    #[test]
    fn test_plan_summary_counts_kinds() {
        let mut plan = ActionPlan::new(Phase::JunkRemoval);
        plan.add_action(Action::delete(record("/y/a.tmp", 2 * 1024 * 1024), "temp"));
        plan.add_action(Action::delete(record("/y/b.tmp", 0), "empty"));

        let summary = format_plan_summary(&plan);
        assert!(summary.contains("Found 2 action(s)."));
        assert!(summary.contains("DELETE: 2"));
        assert!(!summary.contains("MOVE"));
        assert!(summary.contains("Space to reclaim: 2.00 MiB"));
    }

    #[test]
    fn test_dry_run_listing() {
        let mut plan = ActionPlan::new(Phase::Consolidation);
        plan.add_action(Action::skip(record("/x/kept", 1), "Already in target directory"));
        plan.add_action(Action::move_to(
            record("/y/new.txt", 5),
            PathBuf::from("/x/new.txt"),
            "Unique file in source - consolidate to target",
        ));

        let listing = format_dry_run_actions(&plan);
        assert!(listing.contains("MOVE      /y/new.txt -> /x/new.txt"));
        assert!(listing.contains("(Unique file in source - consolidate to target)"));
        assert!(listing.contains("(1 file(s) already in place omitted)"));
        assert!(!listing.contains("/x/kept"));
    }

    #[test]
    fn test_dry_run_listing_renders_mode_in_octal() {
        let mut plan = ActionPlan::new(Phase::Sanitization);
        plan.add_action(Action::chmod(record("/x/f", 1), 0o644, "Non-standard permissions (600)"));
        assert!(format_dry_run_actions(&plan).contains("CHMOD     /x/f -> 644"));
    }

    #[test]
    fn test_dry_run_listing_empty() {
        let plan = ActionPlan::new(Phase::Sanitization);
        assert!(format_dry_run_actions(&plan).contains("(no planned actions)"));
    }

    #[test]
    fn test_error_summary_groups_by_kind() {
        let vanished = CleanError::NotFound {
            path: PathBuf::from("a.tmp"),
        };
        let denied = CleanError::PermissionDenied {
            path: PathBuf::from("b.txt"),
        };
        let records = vec![
            ErrorRecord::new(Some(Path::new("a.tmp")), &vanished),
            ErrorRecord::new(Some(Path::new("b.txt")), &denied),
            ErrorRecord::new(Some(Path::new("c.tmp")), &vanished),
        ];

        let summary = format_error_summary(&records);
        assert!(summary.contains("Error summary:"));
        assert!(summary.contains("File vanished (2):"));
        assert!(summary.contains("Permission denied (1):"));
        assert!(summary.contains("Path: a.tmp"));
        assert!(summary.contains("Try: Check directory permissions"));
    }

    #[test]
    fn test_error_summary_truncates_long_groups() {
        let error = CleanError::NotFound {
            path: PathBuf::from("x"),
        };
        let records: Vec<_> = (0..5).map(|_| ErrorRecord::new(None, &error)).collect();
        assert!(format_error_summary(&records).contains("... 2 more"));
    }

    #[test]
    fn test_execution_summary() {
        let stats = ExecutionStats {
            total_actions: 4,
            completed_actions: 2,
            declined_actions: 1,
            failed_actions: 1,
            skipped_actions: 0,
        };
        assert_eq!(
            format_execution_summary(&stats),
            "Done: 2 performed, 1 declined, 1 failed"
        );
    }
}
