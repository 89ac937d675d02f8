//! User interface: scan progress and plain-text reports

mod progress;
mod report;

pub use progress::ScanProgress;
pub use report::{
    format_dry_run_actions, format_error_summary, format_execution_summary, format_phase_banner,
    format_plan_summary, format_run_header, format_scan_issues, ErrorRecord,
};
