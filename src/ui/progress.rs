//! Progress reporting

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a phase re-scans the roots
///
/// Drawn on stderr and hidden automatically when stderr is not a terminal.
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    /// Start a spinner for a scan of `roots` directories
    pub fn start(roots: usize) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message(format!("Scanning {} director{}...", roots, plural_y(roots)));
        Self { bar }
    }

    /// Update the running counters
    pub fn update(&self, files: u64, bytes: u64) {
        self.bar.set_message(format!(
            "Scanning... {} files | {}",
            files,
            HumanBytes(bytes)
        ));
    }

    /// Stop the spinner and leave a one-line summary
    pub fn finish(&self, files: usize, bytes: u64, issues: usize) {
        let mut message = format!("Found {} file(s) | {}", files, HumanBytes(bytes));
        if issues > 0 {
            message.push_str(&format!(" | {} warning(s)", issues));
        }
        self.bar.finish_with_message(message);
    }

    #[cfg(test)]
    fn message(&self) -> String {
        self.bar.message()
    }
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}
