//! The four ordered classification passes

use std::fmt;

/// One classification pass over a fresh scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Rename bad characters, fix permissions
    Sanitization,
    /// Delete empty and temporary files
    JunkRemoval,
    /// Delete duplicates and superseded versions
    Deduplication,
    /// Move surviving source files into the target
    Consolidation,
}

impl Phase {
    /// Execution order
    pub const ALL: [Phase; 4] = [
        Phase::Sanitization,
        Phase::JunkRemoval,
        Phase::Deduplication,
        Phase::Consolidation,
    ];

    /// 1-based position in the run
    pub fn number(self) -> usize {
        match self {
            Phase::Sanitization => 1,
            Phase::JunkRemoval => 2,
            Phase::Deduplication => 3,
            Phase::Consolidation => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::Sanitization => "Sanitization",
            Phase::JunkRemoval => "Junk removal",
            Phase::Deduplication => "Deduplication & versioning",
            Phase::Consolidation => "Consolidation",
        }
    }

    /// Bullet lines shown under the phase banner
    pub fn description(self) -> &'static [&'static str] {
        match self {
            Phase::Sanitization => &[
                "Rename files with invalid characters",
                "Fix non-standard permissions",
            ],
            Phase::JunkRemoval => &["Delete empty files (0 bytes)", "Delete temporary files"],
            Phase::Deduplication => &[
                "Remove duplicate files (keep oldest)",
                "Remove older versions of same-named files (keep newest)",
            ],
            Phase::Consolidation => &["Move unique files from sources to target"],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PHASE {}: {}", self.number(), self.title())
    }
}
