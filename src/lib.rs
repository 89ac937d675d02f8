//! # cleanfiles - interactive file consolidation
//!
//! Merges files from one or more source directories into a target
//! directory in four confirmed phases: sanitization, junk removal,
//! deduplication and consolidation. Every mutation is proposed first and
//! only applied after the user agrees.

pub mod analyze;
pub mod commands;
pub mod config;
pub mod executor;
pub mod hash;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::{Config, Settings};
pub use types::{Action, ActionKind, CleanError, FileRecord, Inventory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
