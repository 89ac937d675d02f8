//! Error types for cleanfiles

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for cleanfiles operations
#[derive(Debug, Error)]
pub enum CleanError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (logic checks)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path vanished between scan and action
    #[error("No such file: {path}")]
    NotFound { path: PathBuf },

    /// Destination is occupied and no free name could be found
    #[error("Destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    /// Too many consecutive actions failed
    #[error("Stopped after {count} consecutive failed actions")]
    FailureLimit { count: usize },

    /// Reading the user's answer failed
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl CleanError {
    /// Map an IO error raised while touching `path` to a path-aware variant.
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => CleanError::NotFound {
                path: path.to_path_buf(),
            },
            ErrorKind::PermissionDenied => CleanError::PermissionDenied {
                path: path.to_path_buf(),
            },
            ErrorKind::AlreadyExists => CleanError::DestinationExists {
                path: path.to_path_buf(),
            },
            _ => CleanError::Io(error),
        }
    }

    /// Check if the path an action referred to has disappeared
    pub fn is_not_found(&self) -> bool {
        matches!(self, CleanError::NotFound { .. })
    }

    /// Short label used to group errors in summaries
    pub fn kind_label(&self) -> &'static str {
        match self {
            CleanError::Io(_) => "I/O error",
            CleanError::Config(_) => "Configuration error",
            CleanError::Validation(_) => "Validation error",
            CleanError::PermissionDenied { .. } => "Permission denied",
            CleanError::NotFound { .. } => "File vanished",
            CleanError::DestinationExists { .. } => "Destination exists",
            CleanError::FailureLimit { .. } => "Failure limit",
            CleanError::Prompt(_) => "Prompt error",
        }
    }
}
