//! Action - One proposed mutation produced by the analyzer

use super::FileRecord;
use std::fmt;
use std::path::PathBuf;

/// Kind of a proposed action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    Delete,
    Move,
    Rename,
    Chmod,
    Copy,
    Skip,
}

impl ActionKind {
    /// Every kind, in display order
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Delete,
        ActionKind::Move,
        ActionKind::Rename,
        ActionKind::Chmod,
        ActionKind::Copy,
        ActionKind::Skip,
    ];

    /// Upper-case label shown in prompts
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Delete => "DELETE",
            ActionKind::Move => "MOVE",
            ActionKind::Rename => "RENAME",
            ActionKind::Chmod => "CHMOD",
            ActionKind::Copy => "COPY",
            ActionKind::Skip => "SKIP",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where an action sends its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// New location (MOVE, RENAME, COPY)
    Path(PathBuf),
    /// New permission bits (CHMOD)
    Mode(u32),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Path(path) => write!(f, "{}", path.display()),
            Destination::Mode(mode) => write!(f, "{:03o}", mode),
        }
    }
}

/// A proposed mutation of one file
///
/// Actions only describe work; the executor is the only place that touches
/// the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub target: FileRecord,
    pub destination: Option<Destination>,
    pub reason: String,
}

impl Action {
    pub fn delete(target: FileRecord, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Delete,
            target,
            destination: None,
            reason: reason.into(),
        }
    }

    pub fn rename(target: FileRecord, to: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Rename,
            target,
            destination: Some(Destination::Path(to)),
            reason: reason.into(),
        }
    }

    pub fn chmod(target: FileRecord, mode: u32, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Chmod,
            target,
            destination: Some(Destination::Mode(mode)),
            reason: reason.into(),
        }
    }

    pub fn move_to(target: FileRecord, to: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Move,
            target,
            destination: Some(Destination::Path(to)),
            reason: reason.into(),
        }
    }

    pub fn copy_to(target: FileRecord, to: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Copy,
            target,
            destination: Some(Destination::Path(to)),
            reason: reason.into(),
        }
    }

    pub fn skip(target: FileRecord, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Skip,
            target,
            destination: None,
            reason: reason.into(),
        }
    }

    /// Path of the file this action applies to
    pub fn path(&self) -> &PathBuf {
        &self.target.path
    }

    /// Destination path, if this action relocates its target
    pub fn destination_path(&self) -> Option<&PathBuf> {
        match &self.destination {
            Some(Destination::Path(path)) => Some(path),
            _ => None,
        }
    }

    /// Destination mode, for CHMOD actions
    pub fn destination_mode(&self) -> Option<u32> {
        match self.destination {
            Some(Destination::Mode(mode)) => Some(mode),
            _ => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.kind == ActionKind::Skip
    }

    /// True for actions that leave the target somewhere else
    pub fn relocates(&self) -> bool {
        matches!(self.kind, ActionKind::Move | ActionKind::Rename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn record(path: &str) -> FileRecord {
        FileRecord::new(PathBuf::from(path), 10, UNIX_EPOCH, 0o600)
    }

    #[test]
    fn test_labels() {
        assert_eq!(ActionKind::Delete.to_string(), "DELETE");
        assert_eq!(ActionKind::Chmod.label(), "CHMOD");
        assert_eq!(ActionKind::ALL.len(), 6);
    }

    #[test]
    fn test_chmod_destination_is_mode() {
        let action = Action::chmod(record("/a/f"), 0o644, "Non-standard permissions (600)");

        assert_eq!(action.destination_mode(), Some(0o644));
        assert_eq!(action.destination_path(), None);
        assert_eq!(action.destination.as_ref().map(|d| d.to_string()), Some("644".to_string()));
    }

    #[test]
    fn test_move_destination_is_path() {
        let action = Action::move_to(record("/src/f"), PathBuf::from("/dst/f"), "consolidate");

        assert_eq!(action.destination_path(), Some(&PathBuf::from("/dst/f")));
        assert!(action.relocates());
        assert!(!action.is_skip());
    }

    #[test]
    fn test_delete_and_skip_have_no_destination() {
        assert!(Action::delete(record("/a"), "empty file").destination.is_none());

        let skip = Action::skip(record("/a"), "already in target");
        assert!(skip.destination.is_none());
        assert!(skip.is_skip());
        assert!(!skip.relocates());
    }

    #[test]
    fn test_copy_does_not_relocate() {
        let action = Action::copy_to(record("/a"), PathBuf::from("/b"), "copy");
        assert!(!action.relocates());
        assert_eq!(action.path(), &PathBuf::from("/a"));
    }
}
