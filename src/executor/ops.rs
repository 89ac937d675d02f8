//! Filesystem mutations behind each action kind

use super::copy_file_preserving;
use crate::analyze::naming::{free_path, suffix_separator};
use crate::types::{Action, ActionKind, CleanError};
use crate::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// What an applied action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub kind: ActionKind,
    /// Where the file ended up (RENAME, MOVE, COPY)
    pub new_path: Option<PathBuf>,
    /// Mode that was set (CHMOD)
    pub mode: Option<u32>,
}

impl Applied {
    fn only(kind: ActionKind) -> Self {
        Self {
            kind,
            new_path: None,
            mode: None,
        }
    }

    fn at(kind: ActionKind, path: PathBuf) -> Self {
        Self {
            kind,
            new_path: Some(path),
            mode: None,
        }
    }

    /// One-line outcome for the user
    pub fn describe(&self) -> String {
        match (self.kind, &self.new_path, self.mode) {
            (ActionKind::Delete, _, _) => "Deleted.".to_string(),
            (ActionKind::Rename, Some(path), _) => format!(
                "Renamed to: {}",
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            ),
            (ActionKind::Move, Some(path), _) => format!("Moved to: {}", path.display()),
            (ActionKind::Copy, Some(path), _) => format!("Copied to: {}", path.display()),
            (ActionKind::Chmod, _, Some(mode)) => format!("Permissions set to: {:03o}", mode),
            _ => "Skipped.".to_string(),
        }
    }
}

/// Apply one action to the file currently at `current`
///
/// `current` differs from the action's own path when an earlier action of the
/// same plan already renamed the file. Relocations never overwrite: if the
/// planned destination has appeared since planning, the next free suffixed
/// name is used instead.
pub fn apply_action(action: &Action, current: &Path, config: &Config) -> Result<Applied, CleanError> {
    let separator = suffix_separator(&config.settings);

    match action.kind {
        ActionKind::Delete => {
            delete_file(current)?;
            Ok(Applied::only(ActionKind::Delete))
        }
        ActionKind::Chmod => {
            let mode = action.destination_mode().ok_or_else(|| {
                CleanError::Validation(format!("CHMOD for {} has no mode", current.display()))
            })?;
            set_mode(current, mode)?;
            Ok(Applied {
                kind: ActionKind::Chmod,
                new_path: None,
                mode: Some(mode),
            })
        }
        ActionKind::Rename | ActionKind::Move | ActionKind::Copy => {
            let planned = action.destination_path().ok_or_else(|| {
                CleanError::Validation(format!(
                    "{} for {} has no destination",
                    action.kind,
                    current.display()
                ))
            })?;
            let destination = resolve_destination(planned, separator)?;
            match action.kind {
                ActionKind::Rename => rename_file(current, &destination)?,
                ActionKind::Move => move_file(current, &destination)?,
                _ => {
                    copy_file_preserving(current, &destination)?;
                }
            }
            Ok(Applied::at(action.kind, destination))
        }
        ActionKind::Skip => Ok(Applied::only(ActionKind::Skip)),
    }
}

/// The planned destination, or the next free name beside it
fn resolve_destination(planned: &Path, separator: char) -> Result<PathBuf, CleanError> {
    if fs::symlink_metadata(planned).is_err() {
        return Ok(planned.to_path_buf());
    }
    let (dir, name) = match (planned.parent(), planned.file_name()) {
        (Some(dir), Some(name)) => (dir, name.to_string_lossy().into_owned()),
        _ => {
            return Err(CleanError::DestinationExists {
                path: planned.to_path_buf(),
            })
        }
    };
    Ok(free_path(dir, &name, separator))
}

pub fn delete_file(path: &Path) -> Result<(), CleanError> {
    fs::remove_file(path).map_err(|e| CleanError::from_io(path, e))
}

pub fn rename_file(from: &Path, to: &Path) -> Result<(), CleanError> {
    fs::rename(from, to).map_err(|e| CleanError::from_io(from, e))
}

/// Move a file, falling back to copy + delete across filesystems
pub fn move_file(from: &Path, to: &Path) -> Result<(), CleanError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| CleanError::from_io(parent, e))?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            tracing::debug!(
                "{} and {} are on different filesystems, copying",
                from.display(),
                to.display()
            );
            copy_file_preserving(from, to)?;
            delete_file(from)
        }
        Err(e) => Err(CleanError::from_io(from, e)),
    }
}

fn is_cross_device(error: &std::io::Error) -> bool {
    // EXDEV on Unix, ERROR_NOT_SAME_DEVICE on Windows
    let code = if cfg!(windows) { 17 } else { 18 };
    error.raw_os_error() == Some(code)
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<(), CleanError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| CleanError::from_io(path, e))
}

#[cfg(not(unix))]
pub fn set_mode(path: &Path, mode: u32) -> Result<(), CleanError> {
    let mut permissions = fs::metadata(path)
        .map_err(|e| CleanError::from_io(path, e))?
        .permissions();
    permissions.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, permissions).map_err(|e| CleanError::from_io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;
    use std::time::UNIX_EPOCH;
    use tempfile::TempDir;

    fn record(path: &Path) -> FileRecord {
        FileRecord::new(path.to_path_buf(), 1, UNIX_EPOCH, 0o600)
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("junk.tmp");
        fs::write(&path, b"x").expect("write");

        let applied = apply_action(&Action::delete(record(&path), "temp"), &path, &Config::default())
            .expect("delete should succeed");

        assert!(!path.exists());
        assert_eq!(applied.describe(), "Deleted.");
    }

    #[test]
    fn test_delete_vanished_file_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("gone");

        let result = apply_action(&Action::delete(record(&path), "temp"), &path, &Config::default());

        assert!(matches!(result, Err(CleanError::NotFound { .. })));
    }

    #[test]
    fn test_rename_never_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let from = temp_dir.path().join("a:b.txt");
        let taken = temp_dir.path().join("a_b.txt");
        fs::write(&from, b"mine").expect("write");
        fs::write(&taken, b"theirs").expect("write");

        let action = Action::rename(record(&from), taken.clone(), "bad chars");
        let applied = apply_action(&action, &from, &Config::default()).expect("rename");

        let landed = temp_dir.path().join("a_b_1.txt");
        assert_eq!(applied.new_path, Some(landed.clone()));
        assert_eq!(fs::read(&taken).unwrap(), b"theirs");
        assert_eq!(fs::read(&landed).unwrap(), b"mine");
        assert_eq!(applied.describe(), "Renamed to: a_b_1.txt");
    }

    #[test]
    fn test_move_creates_target_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let from = temp_dir.path().join("src/file.txt");
        let to = temp_dir.path().join("target/nested/file.txt");
        fs::create_dir_all(from.parent().unwrap()).expect("mkdir");
        fs::write(&from, b"payload").expect("write");

        let action = Action::move_to(record(&from), to.clone(), "consolidate");
        apply_action(&action, &from, &Config::default()).expect("move");

        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"payload");
    }

    #[test]
    fn test_copy_keeps_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let from = temp_dir.path().join("a.txt");
        let to = temp_dir.path().join("copies/a.txt");
        fs::write(&from, b"twice").expect("write");

        let action = Action::copy_to(record(&from), to.clone(), "copy");
        let applied = apply_action(&action, &from, &Config::default()).expect("copy");

        assert!(from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"twice");
        assert!(applied.describe().starts_with("Copied to:"));
    }

    #[test]
    #[cfg(unix)]
    fn test_chmod() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("f");
        fs::write(&path, b"x").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).expect("chmod");

        let applied = apply_action(&Action::chmod(record(&path), 0o644, "mode"), &path, &Config::default())
            .expect("chmod should succeed");

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(applied.describe(), "Permissions set to: 644");
    }
}
