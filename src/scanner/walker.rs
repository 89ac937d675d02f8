//! Sequential directory walker

use crate::types::{CleanError, FileRecord, Inventory};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// Callback for reporting scan progress
///
/// Arguments:
/// - `files_scanned`: Total number of files scanned so far
/// - `bytes_scanned`: Total bytes scanned so far
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Scan every root and build a flat inventory of regular files
///
/// Walks each root recursively using the `ignore` crate with all ignore-file
/// filtering switched off: every regular file counts, hidden ones included.
///
/// # Symlinks
/// Symbolic links are opaque. They are never followed, never recorded and
/// never hashed, so a link cannot create a cycle or make a file appear twice.
///
/// # Errors
/// Nothing here is fatal. A root that is not a directory, an unreadable
/// directory or a file whose metadata cannot be read is logged, recorded in
/// [`Inventory::issues`] and skipped.
///
/// # Ordering
/// Directory entries are visited sorted by file name and the inventory is
/// keyed by path, so an unchanged filesystem always yields the same snapshot.
/// A path reachable from two overlapping roots is recorded once.
pub fn scan_roots(roots: &[PathBuf], on_progress: Option<&ProgressCallback>) -> Inventory {
    let start_time = Instant::now();
    let mut inventory = Inventory::new(roots.to_vec());

    let mut scanned_count: u64 = 0;
    let mut scanned_bytes: u64 = 0;

    for root in roots {
        if !root.is_dir() {
            warn!("Skipping {}: not a directory", root.display());
            inventory.add_issue(root.clone(), "Not a directory");
            continue;
        }

        let walker = ignore::WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(false)
            .parents(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    record_walk_error(&mut inventory, root, &e);
                    continue;
                }
            };

            let file_type = match entry.file_type() {
                Some(ft) => ft,
                None => continue,
            };

            if file_type.is_dir() {
                if entry.depth() > 0 {
                    inventory.increment_dirs();
                }
                continue;
            }

            if file_type.is_symlink() {
                debug!("Not following symlink {}", entry.path().display());
                continue;
            }

            // Pipes, sockets, devices
            if !file_type.is_file() {
                continue;
            }

            match read_record(entry.path()) {
                Ok(record) => {
                    let size = record.size;
                    if inventory.insert(record) {
                        scanned_count += 1;
                        scanned_bytes += size;
                        if let Some(callback) = on_progress {
                            callback(scanned_count, scanned_bytes);
                        }
                    }
                }
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    inventory.add_issue(entry.path().to_path_buf(), e.to_string());
                }
            }
        }
    }

    inventory.set_scan_duration(start_time.elapsed());
    debug!(
        "Scanned {} file(s) in {} dir(s), {} issue(s), {:?}",
        inventory.total_files,
        inventory.total_dirs,
        inventory.issues.len(),
        inventory.scan_duration
    );
    inventory
}

/// Record a traversal error against the entry that failed, or the root
/// when the error carries no path
fn record_walk_error(inventory: &mut Inventory, root: &Path, err: &ignore::Error) {
    let (path, cause) = unwrap_walk_error(err);
    let path = path.unwrap_or(root);
    warn!(
        "Error during directory traversal at {}: {}. Scan will continue.",
        path.display(),
        cause
    );
    inventory.add_issue(path.to_path_buf(), cause.to_string());
}

/// Peel the depth/line/path wrappers off a walk error
fn unwrap_walk_error(err: &ignore::Error) -> (Option<&Path>, &ignore::Error) {
    match err {
        ignore::Error::WithPath { path, err } => {
            let (inner_path, cause) = unwrap_walk_error(err);
            (inner_path.or(Some(path.as_path())), cause)
        }
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            unwrap_walk_error(err)
        }
        ignore::Error::Loop { child, .. } => (Some(child.as_path()), err),
        _ => (None, err),
    }
}

/// Read the metadata of one regular file into a record (hash left unset)
pub fn read_record(path: &Path) -> Result<FileRecord, CleanError> {
    let metadata = fs::metadata(path).map_err(|e| CleanError::from_io(path, e))?;
    let mtime = metadata
        .modified()
        .map_err(|e| CleanError::from_io(path, e))?;

    #[cfg(unix)]
    let permissions = {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode()
    };

    #[cfg(not(unix))]
    let permissions = if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };

    Ok(FileRecord::new(
        path.to_path_buf(),
        metadata.len(),
        mtime,
        permissions,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();

        let inventory = scan_roots(&[root.clone()], None);

        assert!(inventory.is_empty(), "Inventory should be empty");
        assert_eq!(inventory.total_size, 0);
        assert_eq!(inventory.roots, vec![root]);
        assert!(inventory.issues.is_empty());
    }

    #[test]
    fn test_scan_single_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let file_path = root.join("test.txt");
        let mut file = fs::File::create(&file_path).expect("Failed to create file");
        file.write_all(b"Hello, World!").expect("Failed to write");
        drop(file);

        let inventory = scan_roots(&[root.to_path_buf()], None);

        assert_eq!(inventory.total_files, 1);
        assert_eq!(inventory.total_size, 13);

        let record = inventory.get(&file_path).expect("Record should exist");
        assert_eq!(record.size, 13);
        assert_eq!(record.file_name(), "test.txt");
        assert!(!record.has_hash(), "Hash must not be computed by the scan");
    }

    #[test]
    fn test_scan_nested_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        fs::create_dir_all(root.join("a/b")).expect("Failed to create dirs");
        fs::create_dir(root.join("c")).expect("Failed to create dir");
        fs::write(root.join("a/b/file.txt"), b"File 1").expect("Failed to write");
        fs::write(root.join("c/file2.txt"), b"File 2 content").expect("Failed to write");

        let inventory = scan_roots(&[root.to_path_buf()], None);

        assert_eq!(inventory.total_files, 2);
        assert_eq!(inventory.total_size, 6 + 14);
        assert_eq!(inventory.total_dirs, 3, "a, a/b and c");
        assert!(inventory.contains(&root.join("a/b/file.txt")));
        assert!(inventory.contains(&root.join("c/file2.txt")));
    }

    #[test]
    fn test_scan_includes_hidden_and_ignored_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        fs::write(root.join(".gitignore"), "*.log\n").expect("Failed to write");
        fs::write(root.join(".hidden"), "x").expect("Failed to write");
        fs::write(root.join("debug.log"), "x").expect("Failed to write");

        let inventory = scan_roots(&[root.to_path_buf()], None);

        assert!(inventory.contains(&root.join(".hidden")));
        assert!(inventory.contains(&root.join("debug.log")));
        assert_eq!(inventory.total_files, 3);
    }

    #[test]
    #[cfg(unix)]
    fn test_scan_skips_symlinks() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        fs::create_dir(root.join("real")).expect("Failed to create dir");
        fs::write(root.join("real/target.txt"), b"Target content").expect("Failed to write");
        std::os::unix::fs::symlink(root.join("real/target.txt"), root.join("link.txt"))
            .expect("Failed to create file symlink");
        // A link back to the root would loop forever if followed
        std::os::unix::fs::symlink(root, root.join("real/loop"))
            .expect("Failed to create dir symlink");

        let inventory = scan_roots(&[root.to_path_buf()], None);

        assert_eq!(inventory.total_files, 1);
        assert!(inventory.contains(&root.join("real/target.txt")));
        assert!(!inventory.contains(&root.join("link.txt")));
    }

    #[test]
    fn test_missing_root_is_reported_not_fatal() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::write(root.join("kept.txt"), b"x").expect("Failed to write");
        let missing = root.join("does-not-exist");

        let inventory = scan_roots(&[missing.clone(), root.to_path_buf()], None);

        assert_eq!(inventory.total_files, 1);
        assert_eq!(inventory.issues.len(), 1);
        assert_eq!(inventory.issues[0].path, missing);
    }

    #[test]
    fn test_walk_error_is_recorded_at_failing_entry() {
        let root = PathBuf::from("/data/y");
        let locked = root.join("locked");
        let mut inventory = Inventory::new(vec![root.clone()]);
        let err = ignore::Error::WithDepth {
            depth: 1,
            err: Box::new(ignore::Error::WithPath {
                path: locked.clone(),
                err: Box::new(ignore::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "Permission denied",
                ))),
            }),
        };

        record_walk_error(&mut inventory, &root, &err);

        assert_eq!(inventory.issues.len(), 1);
        assert_eq!(inventory.issues[0].path, locked);
        assert_eq!(inventory.issues[0].message, "Permission denied");
    }

    #[test]
    fn test_walk_error_without_path_falls_back_to_root() {
        let root = PathBuf::from("/data/y");
        let mut inventory = Inventory::new(vec![root.clone()]);
        let err = ignore::Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "device gone"));

        record_walk_error(&mut inventory, &root, &err);

        assert_eq!(inventory.issues[0].path, root);
        assert!(inventory.issues[0].message.contains("device gone"));
    }

    #[test]
    #[cfg(unix)]
    fn test_unreadable_directory_is_skipped_and_reported() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        let locked = root.join("locked");
        fs::create_dir(&locked).expect("Failed to create dir");
        fs::write(locked.join("hidden.txt"), b"x").expect("Failed to write");
        fs::write(root.join("open.txt"), b"y").expect("Failed to write");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

        // Root can still read the directory; only check the no-access case
        let readable = fs::read_dir(&locked).is_ok();
        let inventory = scan_roots(&[root.to_path_buf()], None);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

        assert!(inventory.contains(&root.join("open.txt")));
        if !readable {
            assert!(!inventory.contains(&locked.join("hidden.txt")));
            assert_eq!(inventory.issues.len(), 1);
            assert_eq!(inventory.issues[0].path, locked);
        }
    }

    #[test]
    fn test_overlapping_roots_record_each_file_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir(root.join("inner")).expect("Failed to create dir");
        fs::write(root.join("inner/file.txt"), b"x").expect("Failed to write");

        let inventory = scan_roots(&[root.to_path_buf(), root.join("inner")], None);

        assert_eq!(inventory.total_files, 1);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        for name in ["b.txt", "a.txt", "c/d.txt", "c/a.txt"] {
            let path = root.join(name);
            fs::create_dir_all(path.parent().unwrap()).expect("Failed to create dir");
            fs::write(&path, name).expect("Failed to write");
        }

        let first = scan_roots(&[root.to_path_buf()], None);
        let second = scan_roots(&[root.to_path_buf()], None);

        let first_paths: Vec<_> = first.iter().map(|r| r.path.clone()).collect();
        let second_paths: Vec<_> = second.iter().map(|r| r.path.clone()).collect();
        assert_eq!(first_paths, second_paths);
        assert_eq!(first.records, second.records);
    }

    #[test]
    #[cfg(unix)]
    fn test_permissions_are_captured() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("script.sh");
        fs::write(&path, b"#!/bin/sh\n").expect("Failed to write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o750)).expect("chmod");

        let record = read_record(&path).expect("read_record should succeed");
        assert_eq!(record.mode_bits(), 0o750);
    }

    #[test]
    fn test_scan_progress_callback() {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::sync::Arc;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        for i in 1..=5 {
            fs::write(root.join(format!("file{}.txt", i)), format!("content {}", i))
                .expect("Failed to write");
        }

        let call_count = Arc::new(AtomicU64::new(0));
        let call_count_clone = Arc::clone(&call_count);
        let callback: ProgressCallback = Box::new(move |files, bytes| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            assert!(files > 0);
            assert!(bytes > 0);
        });

        let inventory = scan_roots(&[root.to_path_buf()], Some(&callback));

        assert_eq!(call_count.load(Ordering::SeqCst), 5);
        assert_eq!(inventory.total_files, 5);
        assert!(inventory.scan_duration >= Duration::from_secs(0));
    }
}
