//! File copy with metadata preservation

use crate::types::CleanError;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Copy a file using the write-then-rename strategy
///
/// 1. Write to a temporary `.part` file next to the destination
/// 2. Flush and sync to disk
/// 3. Preserve permissions and mtime
/// 4. Rename to the final destination
///
/// Keeping the mtime matters: the deduplication phase ranks files by age.
///
/// # Example
/// ```no_run
/// use cleanfiles::executor::copy_file_preserving;
/// use std::path::Path;
///
/// let bytes = copy_file_preserving(Path::new("source.txt"), Path::new("dest.txt"))?;
/// # Ok::<(), cleanfiles::types::CleanError>(())
/// ```
pub fn copy_file_preserving(src: &Path, dest: &Path) -> Result<u64, CleanError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| CleanError::from_io(parent, e))?;
    }

    let part_path = part_path_for(dest);
    let result = copy_into_part(src, &part_path).and_then(|bytes| {
        fs::rename(&part_path, dest).map_err(|e| CleanError::from_io(dest, e))?;
        Ok(bytes)
    });

    if result.is_err() {
        let _ = fs::remove_file(&part_path);
    }
    result
}

fn part_path_for(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".cleanfiles-part");
    dest.with_file_name(name)
}

fn copy_into_part(src: &Path, part_path: &Path) -> Result<u64, CleanError> {
    let mut src_file = File::open(src).map_err(|e| CleanError::from_io(src, e))?;
    let mut part_file = File::create(part_path).map_err(|e| CleanError::from_io(part_path, e))?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer).map_err(CleanError::Io)?;
        if bytes_read == 0 {
            break;
        }
        part_file
            .write_all(&buffer[0..bytes_read])
            .map_err(CleanError::Io)?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all().map_err(CleanError::Io)?;

    // Drop the file handle before rename (required on Windows)
    drop(part_file);

    let src_metadata = fs::metadata(src).map_err(|e| CleanError::from_io(src, e))?;
    fs::set_permissions(part_path, src_metadata.permissions()).map_err(CleanError::Io)?;

    let mtime = src_metadata.modified().map_err(CleanError::Io)?;
    filetime::set_file_mtime(part_path, filetime::FileTime::from_system_time(mtime))
        .map_err(CleanError::Io)?;

    Ok(total_bytes)
}
