//! Hashing utilities

use crate::types::CleanError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compute the Blake3 hash of a file's full contents
///
/// The file is streamed in 64KB chunks, so memory use does not grow with
/// file size. Only called for files whose basename collides with another
/// file; see the deduplication phase.
///
/// # Example
/// ```no_run
/// use cleanfiles::hash::compute_hash;
/// use std::path::Path;
///
/// let hash = compute_hash(Path::new("file.txt"))?;
/// # Ok::<(), cleanfiles::types::CleanError>(())
/// ```
pub fn compute_hash(file_path: &Path) -> Result<[u8; 32], CleanError> {
    let mut file = File::open(file_path).map_err(|e| CleanError::from_io(file_path, e))?;

    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| CleanError::from_io(file_path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[0..bytes_read]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Short hex prefix of a hash, for log lines
pub fn short_hex(hash: &[u8; 32]) -> String {
    hash.iter().take(6).map(|b| format!("{:02x}", b)).collect()
}
