//! FileRecord - One regular file discovered by a scan

use super::CleanError;
use crate::hash::compute_hash;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Represents a regular file in a scan snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    /// Absolute path, unique within one snapshot
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Last modification time
    pub mtime: SystemTime,

    /// Unix permissions (mode bits)
    pub permissions: u32,

    /// Blake3 content hash (computed lazily)
    pub content_hash: Option<[u8; 32]>,
}

impl FileRecord {
    /// Create a new FileRecord with the given metadata and no hash
    pub fn new(path: PathBuf, size: u64, mtime: SystemTime, permissions: u32) -> Self {
        Self {
            path,
            size,
            mtime,
            permissions,
            content_hash: None,
        }
    }

    /// Check if this record has a computed hash
    pub fn has_hash(&self) -> bool {
        self.content_hash.is_some()
    }

    /// Basename of the file, lossily converted to UTF-8
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory holding the file
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Permission bits only (`rwxrwxrwx`)
    pub fn mode_bits(&self) -> u32 {
        self.permissions & 0o777
    }

    /// Return the content hash, reading the file the first time it is needed
    pub fn ensure_hash(&mut self) -> Result<[u8; 32], CleanError> {
        if let Some(hash) = self.content_hash {
            return Ok(hash);
        }
        let hash = compute_hash(&self.path)?;
        self.content_hash = Some(hash);
        Ok(hash)
    }
}
