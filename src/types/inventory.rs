//! Inventory - Flat snapshot of the files found under the scanned roots

use super::FileRecord;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// An entry the scanner had to skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanIssue {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// File inventory for one phase
///
/// Keyed by absolute path so iteration order is stable across runs on an
/// unchanged filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    /// Map: absolute path → FileRecord
    pub records: BTreeMap<PathBuf, FileRecord>,

    /// Aggregate statistics
    pub total_size: u64,
    pub total_files: usize,
    pub total_dirs: usize,

    /// Scan metadata
    pub scan_duration: Duration,
    pub roots: Vec<PathBuf>,
    pub issues: Vec<ScanIssue>,
}

impl Inventory {
    /// Create a new empty inventory for the given roots
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            records: BTreeMap::new(),
            total_size: 0,
            total_files: 0,
            total_dirs: 0,
            scan_duration: Duration::from_secs(0),
            roots,
            issues: Vec::new(),
        }
    }

    /// Insert a record, keyed by its path
    ///
    /// Returns false (and keeps the first record) when the path was already
    /// present, which happens when roots overlap.
    pub fn insert(&mut self, record: FileRecord) -> bool {
        if self.records.contains_key(&record.path) {
            return false;
        }
        self.total_size += record.size;
        self.total_files += 1;
        self.records.insert(record.path.clone(), record);
        true
    }

    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.records.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in path order
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values()
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut FileRecord> {
        self.records.get_mut(path)
    }

    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.scan_duration = duration;
    }

    pub fn increment_dirs(&mut self) {
        self.total_dirs += 1;
    }

    pub fn add_issue(&mut self, path: PathBuf, message: impl Into<String>) {
        self.issues.push(ScanIssue {
            path,
            message: message.into(),
        });
    }
}
