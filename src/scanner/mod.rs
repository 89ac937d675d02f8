//! Directory scanning logic

mod walker;

pub use walker::{read_record, scan_roots, ProgressCallback};
