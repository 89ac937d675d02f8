//! File name helpers: sanitizing and collision-free naming

use crate::config::Settings;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Split a name into stem and extension the way most tools do
///
/// `"a.tar.gz"` → `("a.tar", ".gz")`, `".bashrc"` → `(".bashrc", "")`.
pub fn split_name(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(idx) => name.split_at(leading_dots + idx),
        None => (name, ""),
    }
}

/// Replace every bad character with the replacement
pub fn sanitize_name(name: &str, bad_chars: &BTreeSet<char>, replacement: char) -> String {
    name.chars()
        .map(|c| if bad_chars.contains(&c) { replacement } else { c })
        .collect()
}

/// Check a name for any bad character
pub fn has_bad_chars(name: &str, bad_chars: &BTreeSet<char>) -> bool {
    name.chars().any(|c| bad_chars.contains(&c))
}

/// `report.txt`, 2 → `report_2.txt`
pub fn numbered_name(name: &str, n: usize, separator: char) -> String {
    let (stem, ext) = split_name(name);
    format!("{}{}{}{}", stem, separator, n, ext)
}

/// Separator for disambiguating suffixes; never one of the bad characters
pub fn suffix_separator(settings: &Settings) -> char {
    if settings.bad_chars.contains(&'_') {
        settings.replacement_char
    } else {
        '_'
    }
}

fn exists_on_disk(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// First free path for `name` inside `dir`, looking at the filesystem only
pub fn free_path(dir: &Path, name: &str, separator: char) -> PathBuf {
    let mut candidate = dir.join(name);
    let mut n = 1;
    while exists_on_disk(&candidate) {
        candidate = dir.join(numbered_name(name, n, separator));
        n += 1;
    }
    candidate
}

/// Destinations handed out while building one plan
///
/// A path counts as taken when it exists on disk or was already claimed by an
/// earlier action of the same plan, so two files never get the same new name.
#[derive(Debug, Default)]
pub struct NameClaims {
    claimed: HashSet<PathBuf>,
}

impl NameClaims {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_taken(&self, path: &Path) -> bool {
        self.claimed.contains(path) || exists_on_disk(path)
    }

    /// Claim `dir/name`, or the first free `dir/stem_N.ext`
    pub fn claim_free_path(&mut self, dir: &Path, name: &str, separator: char) -> PathBuf {
        let mut candidate = dir.join(name);
        let mut n = 1;
        while self.is_taken(&candidate) {
            candidate = dir.join(numbered_name(name, n, separator));
            n += 1;
        }
        self.claimed.insert(candidate.clone());
        candidate
    }
}
