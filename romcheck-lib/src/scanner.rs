//! Non-recursive folder scan: every direct child is either reported as a
//! directory or classified against the catalog.

use std::fs;
use std::path::{Path, PathBuf};

use romcheck_dat::{ContentHasher, HashIndex};

use crate::classify::{ScanResult, classify_file};
use crate::error::CheckError;
use crate::options::CheckOptions;
use crate::progress::ScanProgress;

/// One direct child of the scanned folder.
#[derive(Debug)]
pub(crate) struct ListedEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List the direct children of `dir`, sorted by file name.
pub(crate) fn list_directory(dir: &Path) -> Result<Vec<ListedEntry>, CheckError> {
    let list_error = |source: std::io::Error| CheckError::DirectoryList {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        let path = entry.path();
        entries.push(ListedEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: path.is_dir(),
            path,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(entries)
}

/// What happened to a single entry.
#[derive(Debug)]
pub enum ScanOutcome {
    /// The file was hashed and classified
    File(ScanResult),
    /// A subdirectory; reported but never descended into
    Directory,
    /// The file could not be classified; the scan carried on
    Failed(CheckError),
}

/// A scanned entry, in listing order.
#[derive(Debug)]
pub struct ScanEntry {
    pub name: String,
    pub path: PathBuf,
    pub outcome: ScanOutcome,
}

/// Counts of each outcome in a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub verified: usize,
    pub renamed: usize,
    pub mismatched: usize,
    pub unknown: usize,
    pub directories: usize,
    pub errors: usize,
}

impl ScanSummary {
    fn record(&mut self, outcome: &ScanOutcome) {
        match outcome {
            ScanOutcome::File(ScanResult::Verified { .. }) => self.verified += 1,
            ScanOutcome::File(ScanResult::Renamed { .. }) => self.renamed += 1,
            ScanOutcome::File(ScanResult::Mismatched { .. }) => self.mismatched += 1,
            ScanOutcome::File(ScanResult::Unknown { .. }) => self.unknown += 1,
            ScanOutcome::Directory => self.directories += 1,
            ScanOutcome::Failed(_) => self.errors += 1,
        }
    }

    /// Number of files (not directories) looked at.
    pub fn files(&self) -> usize {
        self.verified + self.renamed + self.mismatched + self.unknown + self.errors
    }
}

/// Result of scanning a folder.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub entries: Vec<ScanEntry>,
    pub summary: ScanSummary,
}

/// Classify every direct child of `dir` against the index.
///
/// Failing to list `dir` aborts the scan. A file that cannot be read or
/// renamed is recorded as [`ScanOutcome::Failed`] and the scan continues.
pub fn scan_directory(
    dir: &Path,
    index: &HashIndex,
    hasher: &dyn ContentHasher,
    options: &CheckOptions,
    progress: &dyn Fn(ScanProgress),
) -> Result<ScanReport, CheckError> {
    let listing = list_directory(dir)?;
    let total = listing.len();
    progress(ScanProgress::Listing { total });

    let mut report = ScanReport::default();
    for (i, entry) in listing.into_iter().enumerate() {
        let outcome = if entry.is_dir {
            ScanOutcome::Directory
        } else {
            progress(ScanProgress::hashing(&entry.name, i, total));
            match classify_file(&entry.path, index, hasher, options) {
                Ok(result) => ScanOutcome::File(result),
                Err(e) => {
                    log::debug!("Skipping {}: {e}", entry.name);
                    ScanOutcome::Failed(e)
                }
            }
        };

        report.summary.record(&outcome);
        report.entries.push(ScanEntry {
            name: entry.name,
            path: entry.path,
            outcome,
        });
    }
    progress(ScanProgress::Done);

    Ok(report)
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
