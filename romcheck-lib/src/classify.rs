use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use romcheck_dat::{ContentHasher, HashIndex};

use crate::error::CheckError;
use crate::options::CheckOptions;

/// How a single file compares to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// Content and name both match the catalog
    Verified { name: String },
    /// Content matched and the file was renamed to its canonical name.
    /// This is a verified outcome, never a mismatch.
    Renamed { from: String, to: String },
    /// Content matches a catalog ROM stored under another name
    Mismatched { actual: String, expected: String },
    /// Content is not in the catalog
    Unknown { name: String },
}

impl ScanResult {
    /// True for files whose name and content now both match the catalog.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. } | Self::Renamed { .. })
    }

    /// The file's name on disk after classification.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Verified { name } | Self::Unknown { name } => name,
            Self::Renamed { to, .. } => to,
            Self::Mismatched { actual, .. } => actual,
        }
    }
}

/// Hash one file and classify it against the index.
///
/// With `options.rename`, a file whose content matches under a different
/// name is renamed in place before it is judged, so a successful rename
/// always yields [`ScanResult::Renamed`], the verified result of a rename
/// (see [`ScanResult::is_verified`]); it is never reported as mismatched.
/// A failed rename is returned as [`CheckError::Rename`]. The rename never
/// replaces another file and never leaves the file's folder: a catalog name
/// that is not a plain file name is refused. Unknown files are never touched.
pub fn classify_file(
    path: &Path,
    index: &HashIndex,
    hasher: &dyn ContentHasher,
    options: &CheckOptions,
) -> Result<ScanResult, CheckError> {
    fs::metadata(path).map_err(|source| CheckError::FileStat {
        path: path.to_path_buf(),
        source,
    })?;

    let actual = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let digest = hasher
        .digest_file(path)
        .map_err(|source| CheckError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    let Some(expected) = index.rom_name(&digest) else {
        log::debug!("{actual}: {digest} not in catalog");
        return Ok(ScanResult::Unknown { name: actual });
    };

    if actual == expected {
        return Ok(ScanResult::Verified {
            name: expected.to_string(),
        });
    }

    if !options.rename {
        return Ok(ScanResult::Mismatched {
            actual,
            expected: expected.to_string(),
        });
    }

    if !is_plain_file_name(expected) {
        return Err(CheckError::Rename {
            from: path.to_path_buf(),
            to: PathBuf::from(expected),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "catalog name is not a plain file name",
            ),
        });
    }

    let target = path.with_file_name(expected);
    // A case-only change on a case-insensitive filesystem sees the file
    // itself as the target.
    if target.exists() && !is_same_file(path, &target) {
        return Err(CheckError::Rename {
            from: path.to_path_buf(),
            to: target,
            source: io::Error::new(io::ErrorKind::AlreadyExists, "target already exists"),
        });
    }
    fs::rename(path, &target).map_err(|source| CheckError::Rename {
        from: path.to_path_buf(),
        to: target.clone(),
        source,
    })?;
    log::debug!("Renamed {actual} -> {expected}");

    Ok(ScanResult::Renamed {
        from: actual,
        to: expected.to_string(),
    })
}

/// True when `name` is a single normal path component.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// True when both paths refer to the same file on disk.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
