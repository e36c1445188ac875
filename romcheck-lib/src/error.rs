use std::path::PathBuf;

use thiserror::Error;

use romcheck_dat::DatError;

/// Errors raised while checking a ROM folder against a catalog.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The DAT file could not be opened or read
    #[error("Cannot read DAT file {}: {source}", path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: DatError,
    },

    /// The DAT file was read but its contents are malformed
    #[error("Cannot parse DAT file {}: {source}", path.display())]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: DatError,
    },

    /// The ROM folder could not be listed
    #[error("Cannot list directory {}: {source}", path.display())]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File metadata could not be read
    #[error("Cannot stat {}: {source}", path.display())]
    FileStat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents could not be read for hashing
    #[error("Cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A matched file could not be renamed to its canonical name
    #[error("Failed to rename {} -> {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CheckError {
    /// Wrap a DAT loading error, separating unreadable from malformed files.
    pub fn from_dat(path: impl Into<PathBuf>, source: DatError) -> Self {
        let path = path.into();
        if source.is_io() {
            Self::CatalogRead { path, source }
        } else {
            Self::CatalogParse { path, source }
        }
    }

    /// Fatal errors abort the whole run; the rest only affect one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CatalogRead { .. } | Self::CatalogParse { .. } | Self::DirectoryList { .. }
        )
    }
}
