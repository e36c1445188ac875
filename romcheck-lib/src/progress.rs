/// Progress update emitted while scanning or auditing a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanProgress {
    /// The folder has been listed
    Listing {
        /// Number of direct entries found
        total: usize,
    },

    /// A file is being hashed
    Hashing {
        file_name: String,
        /// Zero-based position in the listing
        index: usize,
        total: usize,
    },

    /// All entries have been processed
    Done,
}

impl ScanProgress {
    pub fn hashing(file_name: impl Into<String>, index: usize, total: usize) -> Self {
        Self::Hashing {
            file_name: file_name.into(),
            index,
            total,
        }
    }
}
