use romcheck_dat::HashAlgorithm;

/// Options controlling a check run. Passed explicitly to every operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Rename matched files to their canonical DAT name
    pub rename: bool,
    /// Digest used to identify files
    pub algorithm: HashAlgorithm,
}

impl CheckOptions {
    pub fn with_rename(mut self, rename: bool) -> Self {
        self.rename = rename;
        self
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}
