use thiserror::Error;

use romcheck_lib::CheckError;

/// Errors that end a `romcheck` run with a non-zero exit status.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Catalog or folder error from the check engine
    #[error("{0}")]
    Check(#[from] CheckError),

    /// Logger setup failed
    #[error("Logging error: {0}")]
    Logging(String),
}

impl CliError {
    pub(crate) fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
