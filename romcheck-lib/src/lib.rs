//! Verification engine for ROM folders checked against a DAT catalog.
//!
//! Build a [`HashIndex`] once with [`load_catalog`], then either classify
//! each file with [`scan_directory`] or report catalog completeness with
//! [`audit_collection`].

pub mod audit;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod options;
pub mod progress;
pub mod scanner;
pub mod settings;

pub use audit::{CollectionReport, GameOwnership, audit_collection};
pub use catalog::{Catalog, load_catalog};
pub use classify::{ScanResult, classify_file};
pub use error::CheckError;
pub use options::CheckOptions;
pub use progress::ScanProgress;
pub use scanner::{ScanEntry, ScanOutcome, ScanReport, ScanSummary, scan_directory};
pub use settings::Settings;

pub use romcheck_dat::{ContentHasher, FileHasher, HashAlgorithm, HashIndex};
