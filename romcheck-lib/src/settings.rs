//! Persisted defaults for check runs.
//!
//! The settings file lives at `~/.config/romcheck/settings.toml`:
//!
//! ```toml
//! [check]
//! hash = "md5"
//! rename = false
//! ```
//!
//! Command-line flags always take precedence over these values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use romcheck_dat::HashAlgorithm;

use crate::options::CheckOptions;

/// Canonical path to the settings file: `~/.config/romcheck/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romcheck").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub check: CheckSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Digest name: `md5`, `sha1` or `crc32`
    pub hash: Option<String>,
    pub rename: bool,
}

impl Settings {
    /// Load from the default settings path.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    /// Load from `path`. A missing file yields defaults; a malformed one is
    /// logged and also yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match Self::parse(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Check options seeded from these settings.
    pub fn check_options(&self) -> CheckOptions {
        let algorithm = match self.check.hash.as_deref().map(str::parse::<HashAlgorithm>) {
            Some(Ok(algorithm)) => algorithm,
            Some(Err(e)) => {
                log::warn!("settings.toml: {e}; using {}", HashAlgorithm::default());
                HashAlgorithm::default()
            }
            None => HashAlgorithm::default(),
        };
        CheckOptions::default()
            .with_rename(self.check.rename)
            .with_algorithm(algorithm)
    }
}
