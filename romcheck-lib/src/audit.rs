//! Collection completeness: which catalog games have a matching file in the
//! folder, and which are missing.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use romcheck_dat::{ContentHasher, HashIndex};

use crate::error::CheckError;
use crate::progress::ScanProgress;
use crate::scanner::list_directory;

/// Ownership of one catalog game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOwnership {
    pub name: String,
    pub owned: bool,
    /// The file that satisfied the game, for owned games
    pub matched_file: Option<String>,
}

/// Result of auditing a folder against the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionReport {
    /// Every distinct catalog game, sorted by name (byte-wise)
    pub games: Vec<GameOwnership>,
    /// Files whose digest is not in the catalog, or whose game was already
    /// claimed by an earlier file with the same digest
    pub extra_files: Vec<String>,
}

impl CollectionReport {
    pub fn total(&self) -> usize {
        self.games.len()
    }

    pub fn owned_count(&self) -> usize {
        self.games.iter().filter(|g| g.owned).count()
    }

    pub fn missing_count(&self) -> usize {
        self.total() - self.owned_count()
    }
}

/// Hash every direct file in `dir` and report, for every game in the
/// catalog, whether a matching file was found.
///
/// A game is owned when any of its digests matches a file. Digests that
/// never match mark their game missing only if no other digest of that game
/// matched. Unlike a plain scan, a file that cannot be read aborts the
/// audit, since skipping it could report an owned game as missing.
pub fn audit_collection(
    dir: &Path,
    index: &HashIndex,
    hasher: &dyn ContentHasher,
    progress: &dyn Fn(ScanProgress),
) -> Result<CollectionReport, CheckError> {
    let listing = list_directory(dir)?;
    let total = listing.len();
    progress(ScanProgress::Listing { total });

    let mut remaining: HashSet<&str> = index.iter().map(|(hash, _)| hash).collect();
    let mut owned: BTreeMap<String, Option<String>> = BTreeMap::new();
    let mut extra_files = Vec::new();

    for (i, entry) in listing.iter().enumerate() {
        if entry.is_dir {
            continue;
        }
        progress(ScanProgress::hashing(&entry.name, i, total));

        let digest = hasher
            .digest_file(&entry.path)
            .map_err(|source| CheckError::FileRead {
                path: entry.path.clone(),
                source,
            })?
            .to_uppercase();

        match index.get(&digest) {
            Some(rom) if remaining.remove(digest.as_str()) => {
                log::debug!("{} satisfies \"{}\"", entry.name, rom.game_name);
                owned
                    .entry(rom.game_name.clone())
                    .or_insert_with(|| Some(entry.name.clone()));
            }
            Some(rom) => {
                log::debug!(
                    "{} duplicates an already matched dump of \"{}\"",
                    entry.name,
                    rom.game_name
                );
                extra_files.push(entry.name.clone());
            }
            None => extra_files.push(entry.name.clone()),
        }
    }

    let mut games: BTreeMap<String, GameOwnership> = owned
        .into_iter()
        .map(|(name, matched_file)| {
            let ownership = GameOwnership {
                name: name.clone(),
                owned: true,
                matched_file,
            };
            (name, ownership)
        })
        .collect();

    for hash in remaining {
        if let Some(rom) = index.get(hash) {
            games
                .entry(rom.game_name.clone())
                .or_insert_with(|| GameOwnership {
                    name: rom.game_name.clone(),
                    owned: false,
                    matched_file: None,
                });
        }
    }
    progress(ScanProgress::Done);

    Ok(CollectionReport {
        games: games.into_values().collect(),
        extra_files,
    })
}

#[cfg(test)]
#[path = "tests/audit_tests.rs"]
mod tests;
