use std::collections::{BTreeSet, HashMap};

use crate::dat::CatalogEntry;

/// What a digest resolves to in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRom {
    /// Canonical file name the ROM should have on disk
    pub rom_name: String,
    /// Name of the game the ROM belongs to
    pub game_name: String,
}

/// Digest → canonical ROM lookup built from a catalog.
///
/// Duplicate digests are last-write-wins: when two entries share a digest,
/// the later entry replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    by_hash: HashMap<String, IndexedRom>,
}

fn normalize_hash(hash: &str) -> String {
    hash.trim().to_uppercase()
}

impl HashIndex {
    /// Build an index from catalog entries, in order.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a CatalogEntry>,
    {
        let mut by_hash = HashMap::new();
        for entry in entries {
            let previous = by_hash.insert(
                normalize_hash(&entry.content_hash),
                IndexedRom {
                    rom_name: entry.rom_name.clone(),
                    game_name: entry.game_name.clone(),
                },
            );
            if let Some(previous) = previous {
                log::debug!(
                    "Digest {} of \"{}\" replaces \"{}\"",
                    entry.content_hash,
                    entry.rom_name,
                    previous.rom_name
                );
            }
        }
        Self { by_hash }
    }

    /// Look up a digest. Case-insensitive.
    pub fn get(&self, hash: &str) -> Option<&IndexedRom> {
        self.by_hash
            .get(hash)
            .or_else(|| self.by_hash.get(&normalize_hash(hash)))
    }

    /// Canonical ROM file name for a digest.
    pub fn rom_name(&self, hash: &str) -> Option<&str> {
        self.get(hash).map(|r| r.rom_name.as_str())
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.get(hash).is_some()
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// All (digest, rom) pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexedRom)> {
        self.by_hash.iter().map(|(h, r)| (h.as_str(), r))
    }

    /// Distinct game names reachable through the index, sorted.
    pub fn game_names(&self) -> BTreeSet<&str> {
        self.by_hash.values().map(|r| r.game_name.as_str()).collect()
    }
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod tests;
