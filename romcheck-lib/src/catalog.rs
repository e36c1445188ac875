use std::path::Path;

use romcheck_dat::{CatalogEntry, DatFile, HashAlgorithm, HashIndex, parse_dat_file};

use crate::error::CheckError;

/// A loaded DAT file together with the digest index built from it.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub dat: DatFile,
    pub algorithm: HashAlgorithm,
    pub entries: Vec<CatalogEntry>,
    pub index: HashIndex,
}

impl Catalog {
    /// Flatten a parsed DAT and index it by `algorithm`.
    pub fn from_dat(dat: DatFile, algorithm: HashAlgorithm) -> Self {
        let entries = dat.entries(algorithm);
        let index = HashIndex::from_entries(&entries);
        log::debug!(
            "Indexed {} of {} ROMs by {} ({} distinct digests)",
            entries.len(),
            dat.rom_count(),
            algorithm,
            index.len()
        );
        Self {
            dat,
            algorithm,
            entries,
            index,
        }
    }
}

/// Load and index a DAT file.
pub fn load_catalog(path: &Path, algorithm: HashAlgorithm) -> Result<Catalog, CheckError> {
    let dat = parse_dat_file(path).map_err(|e| CheckError::from_dat(path, e))?;
    let catalog = Catalog::from_dat(dat, algorithm);
    if catalog.entries.is_empty() && catalog.dat.rom_count() > 0 {
        log::warn!(
            "{} has no {} digests; every file will be reported unknown",
            path.display(),
            algorithm
        );
    }
    Ok(catalog)
}
