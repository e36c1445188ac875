pub mod dat;
pub mod error;
pub mod hasher;
pub mod index;

pub use dat::{CatalogEntry, DatFile, DatGame, DatRom, parse_dat, parse_dat_file};
pub use error::DatError;
pub use hasher::{ContentHasher, FileHasher, HashAlgorithm, compute_digest};
pub use index::{HashIndex, IndexedRom};
