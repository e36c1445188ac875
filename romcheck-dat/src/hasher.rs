use std::fmt;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use sha1::Digest;

const CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// Digest algorithm used to identify ROM contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Crc32,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 3] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Crc32,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Crc32 => "crc32",
        }
    }

    /// Length of the hex digest this algorithm produces.
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Crc32 => 8,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" | "sha-1" => Ok(HashAlgorithm::Sha1),
            "crc" | "crc32" => Ok(HashAlgorithm::Crc32),
            other => {
                let known: Vec<&str> = HashAlgorithm::ALL.iter().map(|a| a.as_str()).collect();
                Err(format!(
                    "unknown hash algorithm '{other}' (expected one of: {})",
                    known.join(", ")
                ))
            }
        }
    }
}

/// Compute the digest of everything `reader` yields, streaming in 64KB chunks.
///
/// The result is upper-case hex, matching how DAT digests are normalized.
pub fn compute_digest<R: Read>(reader: &mut R, algorithm: HashAlgorithm) -> io::Result<String> {
    let mut buf = vec![0u8; CHUNK_SIZE];

    match algorithm {
        HashAlgorithm::Md5 => {
            let mut ctx = md5::Context::new();
            stream_chunks(reader, &mut buf, |chunk| ctx.consume(chunk))?;
            Ok(format!("{:X}", ctx.compute()))
        }
        HashAlgorithm::Sha1 => {
            let mut sha = sha1::Sha1::new();
            stream_chunks(reader, &mut buf, |chunk| sha.update(chunk))?;
            Ok(format!("{:X}", sha.finalize()))
        }
        HashAlgorithm::Crc32 => {
            let mut crc = crc32fast::Hasher::new();
            stream_chunks(reader, &mut buf, |chunk| crc.update(chunk))?;
            Ok(format!("{:08X}", crc.finalize()))
        }
    }
}

fn stream_chunks<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    mut consume: impl FnMut(&[u8]),
) -> io::Result<()> {
    loop {
        let n = match reader.read(buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        consume(&buf[..n]);
    }
}

/// Source of content digests for files on disk.
///
/// The scanner and auditor only see this trait, so tests can substitute
/// hashers that fail or return fixed digests.
pub trait ContentHasher {
    fn digest_file(&self, path: &Path) -> io::Result<String>;
}

/// Hashes files from disk with a fixed algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileHasher {
    pub algorithm: HashAlgorithm,
}

impl FileHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl ContentHasher for FileHasher {
    fn digest_file(&self, path: &Path) -> io::Result<String> {
        let mut file = std::fs::File::open(path)?;
        compute_digest(&mut file, self.algorithm)
    }
}
