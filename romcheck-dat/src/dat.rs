use std::io::{BufRead, Read};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::DatError;
use crate::hasher::HashAlgorithm;

/// A parsed DAT file (supports both Logiqx XML and ClrMamePro formats).
#[derive(Debug, Clone, Default)]
pub struct DatFile {
    pub name: String,
    pub description: String,
    pub version: String,
    pub games: Vec<DatGame>,
}

/// A single game entry from a DAT file.
#[derive(Debug, Clone, Default)]
pub struct DatGame {
    pub name: String,
    pub roms: Vec<DatRom>,
}

/// A single ROM entry within a game.
///
/// Digests are stored as upper-case hex so they compare directly against
/// the output of [`crate::compute_digest`].
#[derive(Debug, Clone, Default)]
pub struct DatRom {
    pub name: String,
    pub size: u64,
    pub crc: Option<String>,
    pub md5: Option<String>,
    pub sha1: Option<String>,
    /// Dump status (`verified`, `baddump`, `nodump`, ...), if present
    pub status: Option<String>,
}

impl DatRom {
    /// The digest recorded for the given algorithm, if any.
    pub fn digest(&self, algorithm: HashAlgorithm) -> Option<&str> {
        match algorithm {
            HashAlgorithm::Md5 => self.md5.as_deref(),
            HashAlgorithm::Sha1 => self.sha1.as_deref(),
            HashAlgorithm::Crc32 => self.crc.as_deref(),
        }
    }
}

/// One flattened catalog record: a game, its canonical ROM file name, and the
/// digest it is identified by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub game_name: String,
    pub rom_name: String,
    pub size: u64,
    pub content_hash: String,
    pub status: String,
}

impl DatFile {
    /// Flatten every game into catalog entries keyed by `algorithm`, in
    /// document order. ROMs without a well-formed digest for that algorithm
    /// are skipped.
    pub fn entries(&self, algorithm: HashAlgorithm) -> Vec<CatalogEntry> {
        let mut entries = Vec::new();
        for game in &self.games {
            for rom in &game.roms {
                let Some(hash) = rom.digest(algorithm) else {
                    log::debug!(
                        "Skipping \"{}\": no {} digest in DAT",
                        rom.name,
                        algorithm
                    );
                    continue;
                };
                if hash.len() != algorithm.hex_len() || !hash.bytes().all(|b| b.is_ascii_hexdigit())
                {
                    log::warn!(
                        "Skipping \"{}\": malformed {} digest \"{}\"",
                        rom.name,
                        algorithm,
                        hash
                    );
                    continue;
                }
                entries.push(CatalogEntry {
                    game_name: game.name.clone(),
                    rom_name: rom.name.clone(),
                    size: rom.size,
                    content_hash: hash.to_string(),
                    status: rom.status.clone().unwrap_or_default(),
                });
            }
        }
        entries
    }

    /// Total number of ROM records across all games.
    pub fn rom_count(&self) -> usize {
        self.games.iter().map(|g| g.roms.len()).sum()
    }
}

/// Parse a DAT file, auto-detecting format (XML or ClrMamePro).
pub fn parse_dat<R: BufRead>(mut reader: R) -> Result<DatFile, DatError> {
    // Peek at the first non-whitespace content to detect format
    let mut first_bytes = Vec::new();
    let mut buf = [0u8; 1];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            return Err(DatError::invalid_dat("Empty DAT file"));
        }
        first_bytes.push(buf[0]);
        if !buf[0].is_ascii_whitespace() {
            break;
        }
    }

    let chain = std::io::Cursor::new(first_bytes).chain(reader);
    let buffered = std::io::BufReader::new(chain);

    if buf[0] == b'<' {
        parse_xml(buffered)
    } else {
        parse_clrmamepro(buffered)
    }
}

/// Parse a DAT file from a file path.
pub fn parse_dat_file(path: &Path) -> Result<DatFile, DatError> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    parse_dat(reader)
}

fn normalize_hex(value: &str) -> String {
    value.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// Logiqx XML parser
// ---------------------------------------------------------------------------

fn parse_xml<R: BufRead>(reader: R) -> Result<DatFile, DatError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut dat = DatFile::default();

    let mut in_header = false;
    let mut current_tag = String::new();
    let mut current_game: Option<DatGame> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag_name.as_str() {
                    "header" => in_header = true,
                    // MAME-style DATs use <machine> in place of <game>
                    "game" | "machine" => {
                        current_game = Some(DatGame {
                            name: xml_name_attribute(e)?,
                            roms: Vec::new(),
                        });
                    }
                    "rom" => push_xml_rom(&mut current_game, e)?,
                    _ => current_tag = tag_name,
                }
            }
            Event::Empty(ref e) => {
                if e.name().as_ref() == b"rom" {
                    push_xml_rom(&mut current_game, e)?;
                }
            }
            Event::Text(ref e) => {
                if in_header {
                    let text = e.unescape()?.to_string();
                    match current_tag.as_str() {
                        "name" => dat.name = text,
                        "description" => dat.description = text,
                        "version" => dat.version = text,
                        _ => {}
                    }
                }
            }
            Event::End(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag_name.as_str() {
                    "header" => in_header = false,
                    "game" | "machine" => {
                        if let Some(game) = current_game.take() {
                            dat.games.push(game);
                        }
                    }
                    _ => current_tag.clear(),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if dat.name.is_empty() && dat.games.is_empty() {
        return Err(DatError::invalid_dat(
            "No header or games found in XML DAT file",
        ));
    }

    Ok(dat)
}

fn xml_name_attribute(e: &BytesStart<'_>) -> Result<String, DatError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"name" {
            return Ok(attr.unescape_value()?.to_string());
        }
    }
    Ok(String::new())
}

fn push_xml_rom(game: &mut Option<DatGame>, e: &BytesStart<'_>) -> Result<(), DatError> {
    if let Some(game) = game {
        let rom = parse_xml_rom_attributes(e)?;
        game.roms.push(rom);
    }
    Ok(())
}

fn parse_xml_rom_attributes(e: &BytesStart<'_>) -> Result<DatRom, DatError> {
    let mut rom = DatRom::default();

    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.to_string();
        match attr.key.as_ref() {
            b"name" => rom.name = value,
            b"size" => {
                rom.size = value
                    .trim()
                    .parse()
                    .map_err(|_| DatError::invalid_dat(format!("Invalid ROM size: {value}")))?;
            }
            b"crc" => rom.crc = Some(normalize_hex(&value)),
            b"md5" => rom.md5 = Some(normalize_hex(&value)),
            b"sha1" => rom.sha1 = Some(normalize_hex(&value)),
            b"status" => rom.status = Some(value),
            _ => {}
        }
    }

    Ok(rom)
}

// ---------------------------------------------------------------------------
// ClrMamePro DAT parser
// ---------------------------------------------------------------------------

/// Parse a ClrMamePro format DAT file.
///
/// Format:
/// ```text
/// clrmamepro (
///     name "System Name"
///     version 20240101-000000
/// )
///
/// game (
///     name "Game Name (Region)"
///     rom ( name "Game Name (Region).ext" size 12345 crc AABBCCDD md5 ... )
/// )
/// ```
fn parse_clrmamepro<R: BufRead>(reader: R) -> Result<DatFile, DatError> {
    let mut dat = DatFile::default();

    let mut in_block: Option<String> = None; // "clrmamepro" or "game"
    let mut current_game: Option<DatGame> = None;

    for line_result in reader.lines() {
        let line = line_result?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let Some(block_type) = in_block.as_deref() else {
            if let Some(block_type) = detect_block_start(trimmed) {
                if matches!(block_type.as_str(), "game" | "machine") {
                    current_game = Some(DatGame::default());
                }
                in_block = Some(block_type);
            }
            continue;
        };

        if trimmed == ")" {
            if let Some(game) = current_game.take() {
                dat.games.push(game);
            }
            in_block = None;
            continue;
        }

        let Some((key, value)) = parse_kv(trimmed) else {
            continue;
        };
        match block_type {
            "clrmamepro" => match key.as_str() {
                "name" => dat.name = value,
                "description" => dat.description = value,
                "version" => dat.version = value,
                _ => {}
            },
            "game" | "machine" => {
                if let Some(ref mut game) = current_game {
                    match key.as_str() {
                        "name" => game.name = value,
                        "rom" => {
                            if let Some(rom) = parse_clr_rom_inline(&value)? {
                                game.roms.push(rom);
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if dat.name.is_empty() && dat.games.is_empty() {
        return Err(DatError::invalid_dat(
            "No header or games found in ClrMamePro DAT file",
        ));
    }

    Ok(dat)
}

/// Detect a block start like `clrmamepro (` or `game (`.
fn detect_block_start(line: &str) -> Option<String> {
    let stripped = line.trim_end().strip_suffix('(')?;
    let block_type = stripped.trim();
    if !block_type.is_empty() && block_type.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Some(block_type.to_lowercase());
    }
    None
}

/// Parse a key-value line like `name "Some Value"` or `version 20240101`.
/// For `rom ( ... )` lines, the value is the content inside outer parens.
fn parse_kv(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix("rom") {
        let rest = rest.trim();
        if let Some(inner) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            return Some(("rom".to_string(), inner.trim().to_string()));
        }
    }

    let mut parts = trimmed.splitn(2, |c: char| c.is_ascii_whitespace());
    let key = parts.next()?.trim().to_string();
    let raw_value = parts.next()?.trim();

    let value = raw_value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw_value)
        .to_string();

    Some((key, value))
}

/// Parse an inline ROM entry like:
/// `name "Game (Region).ext" size 12345 crc AABBCCDD md5 ... sha1 ...`
///
/// Returns `Ok(None)` for entries without a name.
fn parse_clr_rom_inline(inner: &str) -> Result<Option<DatRom>, DatError> {
    let tokens = tokenize_rom_line(inner);
    let mut rom = DatRom::default();

    let mut pairs = tokens.iter();
    while let Some(key) = pairs.next() {
        let Some(value) = pairs.next() else {
            break;
        };
        match key.as_str() {
            "name" => rom.name = value.clone(),
            "size" => {
                rom.size = value
                    .parse()
                    .map_err(|_| DatError::invalid_dat(format!("Invalid ROM size: {value}")))?;
            }
            "crc" => rom.crc = Some(normalize_hex(value)),
            "md5" => rom.md5 = Some(normalize_hex(value)),
            "sha1" => rom.sha1 = Some(normalize_hex(value)),
            // ClrMamePro spells dump status as `flags`
            "status" | "flags" => rom.status = Some(value.clone()),
            _ => {}
        }
    }

    if rom.name.is_empty() {
        return Ok(None);
    }
    Ok(Some(rom))
}

/// Tokenize a ROM line, respecting quoted strings.
/// `name "Game (Region).ext" size 12345 crc AB` → ["name", "Game (Region).ext", "size", "12345", "crc", "AB"]
fn tokenize_rom_line(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            chars.next();
        }

        if chars.peek().is_none() {
            break;
        }

        let mut token = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                token.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_ascii_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    tokens
}

#[cfg(test)]
#[path = "tests/dat_tests.rs"]
mod tests;
