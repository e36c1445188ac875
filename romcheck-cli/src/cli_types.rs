//! CLI type definitions.

use std::path::PathBuf;

use clap::Parser;

use romcheck_lib::HashAlgorithm;

#[derive(Parser, Debug)]
#[command(name = "romcheck", version)]
#[command(about = "Verify ROM files against a DAT catalog", long_about = None)]
pub(crate) struct Cli {
    /// DAT file (Logiqx XML or ClrMamePro) listing the known-good ROMs
    pub datfile: PathBuf,

    /// Folder holding the ROM files to check (subfolders are not searched)
    pub romfolder: PathBuf,

    /// Automatically rename files with matching hash
    #[arg(long, conflicts_with = "collection")]
    pub rename: bool,

    /// Show how much of the listed games you have
    #[arg(long)]
    pub collection: bool,

    /// Digest used to match files: md5, sha1 or crc32 (default: md5)
    #[arg(long, value_name = "ALGORITHM")]
    pub hash: Option<HashAlgorithm>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long)]
    pub logfile: Option<PathBuf>,
}
