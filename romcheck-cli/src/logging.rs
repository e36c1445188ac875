//! Logger setup.
//!
//! All user-facing output goes through the `log` macros so that `--quiet`,
//! `--verbose` and `--logfile` apply uniformly. Records are written to stdout
//! and, when a log file is given, copied into it with ANSI escapes stripped.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::error::CliError;

/// Environment variable that overrides the level picked from the flags.
const LOG_ENV: &str = "ROMCHECK_LOG";

/// Writes to stdout and, optionally, to a file without color codes.
struct Tee<W: Write> {
    file: Option<W>,
}

impl<W: Write> Write for Tee<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().lock().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

pub(crate) fn level_filter(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. Must be called once, before any output.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let file = match logfile {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::logging(format!("cannot create {}: {e}", path.display()))
            })?;
            Some(strip_ansi_escapes::Writer::new(file))
        }
        None => None,
    };

    let mut builder = Builder::new();
    builder
        .filter_level(level_filter(quiet, verbose))
        .parse_env(env_logger::Env::new().filter(LOG_ENV))
        .target(Target::Pipe(Box::new(Tee { file })))
        .format(move |buf, record| {
            if verbose {
                return writeln!(
                    buf,
                    "[{} {:<5} {}] {}",
                    buf.timestamp(),
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
            writeln!(buf, "{}", record.args())
        });

    builder
        .try_init()
        .map_err(|e| CliError::logging(e.to_string()))
}
