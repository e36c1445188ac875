//! romcheck CLI
//!
//! Verifies a folder of ROM files against a DAT catalog: reports which files
//! are known-good, misnamed or unknown, optionally renames misnamed files, and
//! can audit how much of the catalog is present.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_lib::{CheckOptions, Settings, load_catalog};

use cli_types::Cli;
use commands::check::run_check;
use commands::collection::run_collection;
use error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{} {e}", "error:".if_supports_color(Stdout, |t| t.red()));
            if let Some(hint) = failure_hint(&e) {
                log::error!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let options = resolve_options(cli, &Settings::load());
    log::debug!("Check options: {options:?}");

    let catalog = load_catalog(&cli.datfile, options.algorithm)?;
    if !catalog.dat.name.is_empty() {
        log::info!(
            "{}",
            catalog.dat.name.if_supports_color(Stdout, |t| t.bold())
        );
    }

    let hide_spinner = cli.quiet || cli.verbose;
    if cli.collection {
        run_collection(&catalog, &cli.romfolder, hide_spinner)?;
    } else {
        run_check(&catalog, &cli.romfolder, &options, hide_spinner)?;
    }
    Ok(())
}

/// Extra context for errors that stopped a run over a single file.
fn failure_hint(e: &CliError) -> Option<&'static str> {
    match e {
        CliError::Check(check) if !check.is_fatal() => {
            Some("The collection audit needs every file to be readable; no report was produced.")
        }
        _ => None,
    }
}

/// Settings file values, overridden by any flag given on the command line.
fn resolve_options(cli: &Cli, settings: &Settings) -> CheckOptions {
    let mut options = settings.check_options();
    if cli.rename {
        options = options.with_rename(true);
    }
    if cli.collection {
        options = options.with_rename(false);
    }
    if let Some(algorithm) = cli.hash {
        options = options.with_algorithm(algorithm);
    }
    options
}
