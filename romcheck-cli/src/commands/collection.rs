use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_lib::{Catalog, CollectionReport, FileHasher, GameOwnership, audit_collection};

use crate::error::CliError;
use crate::spinner::ScanSpinner;

/// Report which catalog games have a matching file in `folder`.
pub(crate) fn run_collection(
    catalog: &Catalog,
    folder: &Path,
    hide_spinner: bool,
) -> Result<CollectionReport, CliError> {
    log::info!(
        "Auditing {} against {} games ({})",
        folder.display().if_supports_color(Stdout, |t| t.cyan()),
        catalog.index.game_names().len(),
        catalog.algorithm,
    );
    log::info!("");

    let spinner = ScanSpinner::new(hide_spinner);
    let hasher = FileHasher::new(catalog.algorithm);
    let audited = audit_collection(folder, &catalog.index, &hasher, &|p| spinner.update(p));
    spinner.finish();
    let report = audited?;

    for game in &report.games {
        log::info!("{}", game_line(game));
        if let Some(file) = &game.matched_file {
            log::debug!("{} matched by {file}", game.name);
        }
    }
    for file in &report.extra_files {
        log::debug!("Not in catalog or duplicate: {file}");
    }

    log::info!("");
    log::info!("{}", summary_line(&report));
    Ok(report)
}

/// The status line for one game.
pub(crate) fn game_line(game: &GameOwnership) -> String {
    if game.owned {
        format!(
            "  {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            game.name.if_supports_color(Stdout, |t| t.green()),
        )
    } else {
        format!(
            "  {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            game.name.if_supports_color(Stdout, |t| t.red()),
        )
    }
}

pub(crate) fn summary_line(report: &CollectionReport) -> String {
    let percent = if report.total() == 0 {
        0.0
    } else {
        report.owned_count() as f64 * 100.0 / report.total() as f64
    };
    let mut line = format!(
        "{} of {} games owned ({:.1}%), {} missing",
        report.owned_count(),
        report.total(),
        percent,
        report.missing_count()
    );
    if !report.extra_files.is_empty() {
        line.push_str(&format!(", {} extra files", report.extra_files.len()));
    }
    line.if_supports_color(Stdout, |t| t.bold()).to_string()
}
