use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_lib::{
    Catalog, CheckOptions, FileHasher, ScanEntry, ScanOutcome, ScanResult, ScanSummary,
    scan_directory,
};

use crate::error::CliError;
use crate::spinner::ScanSpinner;

/// Check every file in `folder` against the catalog and print one line per
/// entry followed by a summary.
pub(crate) fn run_check(
    catalog: &Catalog,
    folder: &Path,
    options: &CheckOptions,
    hide_spinner: bool,
) -> Result<ScanSummary, CliError> {
    log::info!(
        "Checking {} ({} known digests, {})",
        folder.display().if_supports_color(Stdout, |t| t.cyan()),
        catalog.index.len(),
        catalog.algorithm,
    );
    if options.rename {
        log::info!(
            "{}",
            "Rename mode: misnamed files will be given their catalog name"
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let spinner = ScanSpinner::new(hide_spinner);
    let hasher = FileHasher::new(options.algorithm);
    let scanned = scan_directory(folder, &catalog.index, &hasher, options, &|p| {
        spinner.update(p)
    });
    spinner.finish();
    let report = scanned?;

    for entry in &report.entries {
        print_entry(entry);
    }

    log::info!("");
    print_summary(&report.summary);
    Ok(report.summary)
}

fn print_entry(entry: &ScanEntry) {
    let line = entry_line(&entry.outcome, &entry.name);
    match entry.outcome {
        ScanOutcome::Failed(_) => log::warn!("{line}"),
        _ => log::info!("{line}"),
    }
}

/// The status line for a scanned entry.
pub(crate) fn entry_line(outcome: &ScanOutcome, name: &str) -> String {
    match outcome {
        ScanOutcome::File(ScanResult::Verified { name }) => format!(
            "  {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            name.if_supports_color(Stdout, |t| t.green()),
        ),
        ScanOutcome::File(ScanResult::Renamed { from, to }) => format!(
            "  {} {} \u{2192} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            from.if_supports_color(Stdout, |t| t.dimmed()),
            to.if_supports_color(Stdout, |t| t.green()),
        ),
        ScanOutcome::File(ScanResult::Mismatched { actual, expected }) => format!(
            "  {} {} ({})",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            actual.if_supports_color(Stdout, |t| t.yellow()),
            expected,
        ),
        ScanOutcome::File(ScanResult::Unknown { name }) => format!(
            "  {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            name.if_supports_color(Stdout, |t| t.red()),
        ),
        ScanOutcome::Directory => format!(
            "  {} {}",
            "\u{25B8}".if_supports_color(Stdout, |t| t.yellow()),
            format!("{name}/").if_supports_color(Stdout, |t| t.yellow()),
        ),
        ScanOutcome::Failed(e) => format!(
            "  {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e.if_supports_color(Stdout, |t| t.red()),
        ),
    }
}

fn print_summary(summary: &ScanSummary) {
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} verified",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.verified,
    );
    if summary.renamed > 0 {
        log::info!(
            "  {} {} renamed",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.renamed,
        );
    }
    if summary.mismatched > 0 {
        log::info!(
            "  {} {} misnamed",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.mismatched,
        );
    }
    if summary.unknown > 0 {
        log::info!(
            "  {} {} unknown",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.unknown,
        );
    }
    if summary.directories > 0 {
        log::info!(
            "  {}",
            format!("{} folders not searched", summary.directories)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if summary.errors > 0 {
        log::warn!(
            "  {} {} files could not be checked",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.errors,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(outcome: ScanOutcome, name: &str) -> String {
        strip(&entry_line(&outcome, name))
    }

    fn strip(s: &str) -> String {
        String::from_utf8(strip_ansi_escapes::strip(s)).unwrap()
    }

    #[test]
    fn test_mismatched_shows_expected_name() {
        let outcome = ScanOutcome::File(ScanResult::Mismatched {
            actual: "wrong.nes".into(),
            expected: "Right (USA).nes".into(),
        });
        assert_eq!(line(outcome, "wrong.nes"), "  \u{26A0} wrong.nes (Right (USA).nes)");
    }

    #[test]
    fn test_renamed_shows_both_names() {
        let outcome = ScanOutcome::File(ScanResult::Renamed {
            from: "a.nes".into(),
            to: "b.nes".into(),
        });
        assert_eq!(line(outcome, "a.nes"), "  \u{2714} a.nes \u{2192} b.nes");
    }

    #[test]
    fn test_directory_has_trailing_slash() {
        assert_eq!(line(ScanOutcome::Directory, "extras"), "  \u{25B8} extras/");
    }

    #[test]
    fn test_unknown_and_verified() {
        let unknown = ScanOutcome::File(ScanResult::Unknown {
            name: "x.bin".into(),
        });
        let verified = ScanOutcome::File(ScanResult::Verified {
            name: "y.bin".into(),
        });
        assert_eq!(line(unknown, "x.bin"), "  \u{2718} x.bin");
        assert_eq!(line(verified, "y.bin"), "  \u{2714} y.bin");
    }

    #[test]
    fn test_failed_entry_shows_error() {
        let error = romcheck_lib::CheckError::FileRead {
            path: "roms/bad.nes".into(),
            source: std::io::Error::other("device not ready"),
        };
        let text = line(ScanOutcome::Failed(error), "bad.nes");
        assert!(text.starts_with("  \u{2718} Cannot read"));
        assert!(text.contains("device not ready"));
    }
}
