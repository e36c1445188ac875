//! Spinner shown while a folder is being hashed.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use romcheck_lib::ScanProgress;

pub(crate) struct ScanSpinner {
    bar: ProgressBar,
}

impl ScanSpinner {
    /// Create a spinner. Hidden when `hidden` is true, e.g. in quiet or
    /// verbose mode where it would fight with log output.
    pub(crate) fn new(hidden: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        if hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("/-\\|");
        bar.set_style(style);
        Self { bar }
    }

    /// Progress callback for the scanner and auditor.
    pub(crate) fn update(&self, progress: ScanProgress) {
        match progress {
            ScanProgress::Listing { total } => {
                self.bar.enable_steady_tick(Duration::from_millis(100));
                self.bar.set_message(format!("Found {total} entries"));
            }
            ScanProgress::Hashing {
                file_name,
                index,
                total,
            } => {
                self.bar
                    .set_message(format!("[{}/{}] Hashing {}", index + 1, total, file_name));
            }
            ScanProgress::Done => self.finish(),
        }
    }

    pub(crate) fn finish(&self) {
        self.bar.disable_steady_tick();
        self.bar.finish_and_clear();
    }
}
