use folder_archaeologist::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Terminal progress reporter using indicatif spinners on stderr.
///
/// - Scan phase: spinner with a running file count
/// - Archive phase: spinner while the external archiver runs
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);
        pb.set_style(style);
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &str) {
        self.start_spinner(format!("Scanning {}...", root));
    }

    fn on_scan_progress(&self, files_found: usize, _current_path: &str) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("Scanning... {} files found", files_found));
        }
    }

    fn on_scan_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_archive_start(&self, file_count: usize, archive_path: &str) {
        self.start_spinner(format!("Archiving {} files into {}...", file_count, archive_path));
    }

    fn on_archive_complete(&self, succeeded: bool, duration_secs: f64) {
        self.finish_bar();
        if succeeded {
            eprintln!("  \x1b[32m✓\x1b[0m Archive complete in {:.2}s", duration_secs);
        } else {
            eprintln!("  \x1b[31m✗\x1b[0m Archive failed after {:.2}s", duration_secs);
        }
    }
}
