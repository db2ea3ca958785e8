/// Trait for reporting long-running work to the user.
///
/// The CLI implements it with indicatif spinners; tests use [`SilentReporter`].
/// Reporting is cosmetic and never influences results.
pub trait ProgressReporter {
    fn on_scan_start(&self, _root: &str) {}
    fn on_scan_progress(&self, _files_found: usize, _current_path: &str) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_archive_start(&self, _file_count: usize, _archive_path: &str) {}
    fn on_archive_complete(&self, _succeeded: bool, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
