use super::{ActionReport, Outcome};
use crate::platform::{self, ProcessOutcome};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::warn;

/// Hand each path to the default-application launcher. Failures are
/// reported, never retried. A launcher that stays in the foreground is left
/// running; it only has until `timeout` (at most [`platform::LAUNCH_GRACE`])
/// to report a failure.
pub fn open_files(paths: &[PathBuf], timeout: Duration) -> ActionReport {
    open_files_with(paths, timeout.min(platform::LAUNCH_GRACE), platform::open_command)
}

/// [`open_files`] with the launcher command supplied by the caller.
pub fn open_files_with<F>(paths: &[PathBuf], grace: Duration, launcher: F) -> ActionReport
where
    F: Fn(&Path) -> Command,
{
    let mut report = ActionReport::default();

    for path in paths {
        if !path.exists() {
            warn!("File '{}' no longer exists, not opening", path.display());
            report.record(path, Outcome::Missing);
            continue;
        }

        match platform::launch_detached(launcher(path), grace) {
            ProcessOutcome::Success | ProcessOutcome::Running => {
                report.record(path, Outcome::Done("opened".to_string()))
            }
            other => report.record(path, Outcome::Failed(format!("launcher {}", other.describe()))),
        }
    }

    report
}
