use super::{ActionReport, Outcome};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// A reversible removal facility (Recycle Bin, freedesktop Trash, ...).
pub trait RecycleBin {
    fn recycle(&self, path: &Path) -> Result<(), String>;
}

/// The platform trash, through the `trash` crate.
pub struct SystemTrash;

impl RecycleBin for SystemTrash {
    fn recycle(&self, path: &Path) -> Result<(), String> {
        trash::delete(path).map_err(|e| format!("trash error: {}", e))
    }
}

/// Remove every path, trash first. When trashing a file fails,
/// `allow_permanent(path, reason)` decides whether it is deleted for good.
///
/// The batch confirmation is the caller's job; this only runs once the user
/// has already agreed to delete.
pub fn delete_files<F>(paths: &[PathBuf], bin: &dyn RecycleBin, mut allow_permanent: F) -> ActionReport
where
    F: FnMut(&Path, &str) -> bool,
{
    let mut report = ActionReport::default();

    for path in paths {
        if !path.exists() {
            warn!("File '{}' no longer exists, skipping", path.display());
            report.record(path, Outcome::Missing);
            continue;
        }

        match bin.recycle(path) {
            Ok(()) => {
                debug!("trashed: {}", path.display());
                report.record(path, Outcome::Done("moved to trash".to_string()));
            }
            Err(reason) => {
                warn!("Could not trash '{}': {}", path.display(), reason);
                if !allow_permanent(path, &reason) {
                    report.record(path, Outcome::Skipped);
                    continue;
                }
                match fs::remove_file(path) {
                    Ok(()) => {
                        debug!("deleted: {}", path.display());
                        report.record(path, Outcome::Done("permanently deleted".to_string()));
                    }
                    Err(e) => {
                        error!("Failed to remove '{}': {}", path.display(), e);
                        report.record(path, Outcome::Failed(e.to_string()));
                    }
                }
            }
        }
    }

    report
}
