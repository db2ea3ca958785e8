use crate::error::Error;
use crate::model::FileRecord;
use crate::progress::ProgressReporter;
use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, warn};
use walkdir::WalkDir;

const PROGRESS_EVERY: usize = 250;

/// Every regular file reachable from `root` at the moment of the scan.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub root: PathBuf,
    pub records: Vec<FileRecord>,
    /// Entries that could not be read (permission denied, vanished, ...).
    pub skipped_entries: usize,
    pub taken_at: SystemTime,
    pub duration: Duration,
}

impl Snapshot {
    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.size_bytes).sum()
    }
}

/// Recursive, read-only traversal. Entries come out in a stable order (sorted
/// by file name within each directory) so repeated scans of an unchanged tree
/// produce identical snapshots. Symbolic links are not followed.
pub fn scan_directory(
    root: &Path,
    ignore_globs: &[String],
    reporter: &dyn ProgressReporter,
) -> Result<Snapshot, Error> {
    if !root.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", root.display()),
        )));
    }

    let ignore_patterns = ignore_globs
        .iter()
        .map(|glob| Pattern::new(glob))
        .collect::<Result<Vec<_>, _>>()?;

    let start = Instant::now();
    let taken_at = SystemTime::now();
    reporter.on_scan_start(&root.to_string_lossy());

    let mut records = Vec::new();
    let mut skipped_entries = 0usize;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry.path(), &ignore_patterns));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                skipped_entries += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(
                    "Error getting metadata for {}: {}",
                    entry.path().display(),
                    err
                );
                skipped_entries += 1;
                continue;
            }
        };

        // Platforms without mtime support get an age of zero.
        let modified_at = metadata.modified().unwrap_or(taken_at);
        records.push(FileRecord::new(
            entry.path().to_path_buf(),
            metadata.len(),
            modified_at,
        ));

        if records.len() % PROGRESS_EVERY == 0 {
            reporter.on_scan_progress(records.len(), &entry.path().to_string_lossy());
        }
    }

    let duration = start.elapsed();
    reporter.on_scan_complete(records.len(), duration.as_secs_f64());
    debug!(
        "Scanned {} in {:.2}s: {} files, {} skipped",
        root.display(),
        duration.as_secs_f64(),
        records.len(),
        skipped_entries
    );

    Ok(Snapshot {
        root: root.to_path_buf(),
        records,
        skipped_entries,
        taken_at,
        duration,
    })
}

fn is_ignored(path: &Path, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|pattern| {
        pattern.matches_path(path)
            || path
                .file_name()
                .map(|name| pattern.matches(&name.to_string_lossy()))
                .unwrap_or(false)
    })
}
