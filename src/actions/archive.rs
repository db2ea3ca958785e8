use super::relocate::unique_destination;
use crate::platform::{self, ProcessOutcome};
use crate::progress::ProgressReporter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

pub const ARCHIVE_EXTENSION: &str = "zip";

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("no archive name given")]
    NoName,

    #[error("none of the selected files exist any more")]
    NothingToArchive,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("archiver {0}")]
    Tool(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub archive: PathBuf,
    pub archived: Vec<PathBuf>,
    /// Selected files that had vanished before archiving started.
    pub missing: Vec<PathBuf>,
}

/// Trim the user's name and make sure it ends in `.zip`.
pub fn normalize_archive_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let suffix = format!(".{}", ARCHIVE_EXTENSION);
    if name.to_lowercase().ends_with(&suffix) {
        Some(name.to_string())
    } else {
        Some(format!("{}{}", name, suffix))
    }
}

/// Where an archive called `name` is written. Relative names land in
/// `archive_dir`; an existing file is never reused.
pub fn resolve_archive_path(name: &str, archive_dir: &Path) -> io::Result<PathBuf> {
    let requested = Path::new(name);
    let requested = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        archive_dir.join(requested)
    };

    let parent = requested
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| archive_dir.to_path_buf());
    let file_name = requested
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "archive name has no file name"))?;

    fs::create_dir_all(&parent)?;
    Ok(unique_destination(&parent, file_name))
}

/// Bundle every still-existing path into one zip container through the
/// platform archiver. The reporter only drives a cosmetic indicator.
pub fn create_archive(
    paths: &[PathBuf],
    name: &str,
    archive_dir: &Path,
    timeout: Duration,
    reporter: &dyn ProgressReporter,
) -> Result<ArchiveSummary, ArchiveError> {
    let name = normalize_archive_name(name).ok_or(ArchiveError::NoName)?;

    let (archived, missing): (Vec<PathBuf>, Vec<PathBuf>) =
        paths.iter().cloned().partition(|p| p.exists());
    for path in &missing {
        warn!("File '{}' no longer exists, leaving it out of the archive", path.display());
    }
    if archived.is_empty() {
        return Err(ArchiveError::NothingToArchive);
    }

    let archive = resolve_archive_path(&name, archive_dir)?;

    let start = Instant::now();
    reporter.on_archive_start(archived.len(), &archive.to_string_lossy());
    let outcome = platform::run_with_timeout(platform::archive_command(&archived, &archive), timeout);
    let succeeded = outcome.is_success() && archive.is_file();
    reporter.on_archive_complete(succeeded, start.elapsed().as_secs_f64());

    match outcome {
        ProcessOutcome::Success if succeeded => {
            info!("Archived {} files to {}", archived.len(), archive.display());
            Ok(ArchiveSummary {
                archive,
                archived,
                missing,
            })
        }
        ProcessOutcome::Success => Err(ArchiveError::Tool(format!(
            "reported success but {} was not created",
            archive.display()
        ))),
        other => {
            // Don't leave a half-written container behind.
            if archive.is_file() {
                let _ = fs::remove_file(&archive);
            }
            Err(ArchiveError::Tool(other.describe()))
        }
    }
}
