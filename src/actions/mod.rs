/// Operations on the current subset. Every batch action isolates per-file
/// failures: one bad file is reported and the rest still get processed.
pub mod archive;
pub mod delete;
pub mod details;
pub mod open;
pub mod relocate;
pub mod select;

pub use archive::{
    create_archive, normalize_archive_name, resolve_archive_path, ArchiveError, ArchiveSummary,
};
pub use delete::{delete_files, RecycleBin, SystemTrash};
pub use details::{file_details, preview_text, DetailsLookup, FileDetails, PREVIEW_CHARS};
pub use open::{open_files, open_files_with};
pub use relocate::{move_files, move_one, unique_destination, MoveSummary, Relocation};
pub use select::{select_by_positions, Narrowing};

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action happened; the string says how ("trashed", "moved to ...").
    Done(String),
    /// The path no longer exists.
    Missing,
    /// The user declined for this file.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Result of one batch action, one entry per input path, input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReport {
    pub outcomes: Vec<FileOutcome>,
}

impl ActionReport {
    pub fn record(&mut self, path: &Path, outcome: Outcome) {
        self.outcomes.push(FileOutcome {
            path: path.to_path_buf(),
            outcome,
        });
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Done(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Missing))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    /// Paths that are gone from their original location, whether because the
    /// action removed them or because they had already vanished.
    pub fn gone(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Done(_) | Outcome::Missing))
            .map(|o| o.path.clone())
            .collect()
    }

    /// Paths that had vanished before the action reached them.
    pub fn missing_paths(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter(|o| o.outcome == Outcome::Missing)
            .map(|o| o.path.clone())
            .collect()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = ActionReport::default();
        report.record(Path::new("/a"), Outcome::Done("trashed".to_string()));
        report.record(Path::new("/b"), Outcome::Missing);
        report.record(Path::new("/c"), Outcome::Failed("denied".to_string()));
        report.record(Path::new("/d"), Outcome::Skipped);

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.missing(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.gone(), vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(report.missing_paths(), vec![PathBuf::from("/b")]);
    }
}
