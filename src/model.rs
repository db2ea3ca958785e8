use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Extension key used for files that have none.
pub const NO_EXTENSION: &str = "no_extension";

/// Snapshot of one regular file, taken at scan time. The file may have been
/// removed or moved since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified_at: SystemTime,
    pub extension: String,
}

impl FileRecord {
    pub fn new(path: PathBuf, size_bytes: u64, modified_at: SystemTime) -> Self {
        let extension = normalize_extension(&path);
        Self {
            path,
            size_bytes,
            modified_at,
            extension,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name with the extension removed.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Time since last modification, relative to `now`. Modification times in
    /// the future count as zero.
    pub fn age_at(&self, now: SystemTime) -> Duration {
        now.duration_since(self.modified_at).unwrap_or(Duration::ZERO)
    }
}

/// Lower-cased extension without the leading dot, or [`NO_EXTENSION`].
pub fn normalize_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => ext.to_string_lossy().to_lowercase(),
        _ => NO_EXTENSION.to_string(),
    }
}

/// The files subsequent actions apply to. Holds paths only; entries can go
/// stale when the filesystem changes underneath.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    original: Vec<PathBuf>,
    current: Vec<PathBuf>,
}

impl SelectionSet {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            original: paths.clone(),
            current: paths,
        }
    }

    pub fn current(&self) -> &[PathBuf] {
        &self.current
    }

    pub fn original(&self) -> &[PathBuf] {
        &self.original
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Replace the current subset with a narrower one. The original list is
    /// kept for [`SelectionSet::restore`].
    pub fn narrow(&mut self, paths: Vec<PathBuf>) {
        self.current = paths;
    }

    /// Go back to the pre-narrowing list, minus anything evicted since.
    pub fn restore(&mut self) {
        self.current = self.original.clone();
    }

    /// Drop paths that no longer refer to anything the user can act on.
    pub fn evict(&mut self, paths: &[PathBuf]) {
        self.current.retain(|p| !paths.contains(p));
        self.original.retain(|p| !paths.contains(p));
    }

    /// Point an entry at the place it was moved to.
    pub fn relocate(&mut self, from: &Path, to: &Path) {
        for entry in self.current.iter_mut().chain(self.original.iter_mut()) {
            if entry == from {
                *entry = to.to_path_buf();
            }
        }
    }
}
