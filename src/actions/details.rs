use crate::model::normalize_extension;
use chrono::{DateTime, Local};
use indicatif::HumanBytes;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// How much of a file the browse "read" action shows.
pub const PREVIEW_CHARS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Not every filesystem records a birth time.
    pub created: Option<DateTime<Local>>,
    pub modified: Option<DateTime<Local>>,
    pub extension: String,
    /// Best-effort guess from the extension.
    pub mime_type: Option<String>,
}

impl FileDetails {
    pub fn human_size(&self) -> String {
        HumanBytes(self.size_bytes).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsLookup {
    Found(FileDetails),
    NotFound(PathBuf),
    Failed(PathBuf, String),
}

/// Read-only metadata lookup. A file that vanished after the scan is
/// `NotFound`, not an error.
pub fn file_details(path: &Path) -> DetailsLookup {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return DetailsLookup::NotFound(path.to_path_buf())
        }
        Err(e) => return DetailsLookup::Failed(path.to_path_buf(), e.to_string()),
    };

    DetailsLookup::Found(FileDetails {
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
        created: metadata.created().ok().map(DateTime::<Local>::from),
        modified: metadata.modified().ok().map(DateTime::<Local>::from),
        extension: normalize_extension(path),
        mime_type: mime_guess::from_path(path)
            .first_raw()
            .map(|m| m.to_string()),
    })
}

/// First `max_chars` characters of the file, invalid UTF-8 replaced.
pub fn preview_text(path: &Path, max_chars: usize) -> io::Result<String> {
    let mut buffer = Vec::new();
    fs::File::open(path)?
        .take((max_chars as u64).saturating_mul(4))
        .read_to_end(&mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).chars().take(max_chars).collect())
}
