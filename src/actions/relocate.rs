use super::{ActionReport, Outcome};
use crate::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const MAX_NAME_ATTEMPTS: usize = 16;

/// Where a moved file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSummary {
    pub report: ActionReport,
    pub relocations: Vec<Relocation>,
}

/// First free name for `file_name` in `dir`: the name itself, then
/// `stem(1).ext`, `stem(2).ext`, ... Numbers already taken are skipped.
pub fn unique_destination(dir: &Path, file_name: &OsStr) -> PathBuf {
    let initial_dest = dir.join(file_name);
    if !occupied(&initial_dest) {
        return initial_dest;
    }

    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = Path::new(file_name)
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut counter = 1u64;
    loop {
        let new_name = if ext.is_empty() {
            format!("{}({})", stem, counter)
        } else {
            format!("{}({}).{}", stem, counter, ext)
        };
        let new_dest = dir.join(new_name);
        if !occupied(&new_dest) {
            return new_dest;
        }
        counter += 1;
    }
}

// Dangling symlinks count as taken.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Move one file into `dest_dir` without overwriting anything there. If
/// another process takes the chosen name first, the next free one is tried.
pub fn move_one(src: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
    let file_name = src
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    fs::create_dir_all(dest_dir)?;

    let mut attempts = 1;
    loop {
        let dest = unique_destination(dest_dir, file_name);
        match relocate_file(src, &dest) {
            Ok(()) => return Ok(dest),
            Err(err)
                if err.kind() == io::ErrorKind::AlreadyExists && attempts < MAX_NAME_ATTEMPTS =>
            {
                debug!("{} was taken before the move, picking another name", dest.display());
                attempts += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Move every path into `dest_dir`, creating it (and its parents) first.
/// Only a destination that cannot be created fails the whole call.
pub fn move_files(paths: &[PathBuf], dest_dir: &Path) -> Result<MoveSummary, Error> {
    if !dest_dir.exists() {
        info!("Target folder '{}' doesn't exist, creating it", dest_dir.display());
    }
    fs::create_dir_all(dest_dir)?;
    let canonical_dest = fs::canonicalize(dest_dir)?;

    let mut summary = MoveSummary::default();

    for path in paths {
        if !path.exists() {
            warn!("File '{}' no longer exists, skipping", path.display());
            summary.report.record(path, Outcome::Missing);
            continue;
        }

        if already_in(path, &canonical_dest) {
            debug!("{} is already in the destination", path.display());
            summary.report.record(path, Outcome::Skipped);
            continue;
        }

        match move_one(path, dest_dir) {
            Ok(dest) => {
                debug!("moved {} -> {}", path.display(), dest.display());
                summary
                    .report
                    .record(path, Outcome::Done(format!("moved to {}", dest.display())));
                summary.relocations.push(Relocation {
                    from: path.clone(),
                    to: dest,
                });
            }
            Err(e) => {
                error!("Failed to move '{}': {}", path.display(), e);
                summary.report.record(path, Outcome::Failed(e.to_string()));
            }
        }
    }

    Ok(summary)
}

fn already_in(path: &Path, canonical_dir: &Path) -> bool {
    path.parent()
        .and_then(|parent| fs::canonicalize(parent).ok())
        .map(|parent| parent == canonical_dir)
        .unwrap_or(false)
}

/// Move `src` to `dest`. Fails with `AlreadyExists` instead of replacing
/// whatever is at `dest`.
fn relocate_file(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::hard_link(src, dest) {
        Ok(()) => {
            if let Err(err) = fs::remove_file(src) {
                let _ = fs::remove_file(dest);
                return Err(err);
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Err(err),
        Err(err) if is_cross_device_error(&err) => copy_then_remove(src, dest),
        Err(err) => {
            // No hard links on this filesystem.
            debug!("hard link to {} failed ({}), renaming", dest.display(), err);
            if occupied(dest) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} already exists", dest.display()),
                ));
            }
            match fs::rename(src, dest) {
                Ok(()) => Ok(()),
                Err(err) if is_cross_device_error(&err) => copy_then_remove(src, dest),
                Err(err) => Err(err),
            }
        }
    }
}

/// Cross-device move. `dest` is created exclusively and gets the source's
/// contents, modification time and permissions before `src` is removed.
fn copy_then_remove(src: &Path, dest: &Path) -> io::Result<()> {
    let metadata = fs::metadata(src)?;
    let mut reader = fs::File::open(src)?;
    let mut writer = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)?;

    if let Err(err) = fill_copy(&mut reader, &mut writer, &metadata) {
        drop(writer);
        let _ = fs::remove_file(dest);
        return Err(err);
    }
    fs::remove_file(src)
}

fn fill_copy(
    reader: &mut fs::File,
    writer: &mut fs::File,
    metadata: &fs::Metadata,
) -> io::Result<()> {
    io::copy(reader, writer)?;
    if let Ok(modified) = metadata.modified() {
        writer.set_modified(modified)?;
    }
    writer.set_permissions(metadata.permissions())?;
    writer.sync_all()
}

fn is_cross_device_error(err: &io::Error) -> bool {
    match err.raw_os_error() {
        Some(code) if code == 18 => true, // POSIX EXDEV
        Some(code) if code == 17 => cfg!(windows), // ERROR_NOT_SAME_DEVICE
        _ => false,
    }
}
