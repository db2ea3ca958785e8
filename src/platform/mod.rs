/// Platform-specific commands for the default-application launcher and the
/// archiver, plus the bounded process runner they go through.
pub mod process;

pub use process::{launch_detached, run_with_timeout, ProcessOutcome, LAUNCH_GRACE};

use std::path::{Path, PathBuf};
use std::process::Command;

/// Command that opens `path` with the desktop's default application.
pub fn open_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.arg("/C").arg("start").arg("").arg(path);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Command that writes `files` into a new zip container at `archive`.
pub fn archive_command(files: &[PathBuf], archive: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let sources = files
            .iter()
            .map(|f| powershell_quote(&f.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(",");
        let script = format!(
            "Compress-Archive -LiteralPath {} -DestinationPath {}",
            sources,
            powershell_quote(&archive.to_string_lossy())
        );
        let mut command = Command::new("powershell");
        command.arg("-NoProfile").arg("-NonInteractive").arg("-Command").arg(script);
        command
    } else {
        let mut command = Command::new("zip");
        command.arg("-q").arg(archive).args(files);
        command
    }
}

fn powershell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
