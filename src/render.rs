/// Presentation layer. Everything user-facing is written through here so the
/// workflow stays about state, not formatting.
use crate::actions::{ActionReport, DetailsLookup, FileDetails, Outcome};
use crate::model::SelectionSet;
use crate::selector::Menu;
use colored::*;
use console::Term;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const DEFAULT_WIDTH: usize = 100;
const SECS_PER_DAY: u64 = 24 * 3600;

/// "N years, M days", counting 365-day years.
pub fn format_age(age: Duration) -> String {
    let days = age.as_secs() / SECS_PER_DAY;
    format!("{} years, {} days", days / 365, days % 365)
}

/// Shorten `path` to `max_length` characters by eliding its middle.
pub fn compress_file_path(path: &str, max_length: usize) -> String {
    let len = path.chars().count();

    if len <= max_length || max_length < 5 {
        return path.to_string();
    }

    let start_len = (max_length - 3) / 2;
    let end_len = max_length - start_len - 3;

    let start: String = path.chars().take(start_len).collect();
    let end: String = path.chars().skip(len - end_len).collect();
    format!("{}...{}", start, end)
}

fn terminal_width() -> usize {
    match Term::stdout().size_checked() {
        Some((_, cols)) if cols > 20 => cols as usize,
        _ => DEFAULT_WIDTH,
    }
}

fn display_path(path: &Path) -> String {
    compress_file_path(&path.display().to_string(), terminal_width().saturating_sub(8))
}

fn rule<W: Write + ?Sized>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", format!("=== {} ===", title).bold().cyan())
}

pub fn banner<W: Write + ?Sized>(out: &mut W, root: &Path) -> io::Result<()> {
    writeln!(out, "{}", "Folder Archaeologist".bold().yellow())?;
    writeln!(out, "Categorize, explore and manage the files under a directory.")?;
    writeln!(out, "Excavation site: {}", root.display().to_string().green())
}

pub fn scan_summary<W: Write + ?Sized>(
    out: &mut W,
    files: usize,
    bytes: u64,
    skipped: usize,
) -> io::Result<()> {
    write!(
        out,
        "Found {} files ({})",
        files.to_string().cyan(),
        indicatif::HumanBytes(bytes)
    )?;
    if skipped > 0 {
        write!(out, ", {} unreadable entries skipped", skipped.to_string().yellow())?;
    }
    writeln!(out)
}

pub fn category_menu<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    rule(out, "File Categories")?;
    writeln!(out, "1. By Extension (file types)")?;
    writeln!(out, "2. By Size (large files)")?;
    writeln!(out, "3. By Age (old files)")?;
    writeln!(out, "4. By Similar Names")?;
    writeln!(out, "5. Browse old files one at a time")?;
    writeln!(out, "6. Browse large files one at a time")?;
    writeln!(out, "0. Exit")
}

#[derive(Debug, Clone, Tabled)]
struct MenuRow {
    #[tabled(rename = "No.")]
    number: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Details")]
    detail: String,
}

pub fn menu<W: Write + ?Sized>(out: &mut W, menu: &Menu) -> io::Result<()> {
    rule(out, &menu.title)?;
    let name_width = terminal_width() / 2;
    let rows = menu.entries.iter().enumerate().map(|(idx, entry)| MenuRow {
        number: idx + 1,
        name: compress_file_path(&entry.label, name_width),
        detail: entry.detail.clone(),
    });
    writeln!(out, "{}", Table::new(rows).with(Style::psql()))
}

pub fn numbered_paths<W: Write + ?Sized>(out: &mut W, paths: &[PathBuf]) -> io::Result<()> {
    for (idx, path) in paths.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        writeln!(out, "{:>3}. {}", idx + 1, name)?;
    }
    Ok(())
}

pub fn action_menu<W: Write + ?Sized>(out: &mut W, selection: &SelectionSet) -> io::Result<()> {
    rule(out, &format!("FILE OPERATIONS MENU ({} files)", selection.len()))?;
    writeln!(out, "Current files:")?;
    numbered_paths(out, selection.current())?;
    writeln!(out)?;
    writeln!(out, "[A] Select Files   - choose specific files to work with")?;
    writeln!(out, "[B] Delete Files   - delete all current files")?;
    writeln!(out, "[C] Open Files     - open all current files")?;
    writeln!(out, "[D] Move Files     - move all current files to a folder")?;
    writeln!(out, "[E] Archive Files  - create a zip archive of current files")?;
    writeln!(out, "[F] Get Details    - show detailed info of current files")?;
    writeln!(out, "[G] Go Back        - return to the original file list")?;
    writeln!(out, "[H] Exit           - exit the program")?;
    writeln!(out, "[I] New Category   - pick another category")
}

pub fn report<W: Write + ?Sized>(
    out: &mut W,
    title: &str,
    report: &ActionReport,
) -> io::Result<()> {
    for entry in &report.outcomes {
        let path = display_path(&entry.path);
        match &entry.outcome {
            Outcome::Done(how) => writeln!(out, "  {} {}: {}", "✓".green(), path, how)?,
            Outcome::Missing => writeln!(out, "  {} {}: not found", "?".yellow(), path)?,
            Outcome::Skipped => writeln!(out, "  {} {}: skipped", "-".dimmed(), path)?,
            Outcome::Failed(reason) => writeln!(out, "  {} {}: {}", "✗".red(), path, reason)?,
        }
    }
    writeln!(
        out,
        "{}: {} done, {} failed, {} not found, {} skipped",
        title.bold(),
        report.succeeded().to_string().green(),
        report.failed().to_string().red(),
        report.missing().to_string().yellow(),
        report.skipped()
    )
}

pub fn details<W: Write + ?Sized>(out: &mut W, lookup: &DetailsLookup) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(50))?;
    match lookup {
        DetailsLookup::Found(details) => found_details(out, details),
        DetailsLookup::NotFound(path) => {
            writeln!(out, "File not found: {}", display_path(path).yellow())
        }
        DetailsLookup::Failed(path, reason) => {
            writeln!(out, "Could not read {}: {}", display_path(path), reason.red())
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct DetailRow {
    #[tabled(rename = "Property")]
    property: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn found_details<W: Write + ?Sized>(out: &mut W, details: &FileDetails) -> io::Result<()> {
    let timestamp = |t: &Option<chrono::DateTime<chrono::Local>>| {
        t.as_ref()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unavailable".to_string())
    };
    let row = |property, value| DetailRow { property, value };

    let mut rows = vec![
        row("File", display_path(&details.path)),
        row("Size", details.human_size()),
        row("Created", timestamp(&details.created)),
        row("Modified", timestamp(&details.modified)),
        row("File extension", details.extension.clone()),
    ];
    if let Some(mime) = &details.mime_type {
        rows.push(row("MIME type", mime.to_string()));
    }
    writeln!(out, "{}", Table::new(rows).with(Style::psql()))
}

pub fn browse_options<W: Write + ?Sized>(out: &mut W, path: &Path) -> io::Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    writeln!(out)?;
    writeln!(out, "{}", format!("Options for {}:", name).bold().magenta())?;
    writeln!(out, "{} Read", "a".cyan())?;
    writeln!(out, "{} Delete", "b".cyan())?;
    writeln!(out, "{} Archive", "c".cyan())?;
    writeln!(out, "{} Ignore and go back to the list", "d".cyan())
}

pub fn preview<W: Write + ?Sized>(out: &mut W, content: &str) -> io::Result<()> {
    writeln!(out, "{}", "---- File content start ----".green())?;
    writeln!(out, "{}", content)?;
    writeln!(out, "{}", "---- File content end ----".green())
}

pub fn farewell<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "Goodbye!".bold())
}

pub fn notice<W: Write + ?Sized>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.yellow())
}

pub fn error<W: Write + ?Sized>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.red())
}
