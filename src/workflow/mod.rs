//! The interactive loop: scan, classify, select, act.
//!
//! ```text
//! CategorySelect --(non-empty subset)--> ActionMenu --(action)--> ActionMenu
//!       ^                                   |   |
//!       +------ new category / emptied -----+   +--exit / end of input--> Terminated
//! ```
pub mod browse;

use crate::actions::{
    self, create_archive, delete_files, file_details, move_files, move_one, open_files,
    preview_text, select_by_positions, ArchiveError, DetailsLookup, RecycleBin, PREVIEW_CHARS,
};
use crate::analysis::{
    classify, classify_by_extension, search_by_any_token, Classification, Strategy, Tokenizer,
};
use crate::config::AppConfig;
use crate::error::Error;
use crate::model::{FileRecord, SelectionSet};
use crate::progress::ProgressReporter;
use crate::prompt::{ask, prompt_confirm, Console};
use crate::render::{self, format_age};
use crate::scanner::{scan_directory, Snapshot};
use crate::selector::{Menu, MenuEntry, Selection};
use browse::{after_command, BrowseCommand, BrowseEvent, BrowseState};
use indicatif::HumanBytes;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    CategorySelect,
    ActionMenu(SelectionSet),
    Terminated,
}

/// Everything one interactive run needs, passed in rather than global.
pub struct Session<'a> {
    config: &'a AppConfig,
    root: PathBuf,
    console: &'a mut dyn Console,
    bin: &'a dyn RecycleBin,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> Session<'a> {
    pub fn new(
        config: &'a AppConfig,
        root: PathBuf,
        console: &'a mut dyn Console,
        bin: &'a dyn RecycleBin,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            config,
            root,
            console,
            bin,
            reporter,
        }
    }

    /// Drive the state machine until the user exits or input ends.
    pub fn run(&mut self) -> Result<(), Error> {
        render::banner(self.console, &self.root)?;

        let mut state = State::CategorySelect;
        loop {
            state = match state {
                State::Terminated => break,
                State::CategorySelect => self.category_select()?,
                State::ActionMenu(selection) => self.action_menu(selection)?,
            };
        }

        render::farewell(self.console)?;
        Ok(())
    }

    /// One visit to the category menu. The tree is rescanned every time so
    /// files removed or moved by earlier actions don't come back.
    pub fn category_select(&mut self) -> Result<State, Error> {
        let snapshot = scan_directory(&self.root, &self.config.ignore_patterns, self.reporter)?;
        render::scan_summary(
            self.console,
            snapshot.records.len(),
            snapshot.total_bytes(),
            snapshot.skipped_entries,
        )?;

        loop {
            render::category_menu(self.console)?;
            let Some(choice) = ask(self.console, "Select a category number: ")? else {
                debug!("end of input at category menu");
                return Ok(State::Terminated);
            };

            match choice.as_str() {
                "0" => return Ok(State::Terminated),
                "1" => return self.pick_group(Strategy::Extension, &snapshot),
                "2" => return self.pick_group(Strategy::Size, &snapshot),
                "3" => return self.pick_group(Strategy::Age, &snapshot),
                "4" => return self.pick_by_name(&snapshot),
                "5" => return self.browse(Strategy::Age, &snapshot),
                "6" => return self.browse(Strategy::Size, &snapshot),
                _ => render::error(self.console, "Invalid choice, pick 0-6")?,
            }
        }
    }

    fn pick_group(&mut self, strategy: Strategy, snapshot: &Snapshot) -> Result<State, Error> {
        let classification = classify(strategy, &snapshot.records, self.config, snapshot.taken_at)?;
        if classification.is_empty() {
            render::notice(self.console, "No files found for this category.")?;
            return Ok(State::CategorySelect);
        }
        let menu =
            Menu::from_classification(&classification, self.config.top_n, self.config.outlier_pick);
        self.choose(&menu)
    }

    fn pick_by_name(&mut self, snapshot: &Snapshot) -> Result<State, Error> {
        if !prompt_confirm(self.console, "Search for a specific token?", Some(false))? {
            return self.pick_group(Strategy::Name, snapshot);
        }

        let Some(token) = ask(self.console, "Enter the token: ")? else {
            return Ok(State::Terminated);
        };
        let tokenizer = Tokenizer::new(&self.config.name_delimiters)?;
        let found = search_by_any_token(&snapshot.records, &tokenizer, &token);
        if found.is_empty() {
            render::notice(self.console, &format!("No files contain the token '{}'.", token))?;
            return Ok(State::CategorySelect);
        }
        let menu = Menu::from_records(&format!("Files with token '{}'", token), &found);
        self.choose(&menu)
    }

    fn choose(&mut self, menu: &Menu) -> Result<State, Error> {
        render::menu(self.console, menu)?;
        let Some(answer) = ask(self.console, "Select a number (0 to cancel): ")? else {
            return Ok(State::Terminated);
        };

        match menu.resolve(&answer) {
            Selection::Cancelled => Ok(State::CategorySelect),
            Selection::Invalid(message) => {
                render::error(self.console, &message)?;
                Ok(State::CategorySelect)
            }
            Selection::Files(files) if files.is_empty() => Ok(State::CategorySelect),
            Selection::Files(files) => Ok(State::ActionMenu(SelectionSet::new(files))),
        }
    }

    /// Show the action menu once and apply one action.
    pub fn action_menu(&mut self, mut selection: SelectionSet) -> Result<State, Error> {
        if selection.is_empty() {
            render::notice(self.console, "No files left in this selection.")?;
            return Ok(State::CategorySelect);
        }

        render::action_menu(self.console, &selection)?;
        let Some(choice) = ask(self.console, "Choose an action: ")? else {
            return Ok(State::Terminated);
        };

        let flow = match choice.to_uppercase().as_str() {
            "A" => self.select(&mut selection)?,
            "B" => self.delete(&mut selection)?,
            "C" => self.open(&mut selection)?,
            "D" => self.relocate(&mut selection)?,
            "E" => self.archive(&mut selection)?,
            "F" => self.details(&mut selection)?,
            "G" => {
                selection.restore();
                render::notice(
                    self.console,
                    &format!("Back to the original list of {} files.", selection.len()),
                )?;
                Flow::Stay
            }
            "H" => return Ok(State::Terminated),
            "I" => return Ok(State::CategorySelect),
            _ => {
                render::error(self.console, "Invalid option, pick A-I")?;
                Flow::Stay
            }
        };

        Ok(match flow {
            Flow::Stay => State::ActionMenu(selection),
            Flow::Quit => State::Terminated,
        })
    }

    fn select(&mut self, selection: &mut SelectionSet) -> Result<Flow, Error> {
        let Some(input) = ask(
            self.console,
            "Enter file numbers separated by spaces (e.g., 1 3 5): ",
        )?
        else {
            return Ok(Flow::Quit);
        };

        let narrowing = select_by_positions(selection.current(), &input);
        for token in &narrowing.rejected {
            render::error(self.console, &format!("Invalid selection: {}", token))?;
        }
        if narrowing.selected.is_empty() {
            render::notice(self.console, "No valid files selected, keeping the current list.")?;
        } else {
            selection.narrow(narrowing.selected);
        }
        Ok(Flow::Stay)
    }

    fn delete(&mut self, selection: &mut SelectionSet) -> Result<Flow, Error> {
        let question = format!("Delete {} files?", selection.len());
        if !prompt_confirm(self.console, &question, Some(false))? {
            render::notice(self.console, "Deletion cancelled.")?;
            return Ok(Flow::Stay);
        }

        let report = delete_paths(self.console, self.bin, selection.current());
        render::report(self.console, "Delete", &report)?;
        selection.evict(&report.gone());
        Ok(Flow::Stay)
    }

    fn open(&mut self, selection: &mut SelectionSet) -> Result<Flow, Error> {
        let report = open_files(selection.current(), self.config.process_timeout());
        render::report(self.console, "Open", &report)?;
        selection.evict(&report.missing_paths());
        Ok(Flow::Stay)
    }

    fn relocate(&mut self, selection: &mut SelectionSet) -> Result<Flow, Error> {
        let Some(target) = ask(self.console, "Enter the destination folder: ")? else {
            return Ok(Flow::Quit);
        };
        if target.is_empty() {
            render::notice(self.console, "Move cancelled.")?;
            return Ok(Flow::Stay);
        }

        let dest = expand_home(&target);
        match move_files(selection.current(), &dest) {
            Ok(summary) => {
                render::report(self.console, "Move", &summary.report)?;
                for relocation in &summary.relocations {
                    selection.relocate(&relocation.from, &relocation.to);
                }
                selection.evict(&summary.report.missing_paths());
            }
            Err(e) => {
                render::error(
                    self.console,
                    &format!("Cannot use {} as destination: {}", dest.display(), e),
                )?;
            }
        }
        Ok(Flow::Stay)
    }

    fn archive(&mut self, selection: &mut SelectionSet) -> Result<Flow, Error> {
        let Some(name) = ask(self.console, "Enter archive name: ")? else {
            return Ok(Flow::Quit);
        };

        let result = create_archive(
            selection.current(),
            &name,
            &self.config.archive_dir(),
            self.config.process_timeout(),
            self.reporter,
        );
        match result {
            Ok(summary) => {
                info!("archive written to {}", summary.archive.display());
                render::notice(
                    self.console,
                    &format!(
                        "Archived {} files to {}",
                        summary.archived.len(),
                        summary.archive.display()
                    ),
                )?;
                selection.evict(&summary.archived);
                selection.evict(&summary.missing);
            }
            Err(ArchiveError::NoName) => {
                render::notice(self.console, "Archive cancelled: no name given.")?;
            }
            Err(ArchiveError::NothingToArchive) => {
                render::error(self.console, "None of the selected files exist any more.")?;
                let gone = selection.current().to_vec();
                selection.evict(&gone);
            }
            Err(e) => {
                render::error(self.console, &format!("Archive failed: {}", e))?;
            }
        }
        Ok(Flow::Stay)
    }

    fn details(&mut self, selection: &mut SelectionSet) -> Result<Flow, Error> {
        let mut vanished = Vec::new();
        for path in selection.current() {
            let lookup = file_details(path);
            render::details(self.console, &lookup)?;
            if let DetailsLookup::NotFound(path) = lookup {
                vanished.push(path);
            }
        }
        selection.evict(&vanished);
        Ok(Flow::Stay)
    }

    /// Walk an old- or large-file list one file at a time. Every outlier is
    /// reachable: the list is first split by extension, then the chosen
    /// extension's files are shown in full.
    fn browse(&mut self, strategy: Strategy, snapshot: &Snapshot) -> Result<State, Error> {
        let (kind, outliers) = self.browse_outliers(strategy, snapshot)?;
        if outliers.is_empty() {
            render::notice(self.console, "No files found for this category.")?;
            return Ok(State::CategorySelect);
        }

        let groups = extension_menu(&format!("{} files by extension", kind), &outliers);
        render::menu(self.console, &groups)?;
        let Some(answer) = ask(self.console, "Select an extension (0 to cancel): ")? else {
            return Ok(State::Terminated);
        };
        let (extension, chosen) = match groups.resolve(&answer) {
            Selection::Files(files) => {
                let extension = groups
                    .entries
                    .iter()
                    .find(|entry| entry.files == files)
                    .map(|entry| entry.label.clone())
                    .unwrap_or_default();
                (extension, files.into_iter().collect::<HashSet<_>>())
            }
            Selection::Cancelled => return Ok(State::CategorySelect),
            Selection::Invalid(message) => {
                render::error(self.console, &message)?;
                return Ok(State::CategorySelect);
            }
        };

        let title = format!("{} {} files", kind, extension);
        let mut entries: Vec<MenuEntry> = outliers
            .into_iter()
            .filter(|(record, _)| chosen.contains(&record.path))
            .map(|(record, detail)| MenuEntry {
                label: record.file_name(),
                detail,
                files: vec![record.path],
            })
            .collect();

        let mut state = BrowseState::NavigateList;
        loop {
            match state {
                BrowseState::Done => return Ok(State::CategorySelect),
                BrowseState::NavigateList => {
                    let menu = Menu {
                        title: title.clone(),
                        entries: entries.clone(),
                    };
                    render::menu(self.console, &menu)?;
                    let Some(input) = ask(self.console, "Enter the file number (0 to exit): ")?
                    else {
                        return Ok(State::Terminated);
                    };
                    let (next, event) = state.on_input(&input, entries.len());
                    if let BrowseEvent::Invalid(message) = event {
                        render::error(self.console, &message)?;
                    }
                    state = next;
                }
                BrowseState::FileSelected(index) => {
                    if let Some(path) = entries[index].files.first() {
                        render::details(self.console, &file_details(path))?;
                    }
                    state = state.file_shown();
                }
                BrowseState::ActionChoice(index) => {
                    let path = match entries[index].files.first() {
                        Some(path) => path.clone(),
                        None => {
                            state = BrowseState::NavigateList;
                            continue;
                        }
                    };
                    render::browse_options(self.console, &path)?;
                    let Some(input) = ask(self.console, "Choose an action: ")? else {
                        return Ok(State::Terminated);
                    };
                    let (next, event) = state.on_input(&input, entries.len());
                    state = match event {
                        BrowseEvent::Run(command, index) => {
                            let completed = self.browse_command(command, &path)?;
                            if completed
                                && matches!(command, BrowseCommand::Delete | BrowseCommand::Archive)
                            {
                                entries.remove(index);
                            }
                            after_command(command, index, completed, entries.len())
                        }
                        BrowseEvent::Invalid(message) => {
                            render::error(self.console, &message)?;
                            next
                        }
                        BrowseEvent::None => next,
                    };
                }
            }
        }
    }

    /// Every age or size outlier, oldest or largest first, with its age or
    /// size already formatted.
    fn browse_outliers(
        &self,
        strategy: Strategy,
        snapshot: &Snapshot,
    ) -> Result<(&'static str, Vec<(FileRecord, String)>), Error> {
        let outliers = match classify(strategy, &snapshot.records, self.config, snapshot.taken_at)? {
            Classification::AgeOutliers(outliers) => (
                "Oldest",
                outliers
                    .into_iter()
                    .map(|o| {
                        let age = format_age(o.age);
                        (o.record, age)
                    })
                    .collect(),
            ),
            Classification::SizeOutliers(outliers) => (
                "Largest",
                outliers
                    .into_iter()
                    .map(|o| (o.record, HumanBytes(o.size_bytes).to_string()))
                    .collect(),
            ),
            _ => ("", Vec::new()),
        };
        Ok(outliers)
    }

    /// Run one browse command on `path`. Returns whether it went through;
    /// for delete and archive that means the file left its place.
    fn browse_command(&mut self, command: BrowseCommand, path: &Path) -> Result<bool, Error> {
        match command {
            BrowseCommand::Read => {
                match preview_text(path, PREVIEW_CHARS) {
                    Ok(content) => render::preview(self.console, &content)?,
                    Err(e) => render::error(self.console, &format!("Error opening the file: {}", e))?,
                }
                Ok(true)
            }
            BrowseCommand::Delete => {
                let question = format!("Are you sure you want to delete {}?", path.display());
                if !prompt_confirm(self.console, &question, Some(false))? {
                    render::notice(self.console, "Deletion of the file cancelled.")?;
                    return Ok(false);
                }
                let report = delete_paths(self.console, self.bin, &[path.to_path_buf()]);
                render::report(self.console, "Delete", &report)?;
                Ok(!report.gone().is_empty())
            }
            BrowseCommand::Archive => {
                let archive_dir = self.config.archive_dir();
                match move_one(path, &archive_dir) {
                    Ok(dest) => {
                        render::notice(
                            self.console,
                            &format!("{} moved to {}", path.display(), dest.display()),
                        )?;
                        Ok(true)
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound && !path.exists() => {
                        render::notice(self.console, &format!("{} no longer exists.", path.display()))?;
                        Ok(true)
                    }
                    Err(e) => {
                        render::error(
                            self.console,
                            &format!("Error archiving {}: {}", path.display(), e),
                        )?;
                        Ok(false)
                    }
                }
            }
            BrowseCommand::Ignore => Ok(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Stay,
    Quit,
}

/// Trash each path, asking per file before a permanent delete.
fn delete_paths(
    console: &mut dyn Console,
    bin: &dyn RecycleBin,
    paths: &[PathBuf],
) -> actions::ActionReport {
    delete_files(paths, bin, |path, reason| {
        let _ = render::error(
            console,
            &format!("Could not move {} to the trash: {}", path.display(), reason),
        );
        prompt_confirm(console, "Delete it permanently?", Some(false)).unwrap_or(false)
    })
}

/// One entry per extension among `outliers`, in order of first appearance.
fn extension_menu(title: &str, outliers: &[(FileRecord, String)]) -> Menu {
    let records: Vec<FileRecord> = outliers.iter().map(|(record, _)| record.clone()).collect();
    Menu {
        title: title.to_string(),
        entries: classify_by_extension(&records)
            .into_iter()
            .map(|group| MenuEntry {
                label: group.extension,
                detail: format!("{} files", group.files.len()),
                files: group.files.into_iter().map(|record| record.path).collect(),
            })
            .collect(),
    }
}

/// `~` and `~/...` point into the home directory.
fn expand_home(input: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (input, home) {
        ("~", Some(home)) => home,
        (rest, Some(home)) if rest.starts_with("~/") => home.join(&rest[2..]),
        (other, _) => PathBuf::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use crate::prompt::ScriptedConsole;
    use std::fs;
    use tempfile::tempdir;

    struct NoTrash;

    impl RecycleBin for NoTrash {
        fn recycle(&self, _path: &Path) -> Result<(), String> {
            Err("no trash here".to_string())
        }
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/Sorted"), home.join("Sorted"));
        }
    }

    #[test]
    fn test_emptied_selection_returns_to_categories() {
        let tmp = tempdir().unwrap();
        let config = AppConfig::default();
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        let mut session = Session::new(
            &config,
            tmp.path().to_path_buf(),
            &mut console,
            &NoTrash,
            &SilentReporter,
        );
        let state = session.action_menu(SelectionSet::default()).unwrap();
        assert_eq!(state, State::CategorySelect);
    }

    #[test]
    fn test_declined_permanent_delete_keeps_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("keep.txt");
        fs::write(&path, "x").unwrap();

        let config = AppConfig::default();
        let mut console = ScriptedConsole::new(["b", "y", "n"]);
        let mut session = Session::new(
            &config,
            tmp.path().to_path_buf(),
            &mut console,
            &NoTrash,
            &SilentReporter,
        );
        let state = session
            .action_menu(SelectionSet::new(vec![path.clone()]))
            .unwrap();

        assert_eq!(state, State::ActionMenu(SelectionSet::new(vec![path.clone()])));
        assert!(path.exists());
    }

    #[test]
    fn test_browse_archive_moves_into_archive_dir() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("big.bin"), vec![0u8; 64]).unwrap();

        let config = AppConfig {
            size_threshold_bytes: 10,
            archive_dir: Some(tmp.path().join("Archive")),
            ..AppConfig::default()
        };
        let mut console = ScriptedConsole::new(["6", "1", "1", "c"]);
        let mut session =
            Session::new(&config, root.clone(), &mut console, &NoTrash, &SilentReporter);
        let state = session.category_select().unwrap();

        assert_eq!(state, State::CategorySelect);
        assert!(!root.join("big.bin").exists());
        assert!(tmp.path().join("Archive").join("big.bin").exists());
    }

    #[test]
    fn test_browse_reaches_files_past_top_n() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("huge.log"), vec![0u8; 500]).unwrap();
        for i in 0..12 {
            fs::write(root.join(format!("f{}.bin", i)), vec![0u8; 20 + i]).unwrap();
        }

        let config = AppConfig {
            size_threshold_bytes: 10,
            top_n: 10,
            archive_dir: Some(tmp.path().join("Archive")),
            ..AppConfig::default()
        };
        // Extension 2 is bin (log is larger, so it comes first); file 12 is
        // the smallest bin.
        let mut console = ScriptedConsole::new(["6", "2", "12", "c", "0"]);
        let mut session =
            Session::new(&config, root.clone(), &mut console, &NoTrash, &SilentReporter);
        let state = session.category_select().unwrap();

        assert_eq!(state, State::CategorySelect);
        assert_eq!(console.remaining_inputs(), 0);
        assert!(tmp.path().join("Archive").join("f0.bin").exists());
        assert!(root.join("huge.log").exists());
        let output = console.output();
        assert!(output.contains("Largest files by extension"));
        assert!(output.contains("Largest bin files"));
    }

    #[test]
    fn test_browse_cancel_at_extension_step() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("big.bin"), vec![0u8; 64]).unwrap();
        let config = AppConfig {
            size_threshold_bytes: 10,
            ..AppConfig::default()
        };
        let mut console = ScriptedConsole::new(["6", "0"]);
        let mut session = Session::new(
            &config,
            tmp.path().to_path_buf(),
            &mut console,
            &NoTrash,
            &SilentReporter,
        );
        assert_eq!(session.category_select().unwrap(), State::CategorySelect);
        assert!(tmp.path().join("big.bin").exists());
    }
}
