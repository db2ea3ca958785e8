use std::fs;
use std::path::Path;
use tempfile::tempdir;

use folder_archaeologist::prompt::ScriptedConsole;
use folder_archaeologist::{AppConfig, RecycleBin, Session, SilentReporter};

/// Stands in for the platform trash by removing the file outright.
struct RemovingBin;

impl RecycleBin for RemovingBin {
    fn recycle(&self, path: &Path) -> Result<(), String> {
        fs::remove_file(path).map_err(|e| e.to_string())
    }
}

/// Run a whole session over `root` with canned answers, returning what was
/// printed.
fn run_session(root: &Path, config: &AppConfig, inputs: &[&str]) -> String {
    colored::control::set_override(false);
    let mut console = ScriptedConsole::new(inputs.iter().copied());
    {
        let mut session = Session::new(
            config,
            root.to_path_buf(),
            &mut console,
            &RemovingBin,
            &SilentReporter,
        );
        session.run().unwrap();
    }
    assert_eq!(console.remaining_inputs(), 0, "unused input");
    console.output()
}

/// Layout:
///   root/
///     a.txt
///     b.txt
///     c.log
fn create_tree(root: &Path) {
    fs::write(root.join("a.txt"), "alpha").unwrap();
    fs::write(root.join("b.txt"), "beta").unwrap();
    fs::write(root.join("c.log"), "gamma").unwrap();
}

#[test]
fn test_exit_from_category_menu() {
    let tmp = tempdir().unwrap();
    create_tree(tmp.path());
    let output = run_session(tmp.path(), &AppConfig::default(), &["0"]);
    assert!(output.contains("Found 3 files"));
    assert!(output.contains("Goodbye!"));
}

#[test]
fn test_end_of_input_terminates() {
    let tmp = tempdir().unwrap();
    create_tree(tmp.path());
    let output = run_session(tmp.path(), &AppConfig::default(), &["1"]);
    assert!(output.contains("Top 10 File Extensions"));
    assert!(output.contains("Goodbye!"));
}

#[test]
fn test_invalid_choices_are_not_fatal() {
    let tmp = tempdir().unwrap();
    create_tree(tmp.path());
    let output = run_session(tmp.path(), &AppConfig::default(), &["9", "1", "7", "1", "x", "0"]);
    assert!(output.contains("Invalid choice"));
    assert!(output.contains("7 is out of range"));
    assert!(output.contains("'x' is not a number"));
}

#[test]
fn test_cancel_returns_to_categories() {
    let tmp = tempdir().unwrap();
    create_tree(tmp.path());
    let output = run_session(tmp.path(), &AppConfig::default(), &["1", "0", "0"]);
    assert_eq!(output.matches("=== File Categories ===").count(), 2);
    assert!(!output.contains("FILE OPERATIONS MENU"));
}

#[test]
fn test_select_then_go_back() {
    let tmp = tempdir().unwrap();
    create_tree(tmp.path());
    let output = run_session(
        tmp.path(),
        &AppConfig::default(),
        &["1", "1", "A", "2", "G", "H"],
    );
    assert!(output.contains("FILE OPERATIONS MENU (2 files)"));
    assert!(output.contains("FILE OPERATIONS MENU (1 files)"));
    assert!(output.contains("Back to the original list of 2 files."));
}

#[test]
fn test_delete_group_empties_selection() {
    let tmp = tempdir().unwrap();
    create_tree(tmp.path());
    let output = run_session(tmp.path(), &AppConfig::default(), &["1", "1", "B", "y", "0"]);

    assert!(!tmp.path().join("a.txt").exists());
    assert!(!tmp.path().join("b.txt").exists());
    assert!(tmp.path().join("c.log").exists());
    assert!(output.contains("No files left in this selection."));
    // The rescan no longer sees the deleted files.
    assert!(output.contains("Found 1 files"));
}

#[test]
fn test_declined_delete_touches_nothing() {
    let tmp = tempdir().unwrap();
    create_tree(tmp.path());
    let output = run_session(tmp.path(), &AppConfig::default(), &["1", "1", "B", "n", "H"]);
    assert!(output.contains("Deletion cancelled."));
    assert!(tmp.path().join("a.txt").exists());
}

#[test]
fn test_move_group_into_new_folder() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("root");
    fs::create_dir(&root).unwrap();
    create_tree(&root);
    let dest = tmp.path().join("sorted").join("text");

    let output = run_session(
        &root,
        &AppConfig::default(),
        &["1", "1", "D", dest.to_str().unwrap(), "F", "H"],
    );

    assert!(dest.join("a.txt").exists());
    assert!(dest.join("b.txt").exists());
    assert!(!root.join("a.txt").exists());
    // Details follow the files to their new place.
    assert!(!output.contains("File not found"));
    assert!(output.contains("File extension | txt"));
}

#[test]
fn test_token_search_picks_one_file() {
    let tmp = tempdir().unwrap();
    for name in ["report.txt", "report_v2.txt", "movie.mp4"] {
        fs::write(tmp.path().join(name), name).unwrap();
    }
    let output = run_session(
        tmp.path(),
        &AppConfig::default(),
        &["4", "y", "v2", "1", "H"],
    );
    assert!(output.contains("Files with token 'v2'"));
    assert!(output.contains("FILE OPERATIONS MENU (1 files)"));
    assert!(output.contains("report_v2.txt"));
}

#[test]
fn test_similar_names_without_search() {
    let tmp = tempdir().unwrap();
    for name in ["report.txt", "report_v2.txt", "movie.mp4"] {
        fs::write(tmp.path().join(name), name).unwrap();
    }
    let output = run_session(tmp.path(), &AppConfig::default(), &["4", "n", "1", "H"]);
    assert!(output.contains("similars found: 2"));
    assert!(output.contains("FILE OPERATIONS MENU (2 files)"));
}

#[test]
fn test_browse_reads_then_ignores() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("big.txt"), "hello from a large file").unwrap();
    let config = AppConfig {
        size_threshold_bytes: 4,
        ..AppConfig::default()
    };

    let output = run_session(tmp.path(), &config, &["6", "1", "1", "a", "z", "d", "0", "0"]);
    assert!(output.contains("hello from a large file"));
    assert!(output.contains("Invalid action"));
    assert!(tmp.path().join("big.txt").exists());
}

#[test]
fn test_browse_delete_returns_to_list() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("old1.bin"), vec![0u8; 32]).unwrap();
    fs::write(tmp.path().join("old2.bin"), vec![0u8; 16]).unwrap();
    let config = AppConfig {
        size_threshold_bytes: 8,
        ..AppConfig::default()
    };

    run_session(tmp.path(), &config, &["6", "1", "1", "b", "y", "0", "0"]);
    assert!(!tmp.path().join("old1.bin").exists());
    assert!(tmp.path().join("old2.bin").exists());
}

#[cfg(unix)]
#[test]
fn test_archive_group_then_selection_empties() {
    let zip_present = std::process::Command::new("zip")
        .arg("-v")
        .stdout(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    if !zip_present {
        eprintln!("zip not installed, skipping");
        return;
    }

    let tmp = tempdir().unwrap();
    let root = tmp.path().join("root");
    fs::create_dir(&root).unwrap();
    create_tree(&root);
    let config = AppConfig {
        archive_dir: Some(tmp.path().join("Archive")),
        ..AppConfig::default()
    };

    let output = run_session(&root, &config, &["1", "1", "E", "bundle", "0"]);

    let archive = tmp.path().join("Archive").join("bundle.zip");
    assert!(archive.is_file());
    assert!(output.contains("Archived 2 files to"));
    assert!(output.contains("No files left in this selection."));
    // Archiving leaves the originals in place.
    assert!(root.join("a.txt").exists());
    assert!(root.join("b.txt").exists());
}
