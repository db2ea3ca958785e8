use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

use folder_archaeologist::analysis::{
    classify_by_age, classify_by_extension, classify_by_name, classify_by_size,
    search_by_any_token, search_by_leading_token, Tokenizer,
};
use folder_archaeologist::{classify, scan_directory, AppConfig, Classification, SilentReporter, Strategy};

const MIB: u64 = 1024 * 1024;

/// Layout:
///   root/
///     movie.mp4        (600 MiB, sparse)
///     report.txt       (50 bytes)
///     report_v2.txt    (50 bytes)
fn create_scenario(root: &Path) {
    fs::create_dir_all(root).unwrap();
    fs::write(root.join("report.txt"), vec![b'r'; 50]).unwrap();
    fs::write(root.join("report_v2.txt"), vec![b'v'; 50]).unwrap();
    let movie = fs::File::create(root.join("movie.mp4")).unwrap();
    movie.set_len(600 * MIB).unwrap();
}

fn names(paths: impl IntoIterator<Item = PathBuf>) -> Vec<String> {
    paths
        .into_iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scenario_extension_groups() {
    let tmp = tempdir().unwrap();
    create_scenario(tmp.path());
    let snapshot = scan_directory(tmp.path(), &[], &SilentReporter).unwrap();

    let groups = classify_by_extension(&snapshot.records);
    assert_eq!(groups.len(), 2);

    let txt = groups.iter().find(|g| g.extension == "txt").unwrap();
    assert_eq!(
        names(txt.files.iter().map(|f| f.path.clone())),
        vec!["report.txt", "report_v2.txt"]
    );
    let mp4 = groups.iter().find(|g| g.extension == "mp4").unwrap();
    assert_eq!(names(mp4.files.iter().map(|f| f.path.clone())), vec!["movie.mp4"]);
}

#[test]
fn test_scenario_size_outliers() {
    let tmp = tempdir().unwrap();
    create_scenario(tmp.path());
    let snapshot = scan_directory(tmp.path(), &[], &SilentReporter).unwrap();

    let config = AppConfig::default();
    let outliers = classify_by_size(&snapshot.records, config.size_threshold_bytes);
    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0].record.file_name(), "movie.mp4");
    assert_eq!(outliers[0].size_bytes, 629_145_600);
}

#[test]
fn test_scenario_name_cluster() {
    let tmp = tempdir().unwrap();
    create_scenario(tmp.path());
    let snapshot = scan_directory(tmp.path(), &[], &SilentReporter).unwrap();

    let tokenizer = Tokenizer::new(&["_", "-", " "]).unwrap();
    let clusters = classify_by_name(&snapshot.records, &tokenizer);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].token, "report");
    assert_eq!(
        names(clusters[0].files.iter().map(|f| f.path.clone())),
        vec!["report.txt", "report_v2.txt"]
    );
}

#[test]
fn test_token_searches_differ() {
    let tmp = tempdir().unwrap();
    create_scenario(tmp.path());
    let snapshot = scan_directory(tmp.path(), &[], &SilentReporter).unwrap();
    let tokenizer = Tokenizer::new(&["_", "-", " "]).unwrap();

    let leading = search_by_leading_token(&snapshot.records, &tokenizer, "v2");
    assert!(leading.is_empty());

    let any = search_by_any_token(&snapshot.records, &tokenizer, "V2");
    assert_eq!(names(any.into_iter().map(|r| r.path)), vec!["report_v2.txt"]);
}

#[test]
fn test_extension_groups_partition_the_tree() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    for (dir, file) in [
        ("docs", "a.PDF"),
        ("docs", "b.pdf"),
        ("docs/old", "c.txt"),
        ("src", "main.rs"),
        ("src", "Makefile"),
        ("", ".hidden"),
    ] {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), file).unwrap();
    }

    let snapshot = scan_directory(root, &[], &SilentReporter).unwrap();
    assert_eq!(snapshot.records.len(), 6);

    let groups = classify_by_extension(&snapshot.records);
    let members: Vec<PathBuf> = groups
        .iter()
        .flat_map(|g| g.files.iter().map(|f| f.path.clone()))
        .collect();
    let unique: HashSet<&PathBuf> = members.iter().collect();
    assert_eq!(members.len(), snapshot.records.len());
    assert_eq!(unique.len(), snapshot.records.len());

    let pdf = groups.iter().find(|g| g.extension == "pdf").unwrap();
    assert_eq!(pdf.files.len(), 2);
    assert!(groups.iter().any(|g| g.extension == "no_extension"));
}

#[test]
fn test_classification_is_repeatable() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    for name in ["IMG_001.jpg", "IMG_002.jpg", "notes-2020.txt", "notes-2021.txt", "x.bin"] {
        fs::write(root.join(name), name).unwrap();
    }

    let config = AppConfig::default();
    let first = scan_directory(root, &[], &SilentReporter).unwrap();
    let second = scan_directory(root, &[], &SilentReporter).unwrap();

    for strategy in [Strategy::Extension, Strategy::Size, Strategy::Age, Strategy::Name] {
        let a = classify(strategy, &first.records, &config, first.taken_at).unwrap();
        let b = classify(strategy, &second.records, &config, first.taken_at).unwrap();
        assert_eq!(a, b, "{:?}", strategy);
    }

    let Classification::NameClusters(clusters) =
        classify(Strategy::Name, &first.records, &config, first.taken_at).unwrap()
    else {
        panic!("expected name clusters");
    };
    let tokens: Vec<&str> = clusters.iter().map(|c| c.token.as_str()).collect();
    assert_eq!(tokens, vec!["img", "notes"]);
}

#[test]
fn test_age_outliers_against_a_later_clock() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("b.txt"), "b").unwrap();
    let snapshot = scan_directory(root, &[], &SilentReporter).unwrap();

    let threshold = Duration::from_secs(AppConfig::default().age_threshold_secs);

    assert!(classify_by_age(&snapshot.records, threshold, snapshot.taken_at).is_empty());

    let two_years_on = snapshot.taken_at + threshold * 2;
    let outliers = classify_by_age(&snapshot.records, threshold, two_years_on);
    assert_eq!(outliers.len(), 2);
    assert!(outliers.iter().all(|o| o.age > threshold));
    assert!(outliers.windows(2).all(|w| w[0].age >= w[1].age));
}

#[test]
fn test_ignore_patterns_skip_directories() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    fs::write(root.join("node_modules/pkg/index.js"), "x").unwrap();
    fs::write(root.join("keep.js"), "x").unwrap();

    let snapshot =
        scan_directory(root, &["node_modules".to_string()], &SilentReporter).unwrap();
    assert_eq!(names(snapshot.records.into_iter().map(|r| r.path)), vec!["keep.js"]);
}
