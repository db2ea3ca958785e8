use crate::model::FileRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionGroup {
    pub extension: String,
    pub files: Vec<FileRecord>,
}

/// Group every record under its normalized extension. Each record lands in
/// exactly one group.
pub fn classify_by_extension(records: &[FileRecord]) -> Vec<ExtensionGroup> {
    let mut groups: Vec<ExtensionGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index.get(record.extension.as_str()) {
            Some(&i) => groups[i].files.push(record.clone()),
            None => {
                index.insert(record.extension.as_str(), groups.len());
                groups.push(ExtensionGroup {
                    extension: record.extension.clone(),
                    files: vec![record.clone()],
                });
            }
        }
    }

    groups
}

/// Groups ordered by member count, largest first, ties kept in
/// first-occurrence order. Used for display only.
pub fn by_member_count(groups: &[ExtensionGroup]) -> Vec<&ExtensionGroup> {
    let mut sorted: Vec<&ExtensionGroup> = groups.iter().collect();
    sorted.sort_by(|a, b| b.files.len().cmp(&a.files.len()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn record(path: &str) -> FileRecord {
        FileRecord::new(PathBuf::from(path), 10, SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn test_groups_preserve_first_occurrence_and_scan_order() {
        let records = vec![
            record("/r/b.TXT"),
            record("/r/movie.mp4"),
            record("/r/a.txt"),
            record("/r/README"),
        ];
        let groups = classify_by_extension(&records);

        let keys: Vec<&str> = groups.iter().map(|g| g.extension.as_str()).collect();
        assert_eq!(keys, vec!["txt", "mp4", "no_extension"]);
        assert_eq!(groups[0].files[0].path, PathBuf::from("/r/b.TXT"));
        assert_eq!(groups[0].files[1].path, PathBuf::from("/r/a.txt"));
    }

    #[test]
    fn test_by_member_count_is_stable() {
        let records = vec![
            record("/r/1.log"),
            record("/r/2.png"),
            record("/r/3.png"),
            record("/r/4.md"),
        ];
        let groups = classify_by_extension(&records);
        let sorted: Vec<&str> = by_member_count(&groups)
            .iter()
            .map(|g| g.extension.as_str())
            .collect();
        assert_eq!(sorted, vec!["png", "log", "md"]);
    }
}
