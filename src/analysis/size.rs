use crate::model::FileRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeOutlier {
    pub record: FileRecord,
    pub size_bytes: u64,
}

/// Files strictly larger than `threshold_bytes`, biggest first. Equal sizes
/// keep scan order.
pub fn classify_by_size(records: &[FileRecord], threshold_bytes: u64) -> Vec<SizeOutlier> {
    let mut outliers: Vec<SizeOutlier> = records
        .iter()
        .filter(|record| record.size_bytes > threshold_bytes)
        .map(|record| SizeOutlier {
            record: record.clone(),
            size_bytes: record.size_bytes,
        })
        .collect();

    outliers.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    outliers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SIZE_THRESHOLD_BYTES;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn record(path: &str, size: u64) -> FileRecord {
        FileRecord::new(PathBuf::from(path), size, SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let records = vec![
            record("/r/at.bin", DEFAULT_SIZE_THRESHOLD_BYTES),
            record("/r/above.bin", DEFAULT_SIZE_THRESHOLD_BYTES + 1),
        ];
        let outliers = classify_by_size(&records, DEFAULT_SIZE_THRESHOLD_BYTES);
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].record.path, PathBuf::from("/r/above.bin"));
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let big = DEFAULT_SIZE_THRESHOLD_BYTES + 100;
        let records = vec![
            record("/r/first.iso", big),
            record("/r/huge.iso", big * 2),
            record("/r/second.iso", big),
        ];
        let outliers = classify_by_size(&records, DEFAULT_SIZE_THRESHOLD_BYTES);
        let names: Vec<String> = outliers.iter().map(|o| o.record.file_name()).collect();
        assert_eq!(names, vec!["huge.iso", "first.iso", "second.iso"]);
    }
}
