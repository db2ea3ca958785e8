/// Age analysis: files that have not been modified for longer than a threshold.
use crate::model::FileRecord;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeOutlier {
    pub record: FileRecord,
    pub age: Duration,
}

impl AgeOutlier {
    pub fn age_seconds(&self) -> u64 {
        self.age.as_secs()
    }
}

/// Files whose age at `now` is strictly greater than `threshold`, oldest
/// first. The comparison is on exact durations, nothing is rounded.
pub fn classify_by_age(
    records: &[FileRecord],
    threshold: Duration,
    now: SystemTime,
) -> Vec<AgeOutlier> {
    let mut outliers: Vec<AgeOutlier> = records
        .iter()
        .filter_map(|record| {
            let age = record.age_at(now);
            (age > threshold).then(|| AgeOutlier {
                record: record.clone(),
                age,
            })
        })
        .collect();

    outliers.sort_by(|a, b| b.age.cmp(&a.age));
    outliers
}
