/// Classification strategies over a scan snapshot.
///
/// Every strategy is a pure function of the records and the configuration:
/// re-running on an unchanged tree gives identical groups in identical order.
pub mod age;
pub mod extension;
pub mod names;
pub mod size;

pub use age::{classify_by_age, AgeOutlier};
pub use extension::{classify_by_extension, ExtensionGroup};
pub use names::{
    classify_by_name, search_by_any_token, search_by_leading_token, NameCluster, Tokenizer,
};
pub use size::{classify_by_size, SizeOutlier};

use crate::config::AppConfig;
use crate::error::Error;
use crate::model::FileRecord;
use std::time::{Duration, SystemTime};

/// Which grouping the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Extension,
    Size,
    Age,
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// First-occurrence order of extensions, scan order within each group.
    ExtensionGroups(Vec<ExtensionGroup>),
    SizeOutliers(Vec<SizeOutlier>),
    AgeOutliers(Vec<AgeOutlier>),
    NameClusters(Vec<NameCluster>),
}

impl Classification {
    /// Number of groups (or outliers) in the full result.
    pub fn len(&self) -> usize {
        match self {
            Classification::ExtensionGroups(groups) => groups.len(),
            Classification::SizeOutliers(outliers) => outliers.len(),
            Classification::AgeOutliers(outliers) => outliers.len(),
            Classification::NameClusters(clusters) => clusters.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run one strategy. `now` anchors the age computation so the result depends
/// only on its inputs.
pub fn classify(
    strategy: Strategy,
    records: &[FileRecord],
    config: &AppConfig,
    now: SystemTime,
) -> Result<Classification, Error> {
    let classification = match strategy {
        Strategy::Extension => Classification::ExtensionGroups(classify_by_extension(records)),
        Strategy::Size => {
            Classification::SizeOutliers(classify_by_size(records, config.size_threshold_bytes))
        }
        Strategy::Age => Classification::AgeOutliers(classify_by_age(
            records,
            Duration::from_secs(config.age_threshold_secs),
            now,
        )),
        Strategy::Name => {
            let tokenizer = Tokenizer::new(&config.name_delimiters)?;
            Classification::NameClusters(classify_by_name(records, &tokenizer))
        }
    };
    Ok(classification)
}
