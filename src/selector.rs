/// Turns a classification into a bounded, 1-based menu and maps the user's
/// answer to a concrete list of files. Nothing here reads input or prints.
use crate::analysis::extension::by_member_count;
use crate::analysis::Classification;
use crate::config::OutlierPick;
use crate::model::FileRecord;
use crate::render::format_age;
use indicatif::HumanBytes;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub detail: String,
    /// What choosing this entry hands to the action menu.
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The user entered 0.
    Cancelled,
    /// Not a number, or out of range. Carries the message to show.
    Invalid(String),
    Files(Vec<PathBuf>),
}

impl Selection {
    /// The chosen files, empty for cancellation and invalid input.
    pub fn into_files(self) -> Vec<PathBuf> {
        match self {
            Selection::Files(files) => files,
            Selection::Cancelled | Selection::Invalid(_) => Vec::new(),
        }
    }
}

impl Menu {
    /// Show at most `top_n` groups. Group entries always carry every member
    /// of their group; outlier entries follow `pick`.
    pub fn from_classification(
        classification: &Classification,
        top_n: usize,
        pick: OutlierPick,
    ) -> Self {
        match classification {
            Classification::ExtensionGroups(groups) => Menu {
                title: format!("Top {} File Extensions", top_n),
                entries: by_member_count(groups)
                    .into_iter()
                    .take(top_n)
                    .map(|group| MenuEntry {
                        label: group.extension.clone(),
                        detail: format!(
                            "{} files, {}",
                            group.files.len(),
                            HumanBytes(group.files.iter().map(|f| f.size_bytes).sum())
                        ),
                        files: paths_of(group.files.iter()),
                    })
                    .collect(),
            },
            Classification::NameClusters(clusters) => Menu {
                title: format!("Top {} Similar Name Groups", top_n),
                entries: clusters
                    .iter()
                    .take(top_n)
                    .map(|cluster| MenuEntry {
                        label: cluster.token.clone(),
                        detail: format!("similars found: {}", cluster.files.len()),
                        files: paths_of(cluster.files.iter()),
                    })
                    .collect(),
            },
            Classification::SizeOutliers(outliers) => {
                let shown: Vec<_> = outliers.iter().take(top_n).collect();
                let displayed = paths_of(shown.iter().map(|o| &o.record));
                Menu {
                    title: format!("Top {} Largest Files", top_n),
                    entries: shown
                        .iter()
                        .map(|o| MenuEntry {
                            label: o.record.file_name(),
                            detail: HumanBytes(o.size_bytes).to_string(),
                            files: pick_files(pick, &o.record, &displayed),
                        })
                        .collect(),
                }
            }
            Classification::AgeOutliers(outliers) => {
                let shown: Vec<_> = outliers.iter().take(top_n).collect();
                let displayed = paths_of(shown.iter().map(|o| &o.record));
                Menu {
                    title: format!("Top {} Oldest Files", top_n),
                    entries: shown
                        .iter()
                        .map(|o| MenuEntry {
                            label: o.record.file_name(),
                            detail: format_age(o.age),
                            files: pick_files(pick, &o.record, &displayed),
                        })
                        .collect(),
                }
            }
        }
    }

    /// A plain file list where each entry selects one file.
    pub fn from_records(title: &str, records: &[FileRecord]) -> Self {
        Menu {
            title: title.to_string(),
            entries: records
                .iter()
                .map(|record| MenuEntry {
                    label: record.file_name(),
                    detail: record
                        .path
                        .parent()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    files: vec![record.path.clone()],
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `0` cancels; `1..=len` picks an entry; anything else is invalid.
    pub fn resolve(&self, input: &str) -> Selection {
        let input = input.trim();
        match input.parse::<usize>() {
            Ok(0) => Selection::Cancelled,
            Ok(choice) if choice <= self.entries.len() => {
                Selection::Files(self.entries[choice - 1].files.clone())
            }
            Ok(choice) => Selection::Invalid(format!(
                "{} is out of range, pick 1-{} or 0 to cancel",
                choice,
                self.entries.len()
            )),
            Err(_) => Selection::Invalid(format!("'{}' is not a number", input)),
        }
    }
}

fn paths_of<'a>(records: impl Iterator<Item = &'a FileRecord>) -> Vec<PathBuf> {
    records.map(|r| r.path.clone()).collect()
}

fn pick_files(pick: OutlierPick, chosen: &FileRecord, displayed: &[PathBuf]) -> Vec<PathBuf> {
    match pick {
        OutlierPick::Single => vec![chosen.path.clone()],
        OutlierPick::Displayed => displayed.to_vec(),
    }
}
