use crate::error::Error;
use config::{Config, Environment, File as ConfigFile, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 500 MiB.
pub const DEFAULT_SIZE_THRESHOLD_BYTES: u64 = 524_288_000;
/// 365.25 days.
pub const DEFAULT_AGE_THRESHOLD_SECS: u64 = 31_557_600;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 120;

const ENV_PREFIX: &str = "ARCHAEOLOGIST";

/// What a valid index on a size/age outlier list hands to the action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierPick {
    /// Only the chosen record.
    #[default]
    Single,
    /// Every record in the displayed top-N list.
    Displayed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub size_threshold_bytes: u64,
    pub age_threshold_secs: u64,
    pub name_delimiters: Vec<String>,
    pub top_n: usize,
    pub outlier_pick: OutlierPick,
    pub process_timeout_secs: u64,
    #[serde(default)]
    pub archive_dir: Option<PathBuf>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            size_threshold_bytes: DEFAULT_SIZE_THRESHOLD_BYTES,
            age_threshold_secs: DEFAULT_AGE_THRESHOLD_SECS,
            name_delimiters: default_delimiters(),
            top_n: DEFAULT_TOP_N,
            outlier_pick: OutlierPick::Single,
            process_timeout_secs: DEFAULT_PROCESS_TIMEOUT_SECS,
            archive_dir: None,
            ignore_patterns: Vec::new(),
        }
    }
}

fn default_delimiters() -> Vec<String> {
    vec![" ".to_string(), "-".to_string(), "_".to_string()]
}

impl AppConfig {
    pub fn process_timeout(&self) -> Duration {
        Duration::from_secs(self.process_timeout_secs)
    }

    /// Where archives and browse-mode "archive" moves land. Falls back to
    /// `~/Archive`, or `./Archive` when no home directory is known.
    pub fn archive_dir(&self) -> PathBuf {
        match &self.archive_dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Archive"),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.top_n == 0 {
            return Err(Error::InvalidConfig("top_n must be at least 1".to_string()));
        }
        if self.process_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "process_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Layer defaults, an optional TOML file and `ARCHAEOLOGIST_*` environment
/// variables, in that order.
pub fn load_configuration(config_file: Option<&Path>) -> Result<AppConfig, Error> {
    let defaults = AppConfig::default();

    let mut builder = Config::builder()
        .set_default("size_threshold_bytes", defaults.size_threshold_bytes as i64)?
        .set_default("age_threshold_secs", defaults.age_threshold_secs as i64)?
        .set_default("name_delimiters", defaults.name_delimiters.clone())?
        .set_default("top_n", defaults.top_n as i64)?
        .set_default("outlier_pick", "single")?
        .set_default("process_timeout_secs", defaults.process_timeout_secs as i64)?;

    if let Some(path) = config_file {
        builder = builder.add_source(ConfigFile::from(path).format(FileFormat::Toml).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("name_delimiters")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?
        .try_deserialize::<AppConfig>()?;

    config.validate()?;
    Ok(config)
}
