//! Folder triage: scan a directory tree, group its files by extension, size,
//! age or name, and delete, move, open, inspect or archive the groups.
//!
//! The [`workflow::Session`] drives everything through a [`prompt::Console`],
//! so the whole interactive loop runs the same against a terminal or a script.

pub mod actions;
pub mod analysis;
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod progress;
pub mod prompt;
pub mod render;
pub mod scanner;
pub mod selector;
pub mod workflow;

pub use actions::{ActionReport, FileOutcome, Outcome, RecycleBin, SystemTrash};
pub use analysis::{classify, Classification, Strategy};
pub use config::{AppConfig, OutlierPick};
pub use error::{Error, Result};
pub use model::{FileRecord, SelectionSet};
pub use progress::{ProgressReporter, SilentReporter};
pub use scanner::{scan_directory, Snapshot};
pub use selector::{Menu, Selection};
pub use workflow::{Session, State};
