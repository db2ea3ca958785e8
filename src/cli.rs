use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "folder-archaeologist")]
#[command(about = "Dig through a folder: group files by type, size, age or name and act on them", long_about = None)]
pub struct Cli {
    /// Directory to explore (defaults to your home directory)
    pub path: Option<PathBuf>,

    /// TOML file overriding the built-in settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
