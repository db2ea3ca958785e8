mod cli;
mod logging;
mod reporter;

use anyhow::{bail, Context};
use clap::Parser;
use cli::Cli;
use dotenv::dotenv;
use folder_archaeologist::config::load_configuration;
use folder_archaeologist::prompt::TerminalConsole;
use folder_archaeologist::{Session, SystemTrash};
use reporter::CliReporter;
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config =
        load_configuration(args.config.as_deref()).context("Error loading configuration")?;
    debug!("config: {:?}", config);

    let root = match args.path {
        Some(path) => path,
        None => dirs::home_dir().context("Could not determine the home directory")?,
    };
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    info!("Exploring {}", root.display());

    let mut console = TerminalConsole::new();
    let reporter = CliReporter::new();
    let mut session = Session::new(&config, root, &mut console, &SystemTrash, &reporter);
    session.run()?;

    Ok(())
}
