//! Scenegen CLI
//!
//! Command-line front end for the scene generators.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::debug;

use scenegen::cli::{commands, Cli};
use scenegen::ToolSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("Scenegen v{}", env!("CARGO_PKG_VERSION"));

    let settings = match &cli.settings {
        Some(path) => ToolSettings::from_file(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        None => ToolSettings::default(),
    };

    match cli.command {
        Some(cmd) => commands::run(cmd, cli.store, &settings).await,
        None => {
            println!("Scenegen v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}
