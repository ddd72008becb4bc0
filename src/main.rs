use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wallinfer::cli::{Cli, Commands};
use wallinfer::commands;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Run(args) => commands::run(&cli, args),
    }
}
