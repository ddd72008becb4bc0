use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Wall and door geometric inference CLI
#[derive(Parser, Debug)]
#[command(name = "wallinfer", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline over a drawing and write every stage artifact.
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input drawing JSON (the `{ layers: [...] }` record).
    #[arg(value_hint = ValueHint::FilePath)]
    pub drawing: PathBuf,

    /// Comma-separated layer names to feed the pipeline.
    #[arg(long, value_delimiter = ',')]
    pub layers: Vec<String>,

    /// Optional JSON file of externally-classified window/door blocks.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub window_door_blocks: Option<PathBuf>,

    /// Output directory for stage artifacts.
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Overwrite artifacts if the output directory already has them.
    #[arg(long)]
    pub force: bool,
}
