use std::path::PathBuf;

use clap::Parser;

mod platform;

use platform::{LogDestination, OutputFormat};

/// Builds a clickable outline of the user's own messages in a saved chat page.
#[derive(Debug, Parser)]
#[command(name = "outline_app", version)]
pub struct Cli {
    /// Saved HTML of the chat page.
    pub page: PathBuf,
    /// RON config with timings and extra heuristics.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// RON script of timed page mutations and pointer actions.
    #[arg(long)]
    pub script: Option<PathBuf>,
    /// Virtual milliseconds to run after activation.
    #[arg(long, default_value_t = 1_500)]
    pub run_for_ms: u64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Overrides the log destination from the config file.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::run_app(&cli)
}
