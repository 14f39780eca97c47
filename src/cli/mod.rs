pub mod commands;
pub mod wizard;

use clap::Parser;

pub use commands::{Commands, RenderArgs, SummaryArgs};

/// attackmap — Attack-chain triage for correlated security findings
///
/// Turns an application's attack-chain detail document into a positioned
/// node/edge graph a rendering surface can draw.
#[derive(Parser, Debug)]
#[command(
    name = "attackmap",
    version,
    about = "🗺 attackmap — Attack-chain triage for correlated security findings",
    long_about = "attackmap reads attack-chain detail documents (correlated security findings),\nfilters them by risk score and category, and lays the surviving chains out\nas a positioned graph for rendering or review."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
