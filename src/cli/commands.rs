use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render an attack-chain detail document into a positioned graph
    Render(RenderArgs),

    /// Summarize attack chains across multiple applications
    Summary(SummaryArgs),

    /// Initialize an .attackmap.toml config file in the current directory
    Init,

    /// List the visual-attribute tables (accents, badges, strokes)
    Styles,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Attack-chain detail document (JSON)
    pub input: PathBuf,

    /// Minimum risk score (1-5). Chains whose max severity ranks below
    /// this are skipped entirely; uncorrelated findings are checked
    /// against their own severity.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub min_risk: Option<u8>,

    /// Category to keep: SAST, SCA, or DAST (can be repeated). Default: all
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Layout direction: "LR" (left to right) or "TB" (top to bottom)
    #[arg(short, long)]
    pub direction: Option<String>,

    /// Output format: "terminal" or "json"
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write the JSON report to a file
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Ignore .attackmap.toml config files
    #[arg(long)]
    pub no_config: bool,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Detail documents or directories to walk for them
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Minimum risk score (1-5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub min_risk: Option<u8>,

    /// Category to keep: SAST, SCA, or DAST (can be repeated). Default: all
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Glob patterns to include when walking directories (can be repeated)
    #[arg(long)]
    pub include: Vec<String>,

    /// Glob patterns to exclude when walking directories (can be repeated)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Maximum document size in bytes when walking directories
    #[arg(long, default_value = "10485760")]
    pub max_file_size: u64,
}
