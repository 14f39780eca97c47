mod cli;
mod config;
mod engine;
mod graph;
mod layout;
mod model;
mod report;
mod style;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use engine::Renderer;

fn main() -> Result<()> {
    let raw_args: Vec<String> = std::env::args().collect();

    // ── Wizard / drag-drop detection (before clap parsing) ──────────
    if raw_args.len() == 1 {
        // No arguments at all → interactive wizard
        return cli::wizard::run_wizard();
    }

    if raw_args.len() == 2 {
        let candidate = std::path::Path::new(&raw_args[1]);
        // If the single argument is an existing .json document AND not a
        // known subcommand, treat it as a drag-and-drop render.
        let known_commands = ["render", "summary", "init", "styles", "help", "-h", "--help", "-V", "--version", "-v", "--verbose", "-q", "--quiet"];
        let is_json = candidate
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        if candidate.is_file() && is_json && !known_commands.contains(&raw_args[1].as_str()) {
            return cli::wizard::run_drag_drop(candidate);
        }
    }

    // ── Normal clap flow ────────────────────────────────────────────
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("attackmap=debug")
    } else if cli.quiet {
        EnvFilter::new("attackmap=error")
    } else {
        EnvFilter::new("attackmap=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    info!("attackmap v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        cli::Commands::Render(args) => {
            let renderer = Renderer::new(args)?;
            let report = renderer.run()?;

            match renderer.format.as_str() {
                "json" => {
                    let output = report::json::render(&report)?;
                    if let Some(ref path) = args.out {
                        std::fs::write(path, &output)?;
                        info!("Graph written to {}", path.display());
                    } else {
                        println!("{}", output);
                    }
                }
                _ => {
                    report::terminal::render(&report);
                    if let Some(ref path) = args.out {
                        let json_output = report::json::render(&report)?;
                        std::fs::write(path, &json_output)?;
                        info!("JSON graph also written to {}", path.display());
                    }
                }
            }
        }
        cli::Commands::Summary(args) => {
            let filters = engine::resolve_filters(args.min_risk, &args.categories, None)?;

            let mut documents = Vec::new();
            for path in &args.paths {
                if path.is_dir() {
                    documents.extend(engine::discover::find_documents(
                        path,
                        &args.include,
                        &args.exclude,
                        args.max_file_size,
                    )?);
                } else {
                    documents.push(path.clone());
                }
            }
            info!("Summarizing {} documents", documents.len());

            let rows = engine::summarize(&documents, &filters);
            report::terminal::render_summary(&rows);
        }
        cli::Commands::Init => {
            config::init_config()?;
        }
        cli::Commands::Styles => {
            style::list_styles();
        }
    }

    Ok(())
}
