use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cli::RenderArgs;
use crate::engine::Renderer;
use crate::report;

// ── Helpers ──────────────────────────────────────────────────────────

/// Read a line of input from stdin, trimmed.
fn read_line() -> String {
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).unwrap_or_default();
    buf.trim().to_string()
}

/// Pause until the user presses Enter.
fn press_enter(prompt: &str) {
    print!("{}", prompt.dimmed());
    io::stdout().flush().ok();
    let _ = read_line();
}

/// Print a horizontal separator.
fn separator() {
    println!("{}", "━".repeat(60));
}

// ── Render execution (reuses the engine) ────────────────────────────

/// Run the render pipeline with the chosen options and display results.
fn execute_render(
    input: &Path,
    min_risk: Option<u8>,
    categories: Vec<String>,
    direction: Option<String>,
) -> Result<()> {
    let args = RenderArgs {
        input: PathBuf::from(input),
        min_risk,
        categories,
        direction,
        format: None,
        out: None,
        no_config: false,
    };

    let renderer = Renderer::new(&args)?;
    let render_report = renderer.run()?;

    report::terminal::render(&render_report);

    // Ask if the user wants the JSON graph saved for a rendering surface
    print!("  {} ", "Save JSON graph? (y/N):".bold());
    io::stdout().flush().ok();
    let answer = read_line();

    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        let default_name = "attackmap-graph.json";
        print!("  Filename [{}]: ", default_name.dimmed());
        io::stdout().flush().ok();
        let filename = read_line();
        let filename = if filename.is_empty() {
            default_name.to_string()
        } else {
            filename
        };

        let json = report::json::render(&render_report)?;
        std::fs::write(&filename, &json)?;
        println!("  {} Graph written to {}", "✅".bold(), filename.green());
    }

    Ok(())
}

// ── Wizard screens ──────────────────────────────────────────────────

fn screen_welcome() {
    println!();
    separator();
    println!(
        "  {} {}",
        "🗺".bold(),
        format!("Welcome to attackmap v{}", env!("CARGO_PKG_VERSION")).bold()
    );
    println!(
        "  {}",
        "Attack-chain triage — lay out correlated security findings as a graph.".dimmed()
    );
    separator();
    println!();
    press_enter("  Press Enter to continue...");
}

/// Prompt for the detail document until an existing file is given.
fn screen_document() -> PathBuf {
    println!();
    println!("  {} {}", "📄".bold(), "Detail document".bold().underline());
    println!();
    loop {
        print!("  Path to an attack-chain detail document (.json): ");
        io::stdout().flush().ok();
        let raw = read_line();
        let path = PathBuf::from(&raw);
        if path.is_file() {
            return path;
        }
        println!("  {} \"{}\" is not a file.", "⚠".yellow(), raw);
    }
}

/// Prompt for the minimum risk score; empty keeps everything.
fn screen_min_risk() -> Option<u8> {
    println!();
    println!(
        "  Minimum risk score 1-5 (Critical=5 … Info=1), empty for no threshold."
    );
    loop {
        print!("  Min risk []: ");
        io::stdout().flush().ok();
        let raw = read_line();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<u8>() {
            Ok(min) if (1..=5).contains(&min) => return Some(min),
            _ => println!("  {}", "Please enter a number from 1 to 5.".yellow()),
        }
    }
}

/// Prompt for categories; empty keeps all.
fn screen_categories() -> Vec<String> {
    println!();
    println!("  Categories to keep (comma-separated: SAST, SCA, DAST), empty for all.");
    loop {
        print!("  Categories []: ");
        io::stdout().flush().ok();
        let raw = read_line();
        if raw.is_empty() {
            return Vec::new();
        }
        let parts: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if parts
            .iter()
            .all(|p| p.parse::<crate::model::Category>().is_ok())
        {
            return parts;
        }
        println!(
            "  {}",
            "Unknown category — expected SAST, SCA, or DAST.".yellow()
        );
    }
}

/// Prompt for the layout direction.
fn screen_direction() -> Option<String> {
    println!();
    println!("    {} Left → right (LR)", "1)".bold());
    println!("    {} Top → bottom (TB)", "2)".bold());
    loop {
        print!("  Direction [1]: ");
        io::stdout().flush().ok();
        match read_line().as_str() {
            "" | "1" => return Some("LR".to_string()),
            "2" => return Some("TB".to_string()),
            _ => println!("  {}", "Please enter 1 or 2.".yellow()),
        }
    }
}

// ── Public entry-points ─────────────────────────────────────────────

/// Interactive onboarding wizard (no-args mode).
pub fn run_wizard() -> Result<()> {
    init_quiet_logging();

    screen_welcome();

    let input = screen_document();
    let min_risk = screen_min_risk();
    let categories = screen_categories();
    let direction = screen_direction();

    execute_render(&input, min_risk, categories, direction)?;

    press_enter("  Press Enter to exit...");
    Ok(())
}

/// Drag-and-drop mode: a single .json file was passed without a subcommand.
pub fn run_drag_drop(path: &Path) -> Result<()> {
    init_quiet_logging();

    println!();
    separator();
    println!(
        "  {} {}",
        "🗺".bold(),
        format!("attackmap v{}", env!("CARGO_PKG_VERSION")).bold()
    );
    separator();
    println!();
    println!("  Render this document? {}", path.display().to_string().cyan());
    print!("  {} ", "(Y/n):".bold());
    io::stdout().flush().ok();
    let answer = read_line();

    if answer.is_empty()
        || answer.eq_ignore_ascii_case("y")
        || answer.eq_ignore_ascii_case("yes")
    {
        execute_render(path, None, Vec::new(), None)?;
    } else {
        println!("  {}", "Render cancelled.".dimmed());
    }

    press_enter("  Press Enter to exit...");
    Ok(())
}

/// Set up minimal tracing so the engine works without the full CLI
/// log initialisation (which requires the parsed Cli struct).
fn init_quiet_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("attackmap=info"))
        .with_target(false)
        .without_time()
        .try_init();
}
