use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;

use crate::model::Severity;
use crate::report::{AppSummary, RenderReport};
use crate::style;

/// Render a positioned graph report to the terminal with colors
pub fn render(report: &RenderReport) {
    println!();
    println!(
        "{}  attackmap v{} — {} ({}) — rendered in {:.2}s",
        "🗺".bold(),
        report.version,
        report.app_name.bold(),
        report.app_code,
        report.duration_ms as f64 / 1000.0
    );
    println!();

    if report.nodes.is_empty() {
        println!(
            "  {}  Nothing to draw — every chain and finding was filtered out.",
            "✅".bold()
        );
        println!();
        return;
    }

    // Nodes, grouped the way the builder emitted them: chains first
    // (members contiguous per chain), uncorrelated findings last.
    let mut current_group: Option<&str> = None;
    let mut uncorrelated_header_printed = false;

    for node in &report.nodes {
        if node.data.is_uncorrelated {
            if !uncorrelated_header_printed {
                println!("  {}  uncorrelated", "◌".dimmed());
                uncorrelated_header_printed = true;
            }
        } else if let Some(group) = node.data.chain_group_id.as_deref() {
            if current_group != Some(group) {
                println!("  {}  chain {}", "⛓".bold(), group.bold());
                current_group = Some(group);
            }
        }

        let finding = &node.data.finding;
        println!(
            "     {}  {}",
            severity_badge(finding.normalized_severity),
            finding.title.bold()
        );
        println!(
            "             {}",
            format!(
                "{} · {} · {}×{} @ ({}, {})",
                finding.source_tool,
                style::accent_color(finding.finding_category),
                node.size.width,
                node.size.height,
                node.position.x,
                node.position.y
            )
            .dimmed()
        );
    }

    if !report.edges.is_empty() {
        println!();
        println!("  {}  correlations", "↦".bold());
        for edge in &report.edges {
            let stroke = style::stroke_for_confidence(edge.data.confidence);
            println!(
                "     {}",
                format!(
                    "{} → {}  ({}, {})",
                    edge.source,
                    edge.target,
                    edge.data.relationship_type,
                    stroke.as_str()
                )
                .dimmed()
            );
        }
    }

    // Summary bar
    println!();
    println!("{}", "━".repeat(60));

    let summary = &report.summary;
    let mut parts = Vec::new();
    if summary.critical > 0 {
        parts.push(format!("{} critical", summary.critical).red().bold().to_string());
    }
    if summary.high > 0 {
        parts.push(format!("{} high", summary.high).yellow().bold().to_string());
    }
    if summary.medium > 0 {
        parts.push(format!("{} medium", summary.medium).blue().to_string());
    }
    if summary.low > 0 {
        parts.push(format!("{} low", summary.low).white().to_string());
    }
    if summary.info > 0 {
        parts.push(format!("{} info", summary.info).dimmed().to_string());
    }

    println!(
        " {} nodes, {} edges ({} of {} chains kept): {}",
        summary.nodes.to_string().bold(),
        summary.edges,
        summary.chains_kept,
        summary.chains_total,
        parts.join(", ")
    );
    println!("{}", "━".repeat(60));
    println!();
}

/// Colored ` SEVERITY ` badge; ANSI approximations of the badge table.
fn severity_badge(severity: Severity) -> String {
    let label = format!(" {} ", severity.as_str().to_uppercase());
    match severity {
        Severity::Critical => label.on_red().white().bold().to_string(),
        Severity::High => label.on_yellow().black().bold().to_string(),
        Severity::Medium => label.on_bright_yellow().black().to_string(),
        Severity::Low => label.on_blue().white().to_string(),
        Severity::Info | Severity::Unknown => label.on_white().black().to_string(),
    }
}

/// Render the multi-application summary table
pub fn render_summary(rows: &[AppSummary]) {
    println!();
    if rows.is_empty() {
        println!("  {}  No attack-chain documents found.", "⚠".yellow());
        println!();
        return;
    }

    println!("{}", summary_table(rows));

    let chains: usize = rows.iter().map(|r| r.chains).sum();
    let nodes: usize = rows.iter().map(|r| r.nodes).sum();
    let edges: usize = rows.iter().map(|r| r.edges).sum();
    println!(
        " {} applications: {} chains, {} nodes, {} edges",
        rows.len().to_string().bold(),
        chains,
        nodes,
        edges
    );
    println!();
}

/// Build the summary table (kept separate from printing so it can be
/// inspected in tests).
pub fn summary_table(rows: &[AppSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Application",
        "Code",
        "Chains",
        "Nodes",
        "Edges",
        "Max severity",
        "Source",
    ]);
    for row in rows {
        table.add_row(vec![
            row.app_name.clone(),
            row.app_code.clone(),
            row.chains.to_string(),
            row.nodes.to_string(),
            row.edges.to_string(),
            row.max_severity.to_string(),
            row.source.display().to_string(),
        ]);
    }
    table
}
