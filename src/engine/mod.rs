pub mod discover;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::cli::RenderArgs;
use crate::config::AttackmapConfig;
use crate::graph::builder;
use crate::layout::{self, Direction};
use crate::model::{self, AttackChainDetail, Category, Filters, Severity};
use crate::report::{AppSummary, GraphSummary, RenderReport};
use crate::style::Legend;

/// The render pipeline for one application document. Resolves CLI
/// arguments against any discovered config, then runs
/// load → build → layout → report.
pub struct Renderer {
    /// Document to render
    input: PathBuf,
    /// Active filters (CLI over config)
    filters: Filters,
    /// Layout direction (CLI over config, default LR)
    direction: Direction,
    /// Output format (CLI over config, default "terminal")
    pub format: String,
}

impl Renderer {
    pub fn new(args: &RenderArgs) -> Result<Self> {
        let input = std::fs::canonicalize(&args.input)
            .with_context(|| format!("cannot open {}", args.input.display()))?;

        // Load optional config from the document's directory upward
        let config = if args.no_config {
            None
        } else {
            let start = input.parent().unwrap_or(Path::new("."));
            AttackmapConfig::load(start)
        };

        let filters = resolve_filters(args.min_risk, &args.categories, config.as_ref())?;

        let direction = match &args.direction {
            Some(raw) => raw.parse::<Direction>()?,
            None => config_direction(config.as_ref()),
        };

        let format = args
            .format
            .clone()
            .or_else(|| config.as_ref().and_then(|c| c.output.format.clone()))
            .unwrap_or_else(|| "terminal".to_string());

        Ok(Renderer {
            input,
            filters,
            direction,
            format,
        })
    }

    /// Run the full render pipeline
    pub fn run(&self) -> Result<RenderReport> {
        let start = Instant::now();

        let detail = model::load_detail(&self.input)?;
        info!(
            "Loaded {}: {} chains, {} uncorrelated findings",
            self.input.display(),
            detail.chains.len(),
            detail.uncorrelated_findings.len()
        );

        let graph = builder::build(&detail, &self.filters);
        info!(
            "Graph: {} nodes, {} edges after filtering",
            graph.nodes.len(),
            graph.edges.len()
        );

        let nodes = layout::layout(&graph.nodes, &graph.edges, self.direction);
        let digest = graph_digest(&detail, &self.filters, self.direction);
        let summary = GraphSummary::new(&detail, &self.filters, &graph);
        let duration = start.elapsed();

        Ok(RenderReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: self.input.clone(),
            application_id: detail.application_id,
            app_name: detail.app_name,
            app_code: detail.app_code,
            direction: self.direction,
            digest,
            duration_ms: duration.as_millis() as u64,
            summary,
            legend: Legend::default(),
            nodes,
            edges: graph.edges,
        })
    }
}

/// Merge CLI filter flags with config defaults. CLI categories must
/// parse strictly; config categories are warned about and skipped.
pub fn resolve_filters(
    min_risk: Option<u8>,
    categories: &[String],
    config: Option<&AttackmapConfig>,
) -> Result<Filters> {
    let mut parsed: Vec<Category> = Vec::new();
    for raw in categories {
        match raw.parse::<Category>() {
            Ok(category) => {
                if !parsed.contains(&category) {
                    parsed.push(category);
                }
            }
            Err(e) => bail!("{e}"),
        }
    }

    if parsed.is_empty() {
        if let Some(config) = config {
            for raw in &config.filter.categories {
                match raw.parse::<Category>() {
                    Ok(category) => {
                        if !parsed.contains(&category) {
                            parsed.push(category);
                        }
                    }
                    Err(e) => warn!("Ignoring config category: {e}"),
                }
            }
        }
    }

    let min_risk_score = min_risk.or_else(|| {
        config.and_then(|c| {
            c.filter.min_risk_score.filter(|&min| {
                let valid = (1..=5).contains(&min);
                if !valid {
                    warn!("Ignoring config min_risk_score {min} (expected 1-5)");
                }
                valid
            })
        })
    });

    Ok(Filters {
        min_risk_score,
        categories: parsed,
    })
}

fn config_direction(config: Option<&AttackmapConfig>) -> Direction {
    let Some(raw) = config.and_then(|c| c.layout.direction.as_deref()) else {
        return Direction::default();
    };
    match raw.parse::<Direction>() {
        Ok(direction) => direction,
        Err(e) => {
            warn!("Ignoring config direction: {e}");
            Direction::default()
        }
    }
}

/// Structural digest of (document, filters, direction). Identical
/// inputs hash identically, so a host page can use the digest as a
/// memoization key and skip re-rendering unchanged state.
pub fn graph_digest(detail: &AttackChainDetail, filters: &Filters, direction: Direction) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(detail).unwrap_or_default());
    hasher.update(serde_json::to_vec(filters).unwrap_or_default());
    hasher.update(direction.as_str().as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..16].to_string()
}

/// Load and summarize many application documents in parallel. Unreadable
/// or invalid documents are skipped with a warning rather than failing
/// the whole run.
pub fn summarize(paths: &[PathBuf], filters: &Filters) -> Vec<AppSummary> {
    paths
        .par_iter()
        .filter_map(|path| match model::load_detail(path) {
            Ok(detail) => {
                let graph = builder::build(&detail, filters);
                let max_severity = detail
                    .chains
                    .iter()
                    .map(|chain| chain.max_severity)
                    .chain(
                        detail
                            .uncorrelated_findings
                            .iter()
                            .map(|finding| finding.normalized_severity),
                    )
                    .max()
                    .unwrap_or(Severity::Unknown);
                Some(AppSummary {
                    source: path.clone(),
                    app_name: detail.app_name,
                    app_code: detail.app_code,
                    chains: detail.chains.len(),
                    nodes: graph.nodes.len(),
                    edges: graph.edges.len(),
                    max_severity,
                })
            }
            Err(e) => {
                warn!("Skipping {}: {e}", path.display());
                None
            }
        })
        .collect()
}
