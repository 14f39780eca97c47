pub mod json;
pub mod terminal;

use std::path::PathBuf;

use serde::Serialize;

use crate::graph::{CorrelationGraph, GraphEdge, GraphNode};
use crate::layout::Direction;
use crate::model::{AttackChainDetail, Filters, Severity};
use crate::style::Legend;

/// The complete render report for one application: the positioned graph
/// plus everything a rendering surface or a reviewer needs around it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    /// attackmap version
    pub version: String,

    /// When the graph was rendered
    pub timestamp: String,

    /// Document the graph was built from
    pub source: PathBuf,

    pub application_id: String,
    pub app_name: String,
    pub app_code: String,

    /// Layout direction used
    pub direction: Direction,

    /// Structural digest of (document, filters, direction). Identical
    /// inputs always produce the same digest, so it doubles as a
    /// memoization key for callers re-rendering unchanged state.
    pub digest: String,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Summary counts
    pub summary: GraphSummary,

    /// Visual-attribute tables for the rendering surface
    pub legend: Legend,

    /// Positioned nodes (top-left origin)
    pub nodes: Vec<GraphNode>,

    pub edges: Vec<GraphEdge>,
}

/// Summary statistics for one rendered graph.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub chains_total: usize,
    pub chains_kept: usize,
    pub uncorrelated_total: usize,
    pub uncorrelated_kept: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl GraphSummary {
    pub fn new(detail: &AttackChainDetail, filters: &Filters, graph: &CorrelationGraph) -> Self {
        let chains_kept = detail
            .chains
            .iter()
            .filter(|chain| filters.passes_min_risk(chain.max_severity))
            .count();
        let uncorrelated_kept = graph
            .nodes
            .iter()
            .filter(|node| node.data.is_uncorrelated)
            .count();

        let mut summary = GraphSummary {
            nodes: graph.nodes.len(),
            edges: graph.edges.len(),
            chains_total: detail.chains.len(),
            chains_kept,
            uncorrelated_total: detail.uncorrelated_findings.len(),
            uncorrelated_kept,
            critical: 0,
            high: 0,
            medium: 0,
            low: 0,
            info: 0,
        };
        for node in &graph.nodes {
            match node.data.finding.normalized_severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Info | Severity::Unknown => summary.info += 1,
            }
        }
        summary
    }
}

/// One row of the multi-application summary table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    pub source: PathBuf,
    pub app_name: String,
    pub app_code: String,
    pub chains: usize,
    pub nodes: usize,
    pub edges: usize,
    pub max_severity: Severity,
}
