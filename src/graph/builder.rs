use std::collections::HashSet;

use tracing::debug;

use crate::graph::{CorrelationGraph, GraphEdge, GraphNode};
use crate::model::{AttackChainDetail, Filters};

/// Build an unpositioned node/edge graph from an attack-chain detail
/// document and the active filters.
///
/// Chains are gated coarsely on their `max_severity`: a chain that
/// clears the threshold keeps all of its category-filtered members even
/// when an individual member's own severity is below it. Uncorrelated
/// findings are gated on their own severity. The asymmetry is intentional,
/// a chain is as interesting as its worst member.
///
/// Every edge references two node ids present in the returned graph;
/// relationships touching a filtered-out (or never-emitted) finding are
/// dropped silently, which may leave a chain visually disconnected.
pub fn build(detail: &AttackChainDetail, filters: &Filters) -> CorrelationGraph {
    let mut nodes: Vec<GraphNode> = Vec::new();
    let mut edges: Vec<GraphEdge> = Vec::new();
    // Node ids emitted so far, across all chains processed. Grown
    // incrementally; also guards the node-id uniqueness invariant.
    let mut node_ids: HashSet<String> = HashSet::new();

    for chain in &detail.chains {
        if !filters.passes_min_risk(chain.max_severity) {
            debug!(
                "Chain {} below risk threshold ({}), skipped",
                chain.group_id, chain.max_severity
            );
            continue;
        }

        for finding in &chain.findings {
            if !filters.allows_category(finding.finding_category) {
                continue;
            }
            if !node_ids.insert(finding.id.clone()) {
                debug!("Duplicate finding id {}, skipped", finding.id);
                continue;
            }
            nodes.push(GraphNode::correlated(
                finding.clone(),
                chain.group_id.clone(),
            ));
        }

        for rel in &chain.relationships {
            if node_ids.contains(&rel.source_finding_id)
                && node_ids.contains(&rel.target_finding_id)
            {
                edges.push(GraphEdge::from_relationship(rel));
            } else {
                debug!("Relationship {} lost an endpoint, dropped", rel.id);
            }
        }
    }

    for finding in &detail.uncorrelated_findings {
        if !filters.passes_min_risk(finding.normalized_severity) {
            continue;
        }
        if !filters.allows_category(finding.finding_category) {
            continue;
        }
        if !node_ids.insert(finding.id.clone()) {
            debug!("Duplicate finding id {}, skipped", finding.id);
            continue;
        }
        nodes.push(GraphNode::uncorrelated(finding.clone()));
    }

    CorrelationGraph { nodes, edges }
}
