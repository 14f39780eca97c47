pub mod layered;

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::graph::{GraphEdge, GraphNode, NodeSize, Point};

pub use layered::LayeredPlacement;

/// Which way ranks flow across the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Ranks flow left → right.
    #[default]
    LR,
    /// Ranks flow top → bottom.
    TB,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::LR => "LR",
            Direction::TB => "TB",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown layout direction '{0}' (expected LR or TB)")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LR" => Ok(Direction::LR),
            "TB" => Ok(Direction::TB),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Spacing parameters for the layered layout, in canvas units.
#[derive(Debug, Clone, Copy)]
pub struct LayoutSpacing {
    /// Separation between nodes within the same rank.
    pub node_sep: f64,
    /// Separation between adjacent ranks.
    pub rank_sep: f64,
    /// Outer margin on both axes.
    pub margin: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        LayoutSpacing {
            node_sep: 50.0,
            rank_sep: 80.0,
            margin: 20.0,
        }
    }
}

/// Index-based adjacency view of a node/edge graph, the input to a
/// placement strategy. Edge payloads are irrelevant to layout.
pub struct LayoutGraph {
    pub n: usize,
    /// Forward edges: adj[u] = successors of u.
    pub adj: Vec<Vec<usize>>,
    /// Reverse edges: rev[v] = predecessors of v.
    pub rev: Vec<Vec<usize>>,
    /// Box dimensions per node, same order as the input node list.
    pub sizes: Vec<NodeSize>,
}

impl LayoutGraph {
    /// Build the adjacency view. Edges referencing unknown node ids and
    /// self-loops are ignored; duplicate edges are collapsed.
    pub fn from_graph(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i))
            .collect();

        let mut adj = vec![Vec::new(); nodes.len()];
        let mut rev = vec![Vec::new(); nodes.len()];

        for edge in edges {
            let (Some(&u), Some(&v)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) else {
                debug!("Edge {} references a missing node, ignored", edge.id);
                continue;
            };
            if u == v || adj[u].contains(&v) {
                continue;
            }
            adj[u].push(v);
            rev[v].push(u);
        }

        LayoutGraph {
            n: nodes.len(),
            adj,
            rev,
            sizes: nodes.iter().map(|node| node.size).collect(),
        }
    }
}

/// A replaceable node-placement strategy. Returns one CENTER coordinate
/// per node, in node-list order, deterministically for fixed inputs.
pub trait Placement {
    fn name(&self) -> &str;

    fn place(&self, graph: &LayoutGraph, spacing: &LayoutSpacing, direction: Direction)
        -> Vec<Point>;
}

/// Position a graph with the default layered strategy and spacing.
///
/// Returns a new vec with the same ids, order, and data; only `position`
/// is replaced (top-left origin, converted from the strategy's centers
/// using each node's own box size).
pub fn layout(nodes: &[GraphNode], edges: &[GraphEdge], direction: Direction) -> Vec<GraphNode> {
    layout_with(
        &LayeredPlacement,
        nodes,
        edges,
        &LayoutSpacing::default(),
        direction,
    )
}

/// Position a graph with an explicit strategy and spacing.
pub fn layout_with(
    strategy: &dyn Placement,
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    spacing: &LayoutSpacing,
    direction: Direction,
) -> Vec<GraphNode> {
    let graph = LayoutGraph::from_graph(nodes, edges);
    debug!(
        "Placing {} nodes with the {} strategy ({})",
        graph.n,
        strategy.name(),
        direction
    );
    let centers = strategy.place(&graph, spacing, direction);
    debug_assert_eq!(centers.len(), nodes.len());

    nodes
        .iter()
        .zip(centers)
        .map(|(node, center)| {
            let mut positioned = node.clone();
            positioned.position = Point {
                x: center.x - node.size.width / 2.0,
                y: center.y - node.size.height / 2.0,
            };
            positioned
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Finding, Severity};

    fn node(id: &str, severity: Severity) -> GraphNode {
        GraphNode::correlated(
            Finding {
                id: id.to_string(),
                title: format!("finding {id}"),
                source_tool: "scanner".to_string(),
                finding_category: Category::Sast,
                normalized_severity: severity,
                status: "OPEN".to_string(),
            },
            "g1".to_string(),
        )
    }

    fn edge(id: &str, source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            id: id.to_string(),
            kind: crate::graph::EdgeKind::Correlation,
            source: source.to_string(),
            target: target.to_string(),
            data: crate::graph::EdgeData {
                relationship_type: "same-sink".to_string(),
                confidence: None,
            },
        }
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("lr".parse::<Direction>().unwrap(), Direction::LR);
        assert_eq!("TB".parse::<Direction>().unwrap(), Direction::TB);
        assert!("RL".parse::<Direction>().is_err());
    }

    #[test]
    fn edges_with_missing_endpoints_are_ignored() {
        let nodes = vec![node("a", Severity::High)];
        let edges = vec![edge("r1", "a", "ghost"), edge("r2", "ghost", "a")];
        let graph = LayoutGraph::from_graph(&nodes, &edges);
        assert!(graph.adj[0].is_empty());
        assert!(graph.rev[0].is_empty());
        // And the layout step still positions the node.
        let positioned = layout(&nodes, &edges, Direction::LR);
        assert_eq!(positioned.len(), 1);
    }

    #[test]
    fn self_loops_and_duplicate_edges_are_collapsed() {
        let nodes = vec![node("a", Severity::High), node("b", Severity::High)];
        let edges = vec![
            edge("r1", "a", "a"),
            edge("r2", "a", "b"),
            edge("r3", "a", "b"),
        ];
        let graph = LayoutGraph::from_graph(&nodes, &edges);
        assert_eq!(graph.adj[0], vec![1]);
        assert_eq!(graph.rev[1], vec![0]);
    }

    #[test]
    fn layout_preserves_ids_order_and_data() {
        let nodes = vec![node("a", Severity::Critical), node("b", Severity::Info)];
        let edges = vec![edge("r1", "a", "b")];
        let positioned = layout(&nodes, &edges, Direction::LR);
        let ids: Vec<&str> = positioned.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(positioned[0].size, nodes[0].size);
        assert_eq!(
            positioned[0].data.chain_group_id,
            nodes[0].data.chain_group_id
        );
    }

    #[test]
    fn a_two_node_chain_lands_on_the_spacing_grid() {
        // LR: A(220×80) → B(140×48). Rank 0 holds A, rank 1 holds B.
        let nodes = vec![node("a", Severity::Critical), node("b", Severity::Info)];
        let edges = vec![edge("r1", "a", "b")];
        let positioned = layout(&nodes, &edges, Direction::LR);

        // A's top-left sits on the margin.
        assert_eq!(positioned[0].position.x, 20.0);
        assert_eq!(positioned[0].position.y, 20.0);
        // B starts one rank over: margin + A's width + rank separation.
        assert_eq!(positioned[1].position.x, 20.0 + 220.0 + 80.0);
        // Both centers share the cross axis.
        let center_a = positioned[0].position.y + 40.0;
        let center_b = positioned[1].position.y + 24.0;
        assert_eq!(center_a, center_b);
    }

    #[test]
    fn same_rank_nodes_respect_node_separation() {
        // Two isolated Medium nodes (180×64) both land in rank 0.
        let nodes = vec![node("a", Severity::Medium), node("b", Severity::Medium)];
        let positioned = layout(&nodes, &[], Direction::LR);
        assert_eq!(positioned[0].position.y, 20.0);
        assert_eq!(positioned[1].position.y, 20.0 + 64.0 + 50.0);
        // Same rank, same main-axis coordinate.
        assert_eq!(positioned[0].position.x, positioned[1].position.x);
    }

    #[test]
    fn layout_is_deterministic() {
        let nodes = vec![
            node("a", Severity::Critical),
            node("b", Severity::High),
            node("c", Severity::Medium),
            node("d", Severity::Low),
        ];
        let edges = vec![
            edge("r1", "a", "b"),
            edge("r2", "a", "c"),
            edge("r3", "b", "d"),
            edge("r4", "c", "d"),
        ];
        let first = layout(&nodes, &edges, Direction::TB);
        let second = layout(&nodes, &edges, Direction::TB);
        for (x, y) in first.iter().zip(&second) {
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn direction_changes_positions_but_not_membership() {
        let nodes = vec![
            node("a", Severity::Critical),
            node("b", Severity::High),
            node("c", Severity::Medium),
        ];
        let edges = vec![edge("r1", "a", "b"), edge("r2", "b", "c")];
        let lr = layout(&nodes, &edges, Direction::LR);
        let tb = layout(&nodes, &edges, Direction::TB);

        let lr_ids: Vec<&str> = lr.iter().map(|n| n.id.as_str()).collect();
        let tb_ids: Vec<&str> = tb.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(lr_ids, tb_ids);
        // In LR ranks advance along x; in TB along y.
        assert!(lr[2].position.x > lr[0].position.x);
        assert!(tb[2].position.y > tb[0].position.y);
    }
}
