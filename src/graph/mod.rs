pub mod builder;

use serde::Serialize;

use crate::model::{Confidence, CorrelationRelationship, Finding, Severity};

/// A 2-D coordinate. For positioned nodes this is the TOP-LEFT corner
/// of the node's box, ready for a rendering surface to draw.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Box dimensions of a node, derived from severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

impl NodeSize {
    /// Fixed severity → size table: more severe findings draw larger.
    pub fn for_severity(severity: Severity) -> Self {
        let (width, height) = match severity {
            Severity::Critical => (220.0, 80.0),
            Severity::High => (200.0, 72.0),
            Severity::Medium => (180.0, 64.0),
            Severity::Low => (160.0, 56.0),
            Severity::Info => (140.0, 48.0),
            Severity::Unknown => (180.0, 64.0),
        };
        NodeSize { width, height }
    }
}

impl Default for NodeSize {
    fn default() -> Self {
        NodeSize {
            width: 180.0,
            height: 64.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Finding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Correlation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub finding: Finding,
    pub is_uncorrelated: bool,
    pub chain_group_id: Option<String>,
}

/// One drawable finding node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// The finding id.
    pub id: String,
    pub kind: NodeKind,
    pub data: NodeData,
    pub size: NodeSize,
    /// `{0, 0}` until the layout step assigns real coordinates.
    pub position: Point,
}

impl GraphNode {
    /// Node for a chain member.
    pub fn correlated(finding: Finding, chain_group_id: String) -> Self {
        let size = NodeSize::for_severity(finding.normalized_severity);
        GraphNode {
            id: finding.id.clone(),
            kind: NodeKind::Finding,
            data: NodeData {
                finding,
                is_uncorrelated: false,
                chain_group_id: Some(chain_group_id),
            },
            size,
            position: Point::default(),
        }
    }

    /// Node for a finding outside every chain.
    pub fn uncorrelated(finding: Finding) -> Self {
        let size = NodeSize::for_severity(finding.normalized_severity);
        GraphNode {
            id: finding.id.clone(),
            kind: NodeKind::Finding,
            data: NodeData {
                finding,
                is_uncorrelated: true,
                chain_group_id: None,
            },
            size,
            position: Point::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub relationship_type: String,
    pub confidence: Option<Confidence>,
}

/// One drawable correlation edge between two finding nodes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// The relationship id.
    pub id: String,
    pub kind: EdgeKind,
    pub source: String,
    pub target: String,
    pub data: EdgeData,
}

impl GraphEdge {
    pub fn from_relationship(rel: &CorrelationRelationship) -> Self {
        GraphEdge {
            id: rel.id.clone(),
            kind: EdgeKind::Correlation,
            source: rel.source_finding_id.clone(),
            target: rel.target_finding_id.clone(),
            data: EdgeData {
                relationship_type: rel.relationship_type.clone(),
                confidence: rel.confidence,
            },
        }
    }
}

/// An unpositioned (or positioned) node/edge graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorrelationGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_sizes_follow_the_severity_table() {
        let critical = NodeSize::for_severity(Severity::Critical);
        assert_eq!((critical.width, critical.height), (220.0, 80.0));
        let info = NodeSize::for_severity(Severity::Info);
        assert_eq!((info.width, info.height), (140.0, 48.0));
        // Unrecognized severities get the default box.
        let unknown = NodeSize::for_severity(Severity::Unknown);
        assert_eq!((unknown.width, unknown.height), (180.0, 64.0));
        assert_eq!(NodeSize::default(), unknown);
    }

    #[test]
    fn nodes_serialize_with_camel_case_keys() {
        let finding = Finding {
            id: "f1".into(),
            title: "t".into(),
            source_tool: "semgrep".into(),
            finding_category: crate::model::Category::Sast,
            normalized_severity: Severity::High,
            status: "OPEN".into(),
        };
        let node = GraphNode::correlated(finding, "g1".into());
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "finding");
        assert_eq!(json["data"]["isUncorrelated"], false);
        assert_eq!(json["data"]["chainGroupId"], "g1");
        assert_eq!(json["size"]["width"], 200.0);
        assert_eq!(json["position"]["x"], 0.0);
    }
}
