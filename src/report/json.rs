use anyhow::Result;

use crate::report::RenderReport;

/// Render a report as pretty-printed JSON for a graph-rendering surface
pub fn render(report: &RenderReport) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CorrelationGraph;
    use crate::layout::Direction;
    use crate::model::{AttackChainDetail, Filters};
    use crate::report::GraphSummary;
    use crate::style::Legend;

    #[test]
    fn output_uses_the_rendering_surface_contract() {
        let detail = AttackChainDetail {
            application_id: "app-1".to_string(),
            app_name: "payments".to_string(),
            app_code: "PAY".to_string(),
            chains: vec![],
            uncorrelated_findings: vec![],
        };
        let graph = CorrelationGraph::default();
        let report = RenderReport {
            version: "0.1.0".to_string(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            source: "detail.json".into(),
            application_id: detail.application_id.clone(),
            app_name: detail.app_name.clone(),
            app_code: detail.app_code.clone(),
            direction: Direction::LR,
            digest: "0".repeat(16),
            duration_ms: 1,
            summary: GraphSummary::new(&detail, &Filters::default(), &graph),
            legend: Legend::default(),
            nodes: graph.nodes,
            edges: graph.edges,
        };

        let json = render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["appCode"], "PAY");
        assert_eq!(value["direction"], "LR");
        assert_eq!(value["summary"]["chainsTotal"], 0);
        assert!(value["legend"]["categoryAccents"].is_array());
        assert!(value["nodes"].as_array().unwrap().is_empty());
    }
}
