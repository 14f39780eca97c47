use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalized severity of a security finding.
///
/// Variants are declared in ascending rank order so that `Ord` agrees
/// with [`Severity::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Severity {
    /// Anything the upstream normalizer did not recognize.
    Unknown,
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Lenient parse used for document deserialization: unrecognized
    /// values fall back to `Unknown` instead of failing the load.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            "INFO" => Severity::Info,
            _ => Severity::Unknown,
        }
    }

    /// Integer severity ordinal used for threshold comparisons
    /// (Critical=5 … Info=1, unrecognized=0).
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 5,
            Severity::High => 4,
            Severity::Medium => 3,
            Severity::Low => 2,
            Severity::Info => 1,
            Severity::Unknown => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
            Severity::Unknown => "Unknown",
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        Severity::parse(&s)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which kind of scanner produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Category {
    Sast,
    Sca,
    Dast,
    Unknown,
}

impl Category {
    /// Lenient parse for document deserialization.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "SAST" => Category::Sast,
            "SCA" => Category::Sca,
            "DAST" => Category::Dast,
            _ => Category::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Sast => "SAST",
            Category::Sca => "SCA",
            Category::Dast => "DAST",
            Category::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::parse(&s)
    }
}

#[derive(Debug, Error)]
#[error("unknown category '{0}' (expected SAST, SCA, or DAST)")]
pub struct ParseCategoryError(String);

/// Strict parse used for CLI flags and config values, where a typo
/// should be reported rather than silently matching nothing.
impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Category::parse(s) {
            Category::Unknown => Err(ParseCategoryError(s.to_string())),
            known => Ok(known),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trust level attached to a correlation relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Confidence {
    Unknown,
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "HIGH" => Confidence::High,
            "MEDIUM" => Confidence::Medium,
            "LOW" => Confidence::Low,
            _ => Confidence::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
            Confidence::Unknown => "Unknown",
        }
    }
}

impl From<String> for Confidence {
    fn from(s: String) -> Self {
        Confidence::parse(&s)
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single security finding as reported by the upstream aggregation API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub source_tool: String,
    pub finding_category: Category,
    pub normalized_severity: Severity,
    pub status: String,
}

/// A directed correlation between two findings inside one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationRelationship {
    pub id: String,
    pub source_finding_id: String,
    pub target_finding_id: String,
    /// Free-form label ("same-sink", "reachable-dependency", …).
    pub relationship_type: String,
    #[serde(default)]
    pub confidence: Option<Confidence>,
}

/// A correlation group: findings the upstream correlation process judged
/// related, plus the relationships connecting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub group_id: String,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub relationships: Vec<CorrelationRelationship>,
    #[serde(default)]
    pub tool_coverage: Vec<String>,
    /// Single severity summarizing the chain (its worst member).
    pub max_severity: Severity,
    #[serde(default)]
    pub relationship_count: usize,
}

/// The attack-chain detail document for one application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackChainDetail {
    pub application_id: String,
    pub app_name: String,
    pub app_code: String,
    #[serde(default)]
    pub chains: Vec<Chain>,
    #[serde(default)]
    pub uncorrelated_findings: Vec<Finding>,
}

/// User-adjustable filter state for the graph builder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Filters {
    /// Inclusive lower bound (1–5) on severity rank.
    pub min_risk_score: Option<u8>,
    /// Categories to keep; empty means no restriction.
    pub categories: Vec<Category>,
}

impl Filters {
    /// Does a severity clear the minimum risk score?
    pub fn passes_min_risk(&self, severity: Severity) -> bool {
        self.min_risk_score
            .map_or(true, |min| severity.rank() >= min)
    }

    /// Is a category allowed by the active category set?
    pub fn allows_category(&self, category: Category) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }
}

// ── Document loading ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid attack-chain document {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load an attack-chain detail document from disk.
pub fn load_detail(path: &Path) -> Result<AttackChainDetail, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ranks_match_the_threshold_table() {
        assert_eq!(Severity::Critical.rank(), 5);
        assert_eq!(Severity::High.rank(), 4);
        assert_eq!(Severity::Medium.rank(), 3);
        assert_eq!(Severity::Low.rank(), 2);
        assert_eq!(Severity::Info.rank(), 1);
        assert_eq!(Severity::Unknown.rank(), 0);
        assert!(Severity::Critical > Severity::Info);
    }

    #[test]
    fn unrecognized_enum_values_fall_back_instead_of_failing() {
        assert_eq!(Severity::parse("Blocker"), Severity::Unknown);
        assert_eq!(Category::parse("IAST"), Category::Unknown);
        assert_eq!(Confidence::parse("Certain"), Confidence::Unknown);
    }

    #[test]
    fn strict_category_parse_rejects_unknown_values() {
        assert_eq!("sast".parse::<Category>().unwrap(), Category::Sast);
        assert_eq!("SCA".parse::<Category>().unwrap(), Category::Sca);
        assert!("iast".parse::<Category>().is_err());
    }

    #[test]
    fn detail_document_deserializes_from_camel_case_json() {
        let json = r#"{
            "applicationId": "app-1",
            "appName": "payments",
            "appCode": "PAY",
            "chains": [{
                "groupId": "g1",
                "findings": [{
                    "id": "f1",
                    "title": "SQL injection in checkout",
                    "sourceTool": "semgrep",
                    "findingCategory": "SAST",
                    "normalizedSeverity": "Critical",
                    "status": "OPEN"
                }],
                "relationships": [{
                    "id": "r1",
                    "sourceFindingId": "f1",
                    "targetFindingId": "f2",
                    "relationshipType": "same-sink",
                    "confidence": null
                }],
                "toolCoverage": ["semgrep"],
                "maxSeverity": "Critical",
                "relationshipCount": 1
            }],
            "uncorrelatedFindings": []
        }"#;

        let detail: AttackChainDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.app_code, "PAY");
        assert_eq!(detail.chains.len(), 1);
        let chain = &detail.chains[0];
        assert_eq!(chain.max_severity, Severity::Critical);
        assert_eq!(chain.findings[0].finding_category, Category::Sast);
        assert!(chain.relationships[0].confidence.is_none());
    }

    #[test]
    fn missing_list_fields_default_to_empty() {
        let json = r#"{
            "applicationId": "app-2",
            "appName": "intranet",
            "appCode": "INT"
        }"#;
        let detail: AttackChainDetail = serde_json::from_str(json).unwrap();
        assert!(detail.chains.is_empty());
        assert!(detail.uncorrelated_findings.is_empty());
    }

    #[test]
    fn filters_default_to_pass_through() {
        let filters = Filters::default();
        assert!(filters.passes_min_risk(Severity::Info));
        assert!(filters.allows_category(Category::Dast));

        let strict = Filters {
            min_risk_score: Some(4),
            categories: vec![Category::Sast],
        };
        assert!(strict.passes_min_risk(Severity::High));
        assert!(!strict.passes_min_risk(Severity::Medium));
        assert!(strict.allows_category(Category::Sast));
        assert!(!strict.allows_category(Category::Sca));
    }

    #[test]
    fn load_detail_reports_parse_errors_with_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        match load_detail(&path) {
            Err(DocumentError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
