use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// attackmap configuration (loaded from .attackmap.toml)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AttackmapConfig {
    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilterConfig {
    /// Minimum risk score (1-5) applied when the CLI does not set one
    #[serde(default)]
    pub min_risk_score: Option<u8>,

    /// Categories to keep (empty = all)
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LayoutConfig {
    /// Default layout direction: "LR" or "TB"
    #[serde(default)]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format: "terminal" or "json"
    #[serde(default)]
    pub format: Option<String>,
}

impl AttackmapConfig {
    /// Try to load .attackmap.toml from the given directory or its parents
    pub fn load(start: &Path) -> Option<Self> {
        let config_path = find_config_file(start)?;
        debug!("Found config: {}", config_path.display());

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str::<AttackmapConfig>(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", config_path.display(), e);
                    None
                }
            },
            Err(e) => {
                debug!("Could not read {}: {}", config_path.display(), e);
                None
            }
        }
    }
}

/// Walk up from the start directory to find .attackmap.toml
fn find_config_file(start: &Path) -> Option<std::path::PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let config = current.join(".attackmap.toml");
        if config.exists() {
            return Some(config);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Create a default .attackmap.toml in the current directory
pub fn init_config() -> Result<()> {
    let config_path = std::env::current_dir()?.join(".attackmap.toml");

    if config_path.exists() {
        println!("⚠️  .attackmap.toml already exists in this directory");
        return Ok(());
    }

    let default_config = r#"# attackmap configuration

[filter]
# Minimum risk score (1-5). Chains whose max severity ranks below this
# are dropped entirely; uncorrelated findings are checked individually.
# min_risk_score = 3

# Categories to keep (empty = all): "SAST", "SCA", "DAST"
categories = []

[layout]
# Layout direction: "LR" (left to right) or "TB" (top to bottom)
direction = "LR"

[output]
# Default output format: "terminal" or "json"
format = "terminal"
"#;

    std::fs::write(&config_path, default_config)?;
    println!("✅ Created .attackmap.toml");
    println!("   Edit it to customize your filter and layout defaults.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_all_sections() {
        let toml = r#"
            [filter]
            min_risk_score = 4
            categories = ["SAST", "SCA"]

            [layout]
            direction = "TB"

            [output]
            format = "json"
        "#;
        let config: AttackmapConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.filter.min_risk_score, Some(4));
        assert_eq!(config.filter.categories, vec!["SAST", "SCA"]);
        assert_eq!(config.layout.direction.as_deref(), Some("TB"));
        assert_eq!(config.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn empty_config_defaults_everything() {
        let config: AttackmapConfig = toml::from_str("").unwrap();
        assert!(config.filter.min_risk_score.is_none());
        assert!(config.filter.categories.is_empty());
        assert!(config.layout.direction.is_none());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn load_walks_up_to_find_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(".attackmap.toml"),
            "[filter]\nmin_risk_score = 2\n",
        )
        .unwrap();

        let config = AttackmapConfig::load(&nested).unwrap();
        assert_eq!(config.filter.min_risk_score, Some(2));
    }
}
