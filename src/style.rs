use owo_colors::OwoColorize;
use serde::Serialize;

use crate::model::{Category, Confidence, Severity};

/// Accent color keyed by finding category.
pub fn accent_color(category: Category) -> &'static str {
    match category {
        Category::Sast => "blue",
        Category::Sca => "purple",
        Category::Dast => "teal",
        Category::Unknown => "gray",
    }
}

/// Badge color keyed by severity.
pub fn badge_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "red",
        Severity::High => "orange",
        Severity::Medium => "yellow",
        Severity::Low => "blue",
        Severity::Info => "gray",
        Severity::Unknown => "gray",
    }
}

/// Edge stroke pattern keyed by relationship confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Dash array for the rendering surface; `None` means a solid line.
    pub fn dash_array(self) -> Option<[f64; 2]> {
        match self {
            StrokeStyle::Solid => None,
            StrokeStyle::Dashed => Some([5.0, 5.0]),
            StrokeStyle::Dotted => Some([2.0, 3.0]),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrokeStyle::Solid => "solid",
            StrokeStyle::Dashed => "dashed",
            StrokeStyle::Dotted => "dotted",
        }
    }
}

/// Stroke for a relationship's confidence; absent or unrecognized
/// confidence draws the least-trusted (dotted) pattern.
pub fn stroke_for_confidence(confidence: Option<Confidence>) -> StrokeStyle {
    match confidence {
        Some(Confidence::High) => StrokeStyle::Solid,
        Some(Confidence::Medium) => StrokeStyle::Dashed,
        Some(Confidence::Low) | Some(Confidence::Unknown) | None => StrokeStyle::Dotted,
    }
}

// ── Legend (shipped to the rendering surface in JSON reports) ────────

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub key: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeEntry {
    pub key: &'static str,
    pub style: StrokeStyle,
    pub dash_array: Option<[f64; 2]>,
}

/// The complete visual-attribute tables as data, so a rendering surface
/// does not have to duplicate them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub category_accents: Vec<LegendEntry>,
    pub severity_badges: Vec<LegendEntry>,
    pub confidence_strokes: Vec<StrokeEntry>,
}

const CATEGORIES: [Category; 3] = [Category::Sast, Category::Sca, Category::Dast];
const SEVERITIES: [Severity; 5] = [
    Severity::Critical,
    Severity::High,
    Severity::Medium,
    Severity::Low,
    Severity::Info,
];
const CONFIDENCES: [Confidence; 3] = [Confidence::High, Confidence::Medium, Confidence::Low];

impl Default for Legend {
    fn default() -> Self {
        let mut confidence_strokes: Vec<StrokeEntry> = CONFIDENCES
            .iter()
            .map(|&c| {
                let style = stroke_for_confidence(Some(c));
                StrokeEntry {
                    key: c.as_str(),
                    style,
                    dash_array: style.dash_array(),
                }
            })
            .collect();
        let fallback = stroke_for_confidence(None);
        confidence_strokes.push(StrokeEntry {
            key: "default",
            style: fallback,
            dash_array: fallback.dash_array(),
        });

        Legend {
            category_accents: CATEGORIES
                .iter()
                .map(|&c| LegendEntry {
                    key: c.as_str(),
                    value: accent_color(c),
                })
                .collect(),
            severity_badges: SEVERITIES
                .iter()
                .map(|&s| LegendEntry {
                    key: s.as_str(),
                    value: badge_color(s),
                })
                .collect(),
            confidence_strokes,
        }
    }
}

/// Print the visual-attribute tables to the terminal.
pub fn list_styles() {
    println!();
    println!("🗺  attackmap — Visual attribute tables");
    println!("{}", "━".repeat(55));
    println!();

    println!("  {} Category accents", "🎨".bold());
    for &category in &CATEGORIES {
        println!("     {:8} → {}", category.as_str(), accent_color(category));
    }
    println!();

    println!("  {} Severity badges", "🚩".bold());
    for &severity in &SEVERITIES {
        println!("     {:8} → {}", severity.as_str(), badge_color(severity));
    }
    println!();

    println!("  {} Confidence strokes", "🖊".bold());
    for &confidence in &CONFIDENCES {
        let style = stroke_for_confidence(Some(confidence));
        println!("     {:8} → {}", confidence.as_str(), style.as_str());
    }
    println!(
        "     {:8} → {}",
        "default",
        stroke_for_confidence(None).as_str()
    );
    println!();
    println!("{}", "━".repeat(55));
    println!();
}
