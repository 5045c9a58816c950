//! Verdict and detail types produced by the classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::{GREEN_GLYPH, RED_GLYPH, YELLOW_GLYPH};

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH COLOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Traffic-light color of a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthColor {
    /// Connection is fine
    Green,
    /// Connection is usable but degraded
    Yellow,
    /// Connection is down or badly broken
    Red,
}

impl HealthColor {
    /// Get the status-bar glyph
    pub fn glyph(&self) -> &'static str {
        match self {
            HealthColor::Green => GREEN_GLYPH,
            HealthColor::Yellow => YELLOW_GLYPH,
            HealthColor::Red => RED_GLYPH,
        }
    }

    /// Get the lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            HealthColor::Green => "green",
            HealthColor::Yellow => "yellow",
            HealthColor::Red => "red",
        }
    }
}

impl fmt::Display for HealthColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VERDICT
// ═══════════════════════════════════════════════════════════════════════════════

/// Health verdict for one telemetry record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "label", rename_all = "lowercase")]
pub enum Verdict {
    /// Broken connection, with a reason
    Red(String),
    /// Degraded connection, with a reason
    Yellow(String),
    /// Healthy connection
    Green,
}

impl Verdict {
    /// Get the verdict color
    pub fn color(&self) -> HealthColor {
        match self {
            Verdict::Red(_) => HealthColor::Red,
            Verdict::Yellow(_) => HealthColor::Yellow,
            Verdict::Green => HealthColor::Green,
        }
    }

    /// Get the label; green verdicts carry none
    pub fn label(&self) -> Option<&str> {
        match self {
            Verdict::Red(label) | Verdict::Yellow(label) => Some(label),
            Verdict::Green => None,
        }
    }

    /// Check if the verdict is green
    pub fn is_healthy(&self) -> bool {
        matches!(self, Verdict::Green)
    }

    /// Render the status line with the given color marker
    pub fn status_line(&self, marker: &str) -> String {
        match self.label() {
            Some(label) => format!("{} {}", marker, label),
            None => marker.to_string(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_line(self.color().glyph()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETAIL TEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// Multi-line human-readable summary of a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailText {
    lines: Vec<String>,
}

impl DetailText {
    /// Create from lines
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Get the lines in display order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if there are no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for DetailText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Verdict plus detail for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Health verdict
    pub verdict: Verdict,
    /// Detail block
    pub detail: DetailText,
}

impl Classification {
    /// Split into verdict and detail
    pub fn into_parts(self) -> (Verdict, DetailText) {
        (self.verdict, self.detail)
    }
}
