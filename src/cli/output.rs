//! CLI Output Formatting.
//!
//! Renders a status report for the plugin host (xbar / BitBar) or as JSON.

use serde::{Deserialize, Serialize};

use crate::health::{Classification, HealthColor};
use crate::utils::constants::{DIVIDER, UNKNOWN_GLYPH};

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Status line, divider, detail lines
    #[default]
    Xbar,
    /// JSON format
    Json,
    /// Pretty JSON format
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xbar" | "bitbar" | "text" | "txt" => Ok(OutputFormat::Xbar),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Ok(OutputFormat::JsonPretty),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Xbar => "xbar",
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
        };
        write!(f, "{}", name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATUS REPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Status shown in the bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Classified green
    Green,
    /// Classified yellow
    Yellow,
    /// Classified red
    Red,
    /// No telemetry could be obtained or classified
    Unknown,
}

impl ReportStatus {
    /// Get the status-bar glyph
    pub fn glyph(&self) -> &'static str {
        match self {
            ReportStatus::Green => HealthColor::Green.glyph(),
            ReportStatus::Yellow => HealthColor::Yellow.glyph(),
            ReportStatus::Red => HealthColor::Red.glyph(),
            ReportStatus::Unknown => UNKNOWN_GLYPH,
        }
    }

    /// Get the lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            ReportStatus::Green => HealthColor::Green.name(),
            ReportStatus::Yellow => HealthColor::Yellow.name(),
            ReportStatus::Red => HealthColor::Red.name(),
            ReportStatus::Unknown => "unknown",
        }
    }
}

impl From<HealthColor> for ReportStatus {
    fn from(color: HealthColor) -> Self {
        match color {
            HealthColor::Green => ReportStatus::Green,
            HealthColor::Yellow => ReportStatus::Yellow,
            HealthColor::Red => ReportStatus::Red,
        }
    }
}

/// Everything needed to print one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Status
    pub status: ReportStatus,
    /// Verdict label; none for green and unknown
    pub label: Option<String>,
    /// Lines below the divider
    pub detail: Vec<String>,
}

impl StatusReport {
    /// Report for a classified record
    pub fn classified(classification: &Classification) -> Self {
        Self {
            status: classification.verdict.color().into(),
            label: classification.verdict.label().map(str::to_string),
            detail: classification.detail.lines().to_vec(),
        }
    }

    /// Report for a run that produced no verdict; `reason` goes below the divider
    pub fn unknown(reason: impl AsRef<str>) -> Self {
        Self {
            status: ReportStatus::Unknown,
            label: None,
            detail: reason.as_ref().lines().map(str::to_string).collect(),
        }
    }

    /// Status line using emoji glyphs or color names
    pub fn status_line(&self, glyphs: bool) -> String {
        let marker = if glyphs { self.status.glyph() } else { self.status.name() };
        match &self.label {
            Some(label) => format!("{} {}", marker, label),
            None => marker.to_string(),
        }
    }

    /// Check if the report carries a verdict
    pub fn is_known(&self) -> bool {
        self.status != ReportStatus::Unknown
    }
}

impl From<&Classification> for StatusReport {
    fn from(classification: &Classification) -> Self {
        Self::classified(classification)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT FORMATTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Output formatter for CLI
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    /// Output format
    format: OutputFormat,
    /// Emoji glyphs enabled
    glyphs: bool,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

impl OutputFormatter {
    /// Create new formatter
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            glyphs: true,
        }
    }

    /// Use color names instead of emoji
    pub fn without_glyphs(mut self) -> Self {
        self.glyphs = false;
        self
    }

    /// Get format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a status report
    pub fn render(&self, report: &StatusReport) -> String {
        match self.format {
            OutputFormat::Xbar => {
                let mut lines = Vec::with_capacity(report.detail.len() + 2);
                lines.push(report.status_line(self.glyphs));
                lines.push(DIVIDER.to_string());
                lines.extend(report.detail.iter().cloned());
                lines.join("\n")
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = serde_json::json!({
                    "status": report.status,
                    "label": report.label,
                    "line": report.status_line(self.glyphs),
                    "detail": report.detail,
                });
                self.to_json(&json)
            }
        }
    }

    /// Render the server's target listing
    pub fn render_targets(&self, targets: &[String]) -> String {
        match self.format {
            OutputFormat::Xbar => targets.join("\n"),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.to_json(&serde_json::json!({ "targets": targets }))
            }
        }
    }

    /// Serialize JSON data
    fn to_json<T: Serialize>(&self, data: &T) -> String {
        let output = if matches!(self.format, OutputFormat::JsonPretty) {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };

        output.unwrap_or_default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
