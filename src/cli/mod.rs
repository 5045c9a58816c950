//! upornot Command Line Interface.
//!
//! Glue between configuration, the probe client, the classifier and the
//! output formatter.

pub mod config;
pub mod output;

pub use config::*;
pub use output::*;

use tracing::warn;

use crate::health::HealthClassifier;
#[cfg(feature = "client")]
use crate::probe::HttpProbeFetcher;
use crate::probe::ProbeOutcome;
use crate::telemetry::TelemetryRecord;

// ═══════════════════════════════════════════════════════════════════════════════
// CLI APPLICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// CLI Application state
#[derive(Debug)]
pub struct CliApp {
    /// Configuration
    config: CliConfig,
    /// Output formatter
    output: OutputFormatter,
    /// Classifier built from the configured thresholds
    classifier: HealthClassifier,
    /// Verbose mode
    verbose: bool,
}

impl CliApp {
    /// Create new CLI application
    pub fn new(config: CliConfig) -> CliResult<Self> {
        config.validate().map_err(|e| CliError::Config(e.to_string()))?;

        let classifier = HealthClassifier::new(config.thresholds.clone())
            .map_err(|e| CliError::Config(e.to_string()))?;

        let mut output = OutputFormatter::new(config.format);
        if !config.glyphs {
            output = output.without_glyphs();
        }

        Ok(Self {
            config,
            output,
            classifier,
            verbose: false,
        })
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Get configuration
    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Get output formatter
    pub fn output(&self) -> &OutputFormatter {
        &self.output
    }

    /// Check if verbose
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Turn a fetch outcome into a report.
    ///
    /// Records the classifier rejects are reported as unknown, with the
    /// reason below the divider, exactly like an unreachable server.
    pub fn report(&self, outcome: ProbeOutcome) -> StatusReport {
        match outcome {
            ProbeOutcome::Telemetry(record) => self
                .classify_record(&record)
                .unwrap_or_else(|e| StatusReport::unknown(e.to_string())),
            ProbeOutcome::Unknown(reason) => {
                warn!(%reason, "no telemetry from probe server");
                StatusReport::unknown(reason)
            }
        }
    }

    /// Classify one record
    pub fn classify_record(&self, record: &TelemetryRecord) -> CliResult<StatusReport> {
        if let Err(e) = record.validate() {
            warn!(error = %e, "telemetry record is inconsistent");
        }

        self.classifier
            .classify(record)
            .map(|classification| StatusReport::classified(&classification))
            .map_err(|e| CliError::InvalidTelemetry(e.to_string()))
    }

    /// Fetch, classify and report the configured target
    #[cfg(feature = "client")]
    pub async fn status(&self) -> CliResult<StatusReport> {
        let target = self
            .config
            .target()
            .map_err(|e| CliError::Config(e.to_string()))?;
        let fetcher = self.fetcher()?;

        Ok(self.report(fetcher.fetch(&target).await))
    }

    /// List the targets exposed by the configured server
    #[cfg(feature = "client")]
    pub async fn targets(&self) -> CliResult<Vec<String>> {
        let target = self
            .config
            .target()
            .map_err(|e| CliError::Config(e.to_string()))?;

        self.fetcher()?
            .fetch_targets(&target)
            .await
            .map_err(|e| CliError::Connection(e.to_string()))
    }

    #[cfg(feature = "client")]
    fn fetcher(&self) -> CliResult<HttpProbeFetcher> {
        HttpProbeFetcher::new(self.config.fetcher_config())
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLI RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// CLI Error types
#[derive(Debug, Clone)]
pub enum CliError {
    /// Configuration error
    Config(String),
    /// Connection error
    Connection(String),
    /// Telemetry the classifier cannot use
    InvalidTelemetry(String),
    /// IO error
    Io(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Connection(msg) => write!(f, "Connection error: {}", msg),
            CliError::InvalidTelemetry(msg) => write!(f, "{}", msg),
            CliError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

/// CLI Result type
pub type CliResult<T> = Result<T, CliError>;

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
