//! HTTP telemetry fetcher.
//!
//! Fetches one [`TelemetryRecord`] from an up-or-not server. Every call is
//! independent: there are no retries, since the plugin host re-runs the
//! program on its own schedule.

#[cfg(feature = "client")]
use reqwest::{header, Client};
#[cfg(feature = "client")]
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(feature = "client")]
use std::time::{Duration, Instant};
#[cfg(feature = "client")]
use tracing::{debug, info};

#[cfg(feature = "client")]
use crate::error::Error;
use crate::error::Result;
#[cfg(feature = "client")]
use crate::probe::target::ProbeTarget;
use crate::telemetry::TelemetryRecord;
use crate::utils::constants::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS, USER_AGENT};
use crate::utils::validation::validate_timeout;

// ═══════════════════════════════════════════════════════════════════════════════
// FETCHER CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpFetcherConfig {
    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpFetcherConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_timeout(self.connect_timeout_ms, "connect_timeout_ms")?;
        validate_timeout(self.timeout_ms, "timeout_ms")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROBE OUTCOME
// ═══════════════════════════════════════════════════════════════════════════════

/// What one fetch produced
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// A decoded record, ready for the classifier
    Telemetry(TelemetryRecord),
    /// No usable response; carries the status code or error text
    Unknown(String),
}

impl ProbeOutcome {
    /// Fold a fetch result into an outcome
    pub fn from_result(result: Result<TelemetryRecord>) -> Self {
        match result {
            Ok(record) => ProbeOutcome::Telemetry(record),
            Err(e) => ProbeOutcome::Unknown(e.to_string()),
        }
    }

    /// Check if the fetch produced a record
    pub fn is_telemetry(&self) -> bool {
        matches!(self, ProbeOutcome::Telemetry(_))
    }
}

/// Body of the server's target listing
#[cfg(feature = "client")]
#[derive(Debug, Clone, Deserialize)]
struct TargetsResponse {
    // The server sends null when it probes nothing.
    #[serde(default)]
    targets: Option<Vec<String>>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP PROBE FETCHER
// ═══════════════════════════════════════════════════════════════════════════════

/// HTTP-based telemetry fetcher
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct HttpProbeFetcher {
    /// HTTP client
    client: Client,
    /// Configuration
    config: HttpFetcherConfig,
}

#[cfg(feature = "client")]
impl HttpProbeFetcher {
    /// Create a new fetcher
    pub fn new(config: HttpFetcherConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpFetcherConfig::default())
    }

    /// Get configuration
    pub fn config(&self) -> &HttpFetcherConfig {
        &self.config
    }

    /// Fetch telemetry, folding every failure into [`ProbeOutcome::Unknown`]
    pub async fn fetch(&self, target: &ProbeTarget) -> ProbeOutcome {
        ProbeOutcome::from_result(self.fetch_record(target).await)
    }

    /// Fetch and decode one telemetry record
    pub async fn fetch_record(&self, target: &ProbeTarget) -> Result<TelemetryRecord> {
        self.get_json(target).await
    }

    /// List the target paths the server is probing
    pub async fn fetch_targets(&self, target: &ProbeTarget) -> Result<Vec<String>> {
        let listing: TargetsResponse = self.get_json(&target.targets()).await?;
        Ok(listing.targets.unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, target: &ProbeTarget) -> Result<T> {
        let url = target.request_url();
        debug!(%target, %url, "requesting probe server");

        let started = Instant::now();
        let mut request = self.client.get(url);
        if let Some(host) = target.host_header() {
            request = request.header(header::HOST, host);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            info!(status = status.as_u16(), "probe server returned an error status");
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "probe server responded"
        );

        Ok(serde_json::from_str(&body)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
