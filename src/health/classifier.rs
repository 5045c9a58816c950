//! Connection health classifier.
//!
//! Turns one [`TelemetryRecord`] into a red/yellow/green [`Verdict`]. Rules
//! are checked in a fixed order and the first one that matches wins:
//!
//! 1. no responses at all: red `offline`
//! 2. packet loss, judged by the integer ratio `count / missing`
//! 3. average round-trip time above the laggy threshold
//! 4. too few probes in the fastest buckets, counting half of the
//!    second-fastest bucket as fast
//! 5. otherwise green
//!
//! Every division is truncating integer division. Small windows therefore
//! hit the thresholds in coarse steps, e.g. 25 of 50 missing is ratio 2 and
//! not red.

use serde::{Deserialize, Serialize};

use super::verdict::{Classification, DetailText, Verdict};
use crate::error::{Error, Result};
use crate::telemetry::TelemetryRecord;
use crate::utils::constants::*;
use crate::utils::format::{format_float, format_number, format_whole_ms};

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFIER CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Thresholds used by the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Loss ratio below which the verdict is red
    pub red_loss_ratio: u64,
    /// Loss ratio below which the verdict is yellow
    pub yellow_loss_ratio: u64,
    /// Average latency (ms) above which the verdict is yellow
    pub laggy_avg_ms: f64,
    /// The second-fastest bucket counts as fast after dividing by this
    pub next_bucket_divisor: u64,
    /// Numerator of the required fast share
    pub fast_share_numerator: u64,
    /// Denominator of the required fast share
    pub fast_share_denominator: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            red_loss_ratio: RED_LOSS_RATIO,
            yellow_loss_ratio: YELLOW_LOSS_RATIO,
            laggy_avg_ms: LAGGY_AVG_MS,
            next_bucket_divisor: NEXT_BUCKET_DIVISOR,
            fast_share_numerator: FAST_SHARE_NUMERATOR,
            fast_share_denominator: FAST_SHARE_DENOMINATOR,
        }
    }
}

impl ClassifierConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.next_bucket_divisor == 0 {
            return Err(Error::InvalidParameter {
                name: "next_bucket_divisor".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.fast_share_denominator == 0 {
            return Err(Error::InvalidParameter {
                name: "fast_share_denominator".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.red_loss_ratio > self.yellow_loss_ratio {
            return Err(Error::InvalidParameter {
                name: "red_loss_ratio".into(),
                reason: format!(
                    "{} exceeds yellow_loss_ratio {}",
                    self.red_loss_ratio, self.yellow_loss_ratio
                ),
            });
        }

        if !self.laggy_avg_ms.is_finite() {
            return Err(Error::InvalidParameter {
                name: "laggy_avg_ms".into(),
                reason: "must be a finite number".into(),
            });
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH CLASSIFIER
// ═══════════════════════════════════════════════════════════════════════════════

/// Classifies telemetry records. Holds no state besides its thresholds.
#[derive(Debug, Clone, Default)]
pub struct HealthClassifier {
    config: ClassifierConfig,
}

impl HealthClassifier {
    /// Create a classifier with custom thresholds
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Compute the verdict and the detail block
    pub fn classify(&self, record: &TelemetryRecord) -> Result<Classification> {
        Ok(Classification {
            verdict: self.score(record)?,
            detail: self.summarize(record),
        })
    }

    /// Compute the verdict only
    pub fn score(&self, record: &TelemetryRecord) -> Result<Verdict> {
        if record.ok_count == 0 {
            return Ok(Verdict::Red("offline".into()));
        }

        Self::check_preconditions(record)?;

        let missing = record.total_count - record.ok_count;
        if missing > 0 {
            let ratio = record.total_count / missing;
            if ratio < self.config.red_loss_ratio {
                return Ok(Verdict::Red("lossy".into()));
            } else if ratio < self.config.yellow_loss_ratio {
                return Ok(Verdict::Yellow("lossy".into()));
            }
        }

        if record.average_latency_ms > self.config.laggy_avg_ms {
            return Ok(Verdict::Yellow(format!(
                "laggy {}ms",
                format_whole_ms(record.average_latency_ms)
            )));
        }

        let fast = record.latency_buckets[0].count;
        let not_too_slow = record.latency_buckets[1].count;
        let weighted = fast.saturating_add(not_too_slow / self.config.next_bucket_divisor);
        let limit = self
            .config
            .fast_share_numerator
            .saturating_mul(record.total_count)
            / self.config.fast_share_denominator;
        if weighted < limit {
            return Ok(Verdict::Yellow(format!("slow ({}/{})", weighted, limit)));
        }

        Ok(Verdict::Green)
    }

    /// Render the detail block. Never fails, even for malformed records.
    pub fn summarize(&self, record: &TelemetryRecord) -> DetailText {
        let mut lines = Vec::with_capacity(2 + record.latency_buckets.len());
        lines.push(format!("ok: {}/{}", record.ok_count, record.total_count));
        let average = if record.average_has_point() {
            format_float(record.average_latency_ms)
        } else {
            format_number(record.average_latency_ms)
        };
        lines.push(format!("avg: {} ms", average));

        for bucket in &record.latency_buckets {
            let label = match bucket.upper_bound_ms {
                Some(bound) => format!("{} ms", format_number(bound)),
                None => "slower".to_string(),
            };
            lines.push(format!("{}: {}", label, bucket.count));
        }

        DetailText::new(lines)
    }

    /// Checks the record shape the loss and bucket rules depend on
    fn check_preconditions(record: &TelemetryRecord) -> Result<()> {
        if record.ok_count > record.total_count {
            return Err(Error::OkExceedsTotal {
                ok: record.ok_count,
                total: record.total_count,
            });
        }

        if record.latency_buckets.len() < MIN_BUCKETS {
            return Err(Error::InsufficientBuckets {
                got: record.latency_buckets.len(),
                need: MIN_BUCKETS,
            });
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEFAULT-THRESHOLD SHORTCUTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Classify a record with the default thresholds
pub fn classify(record: &TelemetryRecord) -> Result<Classification> {
    HealthClassifier::default().classify(record)
}

/// Score a record with the default thresholds
pub fn score(record: &TelemetryRecord) -> Result<Verdict> {
    HealthClassifier::default().score(record)
}

/// Summarize a record
pub fn summarize(record: &TelemetryRecord) -> DetailText {
    HealthClassifier::default().summarize(record)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
