//! Telemetry record received from the probe server.
//!
//! One record is a snapshot of the server's recent ping window. It is decoded
//! from the JSON served at `/api/target/<ip>`:
//!
//! ```json
//! {"count": 50, "ok": 48, "avg_ms": 23.5,
//!  "buckets": [{"max_ms": 60, "count": 45}, {"max_ms": 100, "count": 3}, {"count": 0}]}
//! ```

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::utils::constants::MIN_BUCKETS;

// ═══════════════════════════════════════════════════════════════════════════════
// LATENCY BUCKET
// ═══════════════════════════════════════════════════════════════════════════════

/// One histogram bin of successful probe latencies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyBucket {
    /// Upper bound in milliseconds; `None` for the "slower" bin
    #[serde(rename = "max_ms", default, skip_serializing_if = "Option::is_none")]
    pub upper_bound_ms: Option<f64>,
    /// Probes that landed in this bin
    pub count: u64,
}

impl LatencyBucket {
    /// Create a bounded bucket
    pub fn bounded(upper_bound_ms: f64, count: u64) -> Self {
        Self {
            upper_bound_ms: Some(upper_bound_ms),
            count,
        }
    }

    /// Create the trailing "slower than everything" bucket
    pub fn slower(count: u64) -> Self {
        Self {
            upper_bound_ms: None,
            count,
        }
    }

    /// Check if this is the unbounded bucket
    pub fn is_unbounded(&self) -> bool {
        self.upper_bound_ms.is_none()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TELEMETRY RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// Ping statistics for one measurement window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireRecord")]
pub struct TelemetryRecord {
    /// Probes sent in the window
    #[serde(rename = "count")]
    pub total_count: u64,
    /// Probes that received a response
    #[serde(rename = "ok")]
    pub ok_count: u64,
    /// Mean round-trip time of successful probes
    #[serde(rename = "avg_ms", serialize_with = "serialize_average")]
    pub average_latency_ms: f64,
    /// Latency histogram, fastest bucket first
    #[serde(rename = "buckets")]
    pub latency_buckets: Vec<LatencyBucket>,
    /// A whole average arrived with a decimal point (`150.0` rather than `150`)
    #[serde(skip)]
    average_has_point: bool,
}

/// The record as it appears on the wire; keeps the average's JSON number
#[derive(Deserialize)]
struct WireRecord {
    count: u64,
    ok: u64,
    avg_ms: serde_json::Number,
    buckets: Vec<LatencyBucket>,
}

impl From<WireRecord> for TelemetryRecord {
    fn from(wire: WireRecord) -> Self {
        let average = wire.avg_ms.as_f64().unwrap_or(f64::NAN);
        Self {
            total_count: wire.count,
            ok_count: wire.ok,
            average_latency_ms: average,
            latency_buckets: wire.buckets,
            average_has_point: wire.avg_ms.is_f64() && average.fract() == 0.0,
        }
    }
}

/// Whole averages go out as integers, the way the probe server writes them
fn serialize_average<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl TelemetryRecord {
    /// Create a record with no buckets
    pub fn new(total_count: u64, ok_count: u64, average_latency_ms: f64) -> Self {
        Self {
            total_count,
            ok_count,
            average_latency_ms,
            latency_buckets: Vec::new(),
            average_has_point: false,
        }
    }

    /// Set the latency buckets
    pub fn with_buckets(mut self, buckets: Vec<LatencyBucket>) -> Self {
        self.latency_buckets = buckets;
        self
    }

    /// Decode a record from the probe server's JSON body
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Check if a whole average was written with a decimal point.
    ///
    /// The probe server writes whole averages as integers (`"avg_ms":150`);
    /// only hand-written records carry `150.0`.
    pub fn average_has_point(&self) -> bool {
        self.average_has_point
    }

    /// Probes without a response
    pub fn missing_count(&self) -> u64 {
        self.total_count.saturating_sub(self.ok_count)
    }

    /// Sum of all bucket counts
    pub fn bucketed_count(&self) -> u64 {
        self.latency_buckets.iter().map(|b| b.count).sum()
    }

    /// Check the full structural contract of a record.
    ///
    /// Stricter than what the classifier needs: it also verifies that the
    /// buckets account for every successful probe and are ordered.
    pub fn validate(&self) -> Result<()> {
        if self.ok_count > self.total_count {
            return Err(Error::OkExceedsTotal {
                ok: self.ok_count,
                total: self.total_count,
            });
        }

        if self.latency_buckets.len() < MIN_BUCKETS {
            return Err(Error::InsufficientBuckets {
                got: self.latency_buckets.len(),
                need: MIN_BUCKETS,
            });
        }

        let bucketed = self.bucketed_count();
        if bucketed != self.ok_count {
            return Err(Error::InvalidTelemetry(format!(
                "buckets hold {} probes but ok is {}",
                bucketed, self.ok_count
            )));
        }

        if !self.average_latency_ms.is_finite() || self.average_latency_ms < 0.0 {
            return Err(Error::InvalidTelemetry(format!(
                "average latency {} is not a non-negative number",
                self.average_latency_ms
            )));
        }

        let last = self.latency_buckets.len() - 1;
        let mut previous: Option<f64> = None;
        for (i, bucket) in self.latency_buckets.iter().enumerate() {
            match (bucket.upper_bound_ms, i == last) {
                (Some(_), true) => {
                    return Err(Error::InvalidTelemetry(
                        "last bucket must be unbounded".into(),
                    ));
                }
                (None, false) => {
                    return Err(Error::InvalidTelemetry(format!(
                        "bucket {} is unbounded but is not the last bucket",
                        i
                    )));
                }
                (Some(bound), false) => {
                    if previous.is_some_and(|p| bound <= p) {
                        return Err(Error::InvalidTelemetry(format!(
                            "bucket bounds must increase, {} follows {}",
                            bound,
                            previous.unwrap_or_default()
                        )));
                    }
                    previous = Some(bound);
                }
                (None, true) => {}
            }
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
