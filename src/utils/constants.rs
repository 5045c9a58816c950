//! Classifier thresholds, glyphs and client defaults.
//!
//! All tunable numbers are defined here for easy auditing and modification.

// ═══════════════════════════════════════════════════════════════════════════════
// STATUS GLYPHS
// ═══════════════════════════════════════════════════════════════════════════════

/// Glyph for a red verdict
pub const RED_GLYPH: &str = "🔴";

/// Glyph for a yellow verdict
pub const YELLOW_GLYPH: &str = "🟡";

/// Glyph for a green verdict
pub const GREEN_GLYPH: &str = "🟢";

/// Glyph shown when no telemetry could be obtained
pub const UNKNOWN_GLYPH: &str = "❓";

/// Line separating the status line from the detail block
pub const DIVIDER: &str = "---";

// ═══════════════════════════════════════════════════════════════════════════════
// LOSS THRESHOLDS
// ═══════════════════════════════════════════════════════════════════════════════

/// `count / missing` below this is red (at least 25 of 50 missing)
pub const RED_LOSS_RATIO: u64 = 2;

/// `count / missing` below this is yellow (at least 4 of 50 missing)
pub const YELLOW_LOSS_RATIO: u64 = 15;

// ═══════════════════════════════════════════════════════════════════════════════
// LATENCY THRESHOLDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Average round-trip time above which the link is laggy
pub const LAGGY_AVG_MS: f64 = 100.0;

/// Divisor applied to the second-fastest bucket before it counts as fast
pub const NEXT_BUCKET_DIVISOR: u64 = 2;

/// Numerator of the share of probes that must be (weighted) fast
pub const FAST_SHARE_NUMERATOR: u64 = 2;

/// Denominator of the share of probes that must be (weighted) fast
pub const FAST_SHARE_DENOMINATOR: u64 = 3;

/// Buckets needed by the weighted fast-bucket check
pub const MIN_BUCKETS: usize = 2;

// ═══════════════════════════════════════════════════════════════════════════════
// CLIENT DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default probe endpoint
pub const DEFAULT_PROBE_URL: &str = "http://up-or-not.local/api/target/8.8.8.8";

/// Path of the server's target listing
pub const TARGETS_PATH: &str = "/api/targets";

/// TCP connect timeout (1 second)
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1_000;

/// Whole-request timeout (5 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// User agent sent to the probe server
pub const USER_AGENT: &str = concat!("upornot/", env!("CARGO_PKG_VERSION"));
