//! # upornot
//!
//! Status-bar plugin for an [up-or-not](https://github.com/spraints/up-or-not)
//! probe server. The server pings a target host and keeps a window of recent
//! results; this crate fetches the window's statistics and turns them into a
//! red/yellow/green verdict with a short detail block.
//!
//! ## Architecture
//!
//! - **Telemetry**: the ping-statistics record served by the probe
//! - **Health**: the classifier (verdict plus detail block)
//! - **Probe**: target resolution and the HTTP fetcher
//! - **CLI**: configuration and output rendering for the `upornot` binary
//!
//! ## Example
//!
//! ```rust
//! use upornot::prelude::*;
//!
//! let record = TelemetryRecord::new(50, 50, 150.0).with_buckets(vec![
//!     LatencyBucket::bounded(60.0, 10),
//!     LatencyBucket::bounded(200.0, 40),
//!     LatencyBucket::slower(0),
//! ]);
//!
//! let (verdict, detail) = classify(&record).unwrap().into_parts();
//! assert_eq!(verdict.to_string(), "🟡 laggy 150ms");
//! assert_eq!(detail.lines()[0], "ok: 50/50");
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod cli;
pub mod error;
pub mod health;
pub mod probe;
pub mod telemetry;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::health::{
        classifier::{classify, score, summarize, ClassifierConfig, HealthClassifier},
        verdict::{Classification, DetailText, HealthColor, Verdict},
    };
    pub use crate::probe::ProbeOutcome;
    #[cfg(feature = "client")]
    pub use crate::probe::{HttpProbeFetcher, ProbeTarget};
    pub use crate::telemetry::{LatencyBucket, TelemetryRecord};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
