//! Probe server client.
//!
//! This module provides the I/O around the classifier:
//! - Target resolution (URL plus optional address override)
//! - HTTP fetching of telemetry records
//!
//! Both need the `client` feature; [`ProbeOutcome`] and the fetcher
//! configuration are always available.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use upornot::probe::{HttpProbeFetcher, ProbeOutcome, ProbeTarget};
//!
//! let target = ProbeTarget::new("http://up-or-not.local/api/target/8.8.8.8")?
//!     .with_addr_override(Some("192.168.1.20:80"))?;
//! let fetcher = HttpProbeFetcher::with_defaults()?;
//!
//! match fetcher.fetch(&target).await {
//!     ProbeOutcome::Telemetry(record) => println!("{:?}", upornot::health::classify(&record)),
//!     ProbeOutcome::Unknown(reason) => println!("unknown: {}", reason),
//! }
//! ```

pub mod fetcher;
#[cfg(feature = "client")]
pub mod target;

pub use fetcher::*;
#[cfg(feature = "client")]
pub use target::*;
