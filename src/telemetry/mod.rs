//! Probe telemetry data model.

pub mod record;

pub use record::*;
