//! Connection health classification.
//!
//! # Components
//!
//! - **Verdict**: red/yellow/green result with its label and detail block
//! - **Classifier**: ordered threshold rules over a telemetry record

pub mod classifier;
pub mod verdict;

pub use classifier::*;
pub use verdict::*;
