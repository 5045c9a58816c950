//! Utility modules for upornot.
//!
//! Shared helpers used by the classifier and the client:
//! - Constants
//! - Number formatting
//! - Validation helpers

pub mod constants;
pub mod format;
pub mod validation;

pub use constants::*;
pub use format::*;
pub use validation::*;
