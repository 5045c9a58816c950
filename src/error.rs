//! Error types for upornot.
//!
//! This module defines all error types used by the classifier and the probe
//! client, providing clear and actionable error messages.

use thiserror::Error;

/// Result type alias for upornot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for upornot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Telemetry Errors
    // ═══════════════════════════════════════════════════════════════════

    /// More successful probes than probes sent
    #[error("ok count {ok} exceeds total count {total}")]
    OkExceedsTotal {
        /// Successful probes
        ok: u64,
        /// Probes sent
        total: u64,
    },

    /// Not enough latency buckets to run the fast-bucket check
    #[error("Insufficient latency buckets: got {got}, need {need}")]
    InsufficientBuckets {
        /// Number of buckets provided
        got: usize,
        /// Number of buckets required
        need: usize,
    },

    /// Telemetry record is structurally inconsistent
    #[error("Invalid telemetry: {0}")]
    InvalidTelemetry(String),

    // ═══════════════════════════════════════════════════════════════════
    // Probe Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Probe server answered with a non-success status
    #[error("{status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
    },

    /// Probe server could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// Probe response could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ═══════════════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Invalid input parameter
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if the error came from the probe server side.
    ///
    /// Upstream errors are rendered as the unknown status rather than
    /// reported as caller mistakes.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::HttpStatus { .. } | Error::Connection(_) | Error::Deserialization(_)
        )
    }

    /// Returns true if the error is a telemetry contract violation
    pub fn is_malformed_telemetry(&self) -> bool {
        matches!(
            self,
            Error::OkExceedsTotal { .. }
                | Error::InsufficientBuckets { .. }
                | Error::InvalidTelemetry(_)
        )
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Telemetry errors: 1xxx
            Error::OkExceedsTotal { .. } => 1001,
            Error::InsufficientBuckets { .. } => 1002,
            Error::InvalidTelemetry(_) => 1003,

            // Probe errors: 2xxx
            Error::HttpStatus { .. } => 2001,
            Error::Connection(_) => 2002,
            Error::Deserialization(_) => 2003,

            // Configuration errors: 5xxx
            Error::InvalidParameter { .. } => 5001,

            // Internal errors: 9xxx
            Error::Internal(_) => 9001,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Deserialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_unique() {
        let codes = vec![
            Error::OkExceedsTotal { ok: 0, total: 0 }.code(),
            Error::InsufficientBuckets { got: 0, need: 2 }.code(),
            Error::InvalidTelemetry("".into()).code(),
            Error::HttpStatus { status: 500 }.code(),
            Error::Connection("".into()).code(),
            Error::Deserialization("".into()).code(),
            Error::InvalidParameter { name: "".into(), reason: "".into() }.code(),
            Error::Internal("".into()).code(),
        ];

        let mut unique_codes = codes.clone();
        unique_codes.sort();
        unique_codes.dedup();

        assert_eq!(codes.len(), unique_codes.len(), "Error codes must be unique");
    }

    #[test]
    fn test_http_status_renders_bare_code() {
        // The unknown status shows the raw code, like "503".
        assert_eq!(Error::HttpStatus { status: 503 }.to_string(), "503");
    }

    #[test]
    fn test_error_display() {
        let err = Error::InsufficientBuckets { got: 1, need: 2 };
        assert!(err.to_string().contains("got 1"));
        assert!(err.to_string().contains("need 2"));
    }

    #[test]
    fn test_is_upstream() {
        assert!(Error::Connection("refused".into()).is_upstream());
        assert!(Error::HttpStatus { status: 404 }.is_upstream());
        assert!(!Error::InsufficientBuckets { got: 0, need: 2 }.is_upstream());
    }

    #[test]
    fn test_is_malformed_telemetry() {
        assert!(Error::OkExceedsTotal { ok: 3, total: 2 }.is_malformed_telemetry());
        assert!(!Error::Internal("test".into()).is_malformed_telemetry());
    }

    #[test]
    fn test_from_serde_json() {
        let err: Error = serde_json::from_str::<u64>("nope").unwrap_err().into();
        assert_eq!(err.code(), 2003);
    }
}
