//! Input validation utilities for upornot.
//!
//! This module provides validation functions for configuration values before
//! they reach the probe client.

#[cfg(feature = "client")]
use reqwest::Url;

use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse an address override of the form `host:port`.
///
/// The host is everything before the last colon, so bracketed IPv6 literals
/// like `[::1]:8080` keep their brackets. Returns `None` when the value does
/// not look like `host:port`.
pub fn parse_addr_override(addr: &str) -> Option<(String, u16)> {
    let (host, port) = addr.trim().rsplit_once(':')?;
    if host.is_empty() || port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let port = port.parse().ok()?;
    Some((host.to_string(), port))
}

// ═══════════════════════════════════════════════════════════════════════════════
// URL VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse a probe URL, requiring an absolute http(s) URL with a host
#[cfg(feature = "client")]
pub fn validate_probe_url(url: &str) -> Result<Url> {
    let invalid = |reason: String| Error::InvalidParameter {
        name: "url".into(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(format!("{}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("{} is not an http(s) URL", url)));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid(format!("{} has no host", url)));
    }

    Ok(parsed)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIMEOUT VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Validate that a timeout is non-zero
pub fn validate_timeout(timeout_ms: u64, name: &str) -> Result<()> {
    if timeout_ms == 0 {
        return Err(Error::InvalidParameter {
            name: name.into(),
            reason: "timeout must be greater than 0".into(),
        });
    }
    Ok(())
}
