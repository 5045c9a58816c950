//! Probe target resolution.
//!
//! A target is the probe URL plus an optional address override. With an
//! override the TCP connection goes to `host:port` from the override while
//! the request keeps the URL's path and `Host` header. This lets the plugin
//! reach a LAN probe server even when DNS needs a working internet
//! connection. Overrides always speak plain HTTP, so they require an `http`
//! URL.

use reqwest::Url;
use tracing::warn;

use crate::error::{Error, Result};
use crate::utils::constants::TARGETS_PATH;
use crate::utils::validation::{parse_addr_override, validate_probe_url};

/// Where to fetch telemetry from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    url: Url,
    /// `url` with its host and port replaced by the override
    connect_url: Option<Url>,
}

impl ProbeTarget {
    /// Create a target for an absolute http(s) URL
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            url: validate_probe_url(url.as_ref())?,
            connect_url: None,
        })
    }

    /// Apply an optional `host:port` override.
    ///
    /// Blank values are ignored. Values that do not look like `host:port`
    /// are ignored with a warning. An override on an `https` URL is an error:
    /// the certificate could never match the override address.
    pub fn with_addr_override(mut self, addr: Option<&str>) -> Result<Self> {
        let Some(addr) = addr.map(str::trim).filter(|a| !a.is_empty()) else {
            return Ok(self);
        };

        let Some((host, port)) = parse_addr_override(addr) else {
            warn!(addr, "ignoring address override, expected host:port");
            return Ok(self);
        };

        if self.url.scheme() != "http" {
            return Err(Error::InvalidParameter {
                name: "addr".into(),
                reason: format!(
                    "address override needs an http URL, got {}",
                    self.url.scheme()
                ),
            });
        }

        let mut connect_url = self.url.clone();
        if connect_url.set_host(Some(&host)).is_err() || connect_url.set_port(Some(port)).is_err() {
            warn!(addr, "ignoring address override, invalid host");
            return Ok(self);
        }

        self.connect_url = Some(connect_url);
        Ok(self)
    }

    /// Configured URL
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Address override, if any
    pub fn connect_addr(&self) -> Option<(&str, u16)> {
        let connect_url = self.connect_url.as_ref()?;
        Some((connect_url.host_str()?, connect_url.port_or_known_default()?))
    }

    /// URL the HTTP client should connect to
    pub fn request_url(&self) -> &str {
        self.connect_url.as_ref().unwrap_or(&self.url).as_str()
    }

    /// `Host` header to send when the connection is redirected.
    ///
    /// Host and non-default port of the configured URL; never userinfo.
    pub fn host_header(&self) -> Option<String> {
        self.connect_url.as_ref()?;
        let host = self.url.host_str()?;
        Some(match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// Scheme, host and port of the configured URL
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Target for the server's target listing, same override
    pub fn targets(&self) -> ProbeTarget {
        ProbeTarget {
            url: with_listing_path(&self.url),
            connect_url: self.connect_url.as_ref().map(with_listing_path),
        }
    }
}

fn with_listing_path(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_path(TARGETS_PATH);
    url.set_query(None);
    url.set_fragment(None);
    url
}

impl std::str::FromStr for ProbeTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl std::fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.connect_addr() {
            Some((host, port)) => write!(f, "{} via {}:{}", self.url, host, port),
            None => write!(f, "{}", self.url),
        }
    }
}
