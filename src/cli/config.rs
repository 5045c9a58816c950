//! CLI Configuration.
//!
//! Settings come from, lowest precedence first: built-in defaults, an
//! optional JSON config file, the xbar plugin variables `URL` and `ADDR`,
//! `UPORNOT_*` environment variables, and finally command-line flags (applied
//! by the binary).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::output::OutputFormat;
use crate::health::ClassifierConfig;
use crate::probe::HttpFetcherConfig;
#[cfg(feature = "client")]
use crate::probe::ProbeTarget;
use crate::utils::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_PROBE_URL, DEFAULT_REQUEST_TIMEOUT_MS, USER_AGENT,
};
use crate::utils::validation::validate_timeout;

// ═══════════════════════════════════════════════════════════════════════════════
// CLI CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Probe endpoint URL
    pub url: String,
    /// Optional `host:port` to connect to instead of the URL's host
    pub addr: Option<String>,
    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Output format
    pub format: OutputFormat,
    /// Emoji glyphs in the status line
    pub glyphs: bool,
    /// Classifier thresholds
    pub thresholds: ClassifierConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PROBE_URL.into(),
            addr: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            format: OutputFormat::default(),
            glyphs: true,
            thresholds: ClassifierConfig::default(),
        }
    }
}

impl CliConfig {
    /// Create new configuration
    pub fn new(url: String) -> Self {
        Self {
            url,
            ..Default::default()
        }
    }

    /// Load from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        std::fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Resolve file and environment layers.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// only if a file is there.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => {
                let default = Self::default_path();
                if default.is_file() {
                    Self::load(&default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env()
    }

    /// Overlay the process environment
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay variables from `lookup`
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // xbar exposes plugin variables without their VAR_ prefix
        if let Some(url) = get("URL") {
            self.url = url;
        }
        if let Some(addr) = get("ADDR") {
            self.addr = Some(addr);
        }

        if let Some(url) = get("UPORNOT_URL") {
            self.url = url;
        }
        if let Some(addr) = get("UPORNOT_ADDR") {
            self.addr = Some(addr);
        }
        if let Some(ms) = get("UPORNOT_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = parse_millis("UPORNOT_CONNECT_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = get("UPORNOT_TIMEOUT_MS") {
            self.timeout_ms = parse_millis("UPORNOT_TIMEOUT_MS", &ms)?;
        }
        if let Some(format) = get("UPORNOT_FORMAT") {
            self.format = format.parse().map_err(ConfigError::Validation)?;
        }

        Ok(self)
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        default_data_dir().join("config.json")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        #[cfg(feature = "client")]
        self.target()?;
        validate_timeout(self.connect_timeout_ms, "connect_timeout_ms")
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        validate_timeout(self.timeout_ms, "timeout_ms")
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        self.thresholds
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Probe target described by `url` and `addr`
    #[cfg(feature = "client")]
    pub fn target(&self) -> Result<ProbeTarget, ConfigError> {
        ProbeTarget::new(&self.url)
            .and_then(|t| t.with_addr_override(self.addr.as_deref()))
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// HTTP settings for the fetcher
    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        HttpFetcherConfig {
            connect_timeout_ms: self.connect_timeout_ms,
            timeout_ms: self.timeout_ms,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{} must be a number of milliseconds, got {}", key, value)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration error
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    Io(String),
    /// Parse error
    Parse(String),
    /// Serialization error
    Serialize(String),
    /// Validation error
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Get default data directory
fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".upornot");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/upornot");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("upornot");
        }
    }

    PathBuf::from(".upornot")
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
