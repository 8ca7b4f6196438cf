//! Configuration loaded from `config.toml`.
//!
//! ```toml
//! [search]
//! timeout_secs = 15
//! mode = "live"          # or "mock"
//!
//! [live]
//! base_url = "http://localhost:3000"
//!
//! [mock]
//! failure_rate = 0.15
//! min_latency_ms = 300
//! max_latency_ms = 2500
//! # seed = 42
//!
//! [[sources]]
//! name = "MakeMyTrip"
//! path = "/api/scrape/makemytrip"
//! ```
//!
//! Every section is optional; missing values fall back to [`Config::default`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::paths::default_config_path;

/// Errors from loading, validating or writing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File involved.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The config could not be rendered back to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `write_new` found a file already in place.
    #[error("config already exists at {0}")]
    Exists(PathBuf),

    /// The values parsed but break a constraint.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where packages come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// HTTP calls against the scraping endpoints.
    #[default]
    Live,
    /// Randomized generator with simulated latency and failures.
    Mock,
}

/// The `[search]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Deadline for a single adapter call.
    pub timeout_secs: u64,
    /// Live endpoints or the mock generator.
    pub mode: Mode,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            mode: Mode::Live,
        }
    }
}

/// The `[live]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveSettings {
    /// Base URL the per-source paths are appended to.
    pub base_url: String,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// The `[mock]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    /// Probability (0-1) that a mock source fails a call.
    pub failure_rate: f64,
    /// Lower bound of the simulated latency.
    pub min_latency_ms: u64,
    /// Upper bound of the simulated latency.
    pub max_latency_ms: u64,
    /// Fixed seed for reproducible output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            failure_rate: 0.15,
            min_latency_ms: 300,
            max_latency_ms: 2500,
            seed: None,
        }
    }
}

/// One configured package provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Display name, also used as the source id.
    pub name: String,
    /// Endpoint path relative to `live.base_url`.
    pub path: String,
    /// Environment variable holding a bearer token for this endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl SourceConfig {
    fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            token_env: None,
        }
    }
}

/// The six providers the comparison covers out of the box.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("MakeMyTrip", "/api/scrape/makemytrip"),
        SourceConfig::new("Yatra", "/api/scrape/yatra"),
        SourceConfig::new("Goibibo", "/api/scrape/goibibo"),
        SourceConfig::new("Booking.com", "/api/scrape/booking"),
        SourceConfig::new("TripAdvisor", "/api/scrape/tripadvisor"),
        SourceConfig {
            token_env: Some("TRIPSCAN_AMADEUS_TOKEN".to_string()),
            ..SourceConfig::new("Amadeus", "/api/amadeus/packages")
        },
    ]
}

/// Top-level configuration, usually read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search behaviour.
    pub search: SearchSettings,
    /// Live-mode endpoint settings.
    pub live: LiveSettings,
    /// Mock-mode generator settings.
    pub mock: MockSettings,
    /// Providers, in the order their results are merged.
    pub sources: Vec<SourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            live: LiveSettings::default(),
            mock: MockSettings::default(),
            sources: default_sources(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.tripscan/config.toml` is
    /// used when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), sources = config.sources.len(), "Loaded config");
        Ok(config)
    }

    /// Check cross-field constraints: unique non-empty source names, a positive
    /// timeout, a failure rate within 0..=1 and an ordered latency range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("at least one source is required".into()));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            let name = source.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid("source name cannot be empty".into()));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigError::Invalid(format!("duplicate source '{name}'")));
            }
        }

        if self.search.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.mock.failure_rate) {
            return Err(ConfigError::Invalid(format!(
                "failure_rate must be within 0..=1, got {}",
                self.mock.failure_rate
            )));
        }
        if self.mock.min_latency_ms > self.mock.max_latency_ms {
            return Err(ConfigError::Invalid(
                "min_latency_ms cannot exceed max_latency_ms".into(),
            ));
        }
        Ok(())
    }

    /// Per-adapter deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_secs)
    }

    /// Render as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write this config to `path`, refusing to clobber an existing file.
    pub fn write_new(&self, path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::Exists(path.to_path_buf()));
        }
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_toml_string()?).map_err(io_err)
    }
}
