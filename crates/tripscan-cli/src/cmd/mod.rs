//! Command implementations

pub mod config;
pub mod search;
pub mod shell;
pub mod sources;
pub mod suggest;

use anyhow::{Context, Result};
use std::sync::Arc;
use tripscan_core::{Config, FanOut, Mode, Reporter, SearchSession, SourceFactory};

use crate::GlobalArgs;

/// Load the config file and apply command-line overrides.
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(global.config.as_deref()).context("Failed to load config")?;

    if global.mock {
        config.search.mode = Mode::Mock;
    }
    if let Some(secs) = global.timeout {
        config.search.timeout_secs = secs;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Build a session over the configured sources.
pub fn build_session(config: &Config, reporter: Arc<dyn Reporter>) -> Result<SearchSession> {
    let factory = SourceFactory::new().context("Failed to build HTTP client")?;
    let fan_out = FanOut::new(factory.build(config), config.timeout());
    tracing::debug!(
        mode = ?config.search.mode,
        sources = config.sources.len(),
        timeout_secs = config.search.timeout_secs,
        "Session ready"
    );
    Ok(SearchSession::new(Arc::new(fan_out), reporter))
}
