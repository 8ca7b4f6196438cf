use reqwest::Client;
use std::sync::Arc;
use tripscan_schema::SourceId;

use super::{HttpSource, MockSource, Source};
use crate::config::{Config, Mode, SourceConfig};

/// Builds the configured adapter set, in configured order.
#[derive(Debug, Clone)]
pub struct SourceFactory {
    client: Client,
}

impl SourceFactory {
    /// A factory with its own client, sending the tripscan user agent.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(crate::USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Use a pre-built client (shared connection pool, custom TLS, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// One adapter per configured source for the selected mode.
    pub fn build(&self, config: &Config) -> Vec<Arc<dyn Source>> {
        config
            .sources
            .iter()
            .map(|source| match config.search.mode {
                Mode::Live => self.http(config, source),
                Mode::Mock => Arc::new(MockSource::new(
                    SourceId::new(&source.name),
                    config.mock.clone(),
                )) as Arc<dyn Source>,
            })
            .collect()
    }

    fn http(&self, config: &Config, source: &SourceConfig) -> Arc<dyn Source> {
        let mut adapter = HttpSource::new(
            SourceId::new(&source.name),
            self.client.clone(),
            &config.live.base_url,
            &source.path,
        );

        if let Some(var) = &source.token_env {
            match std::env::var(var) {
                Ok(token) if !token.is_empty() => adapter = adapter.with_bearer_token(token),
                _ => tracing::debug!(source = %source.name, var = %var, "No bearer token set"),
            }
        }

        tracing::trace!(source = %source.name, endpoint = adapter.endpoint(), "Built HTTP source");
        Arc::new(adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_keeps_configured_order() {
        let factory = SourceFactory::with_client(Client::new());
        let config = Config::default();
        let ids: Vec<String> = factory
            .build(&config)
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        assert_eq!(
            ids,
            ["MakeMyTrip", "Yatra", "Goibibo", "Booking.com", "TripAdvisor", "Amadeus"]
        );
    }

    #[test]
    fn test_build_mock_mode() {
        let factory = SourceFactory::with_client(Client::new());
        let mut config = Config::default();
        config.search.mode = Mode::Mock;
        config.sources.truncate(2);
        let sources = factory.build(&config);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].id().as_str(), "Yatra");
    }
}
