use async_trait::async_trait;
use reqwest::Client;
use tripscan_schema::{Destination, RawPackage, SourceId};

use super::{Source, SourceError, validate_batch};

/// Fetches packages from a scraping/proxy endpoint.
///
/// Issues `GET <endpoint>?destination=<dest>` and expects a JSON array of
/// [`RawPackage`] records in the response body.
#[derive(Debug, Clone)]
pub struct HttpSource {
    id: SourceId,
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpSource {
    /// An adapter for `path` under `base_url`, with exactly one slash between.
    pub fn new(id: SourceId, client: Client, base_url: &str, path: &str) -> Self {
        let endpoint = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Self {
            id,
            client,
            endpoint,
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The full request URL, without the query string.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Source for HttpSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self, destination: &Destination) -> Result<Vec<RawPackage>, SourceError> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("destination", destination.as_str())]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let records: Vec<RawPackage> =
            serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))?;

        tracing::trace!(source = %self.id, count = records.len(), "Decoded response");
        validate_batch(records)
    }
}
