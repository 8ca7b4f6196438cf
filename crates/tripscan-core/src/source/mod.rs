//! Package source adapters.
//!
//! Every provider sits behind the [`Source`] trait: given a destination it
//! returns a well-formed batch of [`RawPackage`] records or a [`SourceError`].
//! Adapters never retry and never return a partially valid batch.
//!
//! - [`HttpSource`]: GET against a scraping/proxy endpoint (live mode)
//! - [`MockSource`]: randomized generator with simulated latency and failures
//! - [`SourceFactory`]: builds the configured adapter set

mod factory;
mod http;
mod mock;

pub use factory::SourceFactory;
pub use http::HttpSource;
pub use mock::MockSource;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tripscan_schema::{Destination, RawPackage, RecordError, SourceId};

/// Why a source produced no batch.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connection, TLS or transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-2xx response.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The body was not a JSON array of records.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// A record failed validation; the whole batch is rejected.
    #[error("malformed record #{index}: {reason}")]
    Malformed {
        /// Position of the offending record in the response array.
        index: usize,
        /// What was wrong with it.
        reason: RecordError,
    },

    /// The provider reported a failure of its own.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// The call exceeded its deadline.
    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The adapter panicked; carries the panic message.
    #[error("adapter panicked: {0}")]
    Panicked(String),
}

/// A provider of travel packages.
#[async_trait]
pub trait Source: Send + Sync {
    /// Identifier used to tag this source's packages and key its status.
    fn id(&self) -> &SourceId;

    /// Fetch every package this provider offers for `destination`.
    async fn fetch(&self, destination: &Destination) -> Result<Vec<RawPackage>, SourceError>;
}

/// Reject the whole batch if any record is malformed.
pub(crate) fn validate_batch(records: Vec<RawPackage>) -> Result<Vec<RawPackage>, SourceError> {
    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|reason| SourceError::Malformed { index, reason })?;
    }
    Ok(records)
}
