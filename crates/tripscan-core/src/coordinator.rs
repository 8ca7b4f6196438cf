//! Concurrent fan-out of one search across every configured source.
//!
//! Each adapter call runs as its own task on a [`JoinSet`], bounded by a
//! deadline and shielded from panics. Results are reported as they arrive,
//! then stored by configured index so the merge order never depends on which
//! source answered first.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tripscan_schema::{Destination, Package, RawPackage, SourceId, SourceStatus};

use crate::reporter::Reporter;
use crate::source::{Source, SourceError};

/// Why a fan-out produced no report.
#[derive(Error, Debug)]
pub enum FanOutError {
    /// The search was cancelled before every source settled.
    #[error("search was cancelled")]
    Cancelled,

    /// A spawned adapter task could not be joined.
    #[error("adapter task failed to join: {reason}")]
    Join {
        /// The join error, rendered.
        reason: String,
        /// Sources that had already settled, with the status reported for them.
        settled: Vec<(SourceId, SourceStatus)>,
    },
}

/// How one source settled.
#[derive(Debug)]
pub struct SourceOutcome {
    /// The source that ran.
    pub source: SourceId,
    /// Its validated batch, or why it produced none.
    pub result: Result<Vec<RawPackage>, SourceError>,
    /// Wall time from dispatch to settle.
    pub elapsed: Duration,
}

impl SourceOutcome {
    /// `success` for a batch, `error` otherwise.
    pub fn status(&self) -> SourceStatus {
        if self.result.is_ok() {
            SourceStatus::Success
        } else {
            SourceStatus::Error
        }
    }
}

/// Every source's outcome, in configured order.
#[derive(Debug)]
pub struct FanOutReport {
    outcomes: Vec<SourceOutcome>,
    elapsed: Duration,
}

impl FanOutReport {
    /// Outcomes in configured order.
    pub fn outcomes(&self) -> &[SourceOutcome] {
        &self.outcomes
    }

    /// Wall time for the whole fan-out.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Sources that returned a batch, empty or not.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Sources that errored, timed out or panicked.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Concatenate successful batches, tagging each record with its source.
    pub fn merged(&self) -> Vec<Package> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|batch| (&o.source, batch)))
            .flat_map(|(source, batch)| {
                batch
                    .iter()
                    .map(move |raw| Package::new(source.clone(), raw.clone()))
            })
            .collect()
    }
}

/// The configured adapters plus the per-call deadline.
pub struct FanOut {
    sources: Vec<Arc<dyn Source>>,
    timeout: Duration,
}

impl std::fmt::Debug for FanOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOut")
            .field("sources", &self.source_ids())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FanOut {
    /// Fan out over `sources`, giving each call `timeout` to settle.
    pub fn new(sources: Vec<Arc<dyn Source>>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    /// Ids of the configured sources, in order.
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id().clone()).collect()
    }

    /// The per-call deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Dispatch `destination` to every source and wait for all of them.
    ///
    /// A failing, slow or panicking source only affects its own outcome.
    /// Cancelling `cancel` aborts every in-flight call.
    pub async fn dispatch(
        &self,
        destination: &Destination,
        reporter: &dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<FanOutReport, FanOutError> {
        let started = Instant::now();
        let mut set = JoinSet::new();

        for (index, source) in self.sources.iter().enumerate() {
            let source = Arc::clone(source);
            let destination = destination.clone();
            let timeout = self.timeout;

            tracing::debug!(source = %source.id(), destination = %destination, "Dispatching");
            reporter.source_loading(source.id());

            set.spawn(async move {
                let start = Instant::now();
                let call = AssertUnwindSafe(source.fetch(&destination)).catch_unwind();
                let result = match tokio::time::timeout(timeout, call).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(payload)) => Err(SourceError::Panicked(panic_message(payload.as_ref()))),
                    Err(_) => Err(SourceError::Timeout(timeout)),
                };
                (index, result, start.elapsed())
            });
        }

        let mut slots: Vec<Option<SourceOutcome>> = self.sources.iter().map(|_| None).collect();

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    set.abort_all();
                    tracing::debug!(destination = %destination, "Search cancelled");
                    return Err(FanOutError::Cancelled);
                }
                joined = set.join_next() => match joined {
                    None => break,
                    Some(Ok((index, result, elapsed))) => {
                        let source = self.sources[index].id().clone();
                        settle(reporter, &source, &result, elapsed);
                        slots[index] = Some(SourceOutcome { source, result, elapsed });
                    }
                    Some(Err(e)) => {
                        set.abort_all();
                        let settled = slots
                            .iter()
                            .flatten()
                            .map(|o| (o.source.clone(), o.status()))
                            .collect();
                        return Err(FanOutError::Join {
                            reason: e.to_string(),
                            settled,
                        });
                    }
                },
            }
        }

        let report = FanOutReport {
            outcomes: slots.into_iter().flatten().collect(),
            elapsed: started.elapsed(),
        };
        tracing::info!(
            destination = %destination,
            succeeded = report.succeeded(),
            failed = report.failed(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Fan-out complete"
        );
        Ok(report)
    }
}

fn settle(
    reporter: &dyn Reporter,
    source: &SourceId,
    result: &Result<Vec<RawPackage>, SourceError>,
    elapsed: Duration,
) {
    let elapsed_ms = elapsed.as_millis() as u64;
    match result {
        Ok(batch) => {
            tracing::debug!(source = %source, count = batch.len(), elapsed_ms, "Source settled");
            reporter.source_succeeded(source, batch.len(), elapsed);
        }
        Err(e) => {
            tracing::warn!(source = %source, error = %e, elapsed_ms, "Source failed");
            reporter.source_failed(source, &e.to_string(), elapsed);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
