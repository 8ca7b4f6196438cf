//! The search session: one destination, one canonical package set, and the
//! view parameters applied on top of it.
//!
//! A search is split in three so overlapping searches stay explicit:
//!
//! 1. [`SearchSession::begin`] validates input, resets state, bumps the
//!    generation and cancels whatever search was still in flight.
//! 2. [`SearchTicket::run`] performs the fan-out without touching the session.
//! 3. [`SearchSession::complete`] applies the result, unless a newer search
//!    started in the meantime.
//!
//! [`SearchSession::submit`] and [`SearchSession::refresh`] chain the three.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tripscan_schema::{Destination, DestinationError, Package, SortKey, ViewMode};

use crate::coordinator::{FanOut, FanOutError, FanOutReport};
use crate::dedupe::dedupe;
use crate::reporter::Reporter;
use crate::status::StatusBoard;
use crate::view::{ViewSummary, project};

/// User-facing session errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The destination was blank.
    #[error(transparent)]
    Validation(#[from] DestinationError),

    /// Every source failed or came back empty.
    #[error("No packages found for this destination. Please try a different location.")]
    NoPackages,

    /// The fan-out itself broke down.
    #[error("Failed to fetch packages. Please try again.")]
    FetchFailed,

    /// A minimum rating outside 0..=5 was requested.
    #[error("minimum rating must be between 0 and 5, got {0}")]
    InvalidRating(f64),
}

/// What a completed search produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSummary {
    /// What was searched for.
    pub destination: Destination,
    /// Packages kept after deduplication.
    pub packages: usize,
    /// Packages dropped as duplicates of an earlier one.
    pub duplicates: usize,
    /// Sources that returned a batch.
    pub succeeded: usize,
    /// Sources that errored, timed out or panicked.
    pub failed: usize,
    /// Wall time for the fan-out.
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Result of a submit, refresh or complete.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results were stored. The set may be empty, in which case the session
    /// carries [`SessionError::NoPackages`].
    Completed(SearchSummary),
    /// Input was invalid; nothing was dispatched.
    Rejected,
    /// A newer search started before this one finished; its result was dropped.
    Superseded,
    /// The fan-out itself broke down; the session carries
    /// [`SessionError::FetchFailed`].
    Failed,
    /// `refresh` was called before any destination was submitted.
    NoDestination,
}

/// A dispatched search, detached from the session.
#[derive(Debug)]
pub struct SearchTicket {
    generation: u64,
    destination: Destination,
    fan_out: Arc<FanOut>,
    reporter: Arc<dyn Reporter>,
    cancel: CancellationToken,
}

impl SearchTicket {
    /// Generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Destination being searched.
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Fan out to every source and wait for all of them to settle.
    pub async fn run(self) -> CompletedSearch {
        let result = self
            .fan_out
            .dispatch(&self.destination, self.reporter.as_ref(), &self.cancel)
            .await;
        CompletedSearch {
            generation: self.generation,
            destination: self.destination,
            result,
        }
    }
}

/// The raw result of [`SearchTicket::run`], waiting to be applied.
#[derive(Debug)]
pub struct CompletedSearch {
    generation: u64,
    destination: Destination,
    result: Result<FanOutReport, FanOutError>,
}

/// Search state shared by every front-end: destination, canonical packages,
/// per-source status and the view settings applied on read.
pub struct SearchSession {
    fan_out: Arc<FanOut>,
    reporter: Arc<dyn Reporter>,
    destination: Option<Destination>,
    mode: ViewMode,
    error: Option<SessionError>,
    sort: SortKey,
    min_rating: f64,
    packages: Vec<Package>,
    statuses: StatusBoard,
    generation: u64,
    loading: bool,
    cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("destination", &self.destination)
            .field("mode", &self.mode)
            .field("generation", &self.generation)
            .field("loading", &self.loading)
            .field("packages", &self.packages.len())
            .finish_non_exhaustive()
    }
}

impl SearchSession {
    /// A fresh session on the search screen with no destination.
    pub fn new(fan_out: Arc<FanOut>, reporter: Arc<dyn Reporter>) -> Self {
        let statuses = StatusBoard::new(&fan_out.source_ids());
        Self {
            fan_out,
            reporter,
            destination: None,
            mode: ViewMode::Search,
            error: None,
            sort: SortKey::default(),
            min_rating: 0.0,
            packages: Vec::new(),
            statuses,
            generation: 0,
            loading: false,
            cancel: None,
        }
    }

    /// Validate `input` and reset the session for a new search.
    ///
    /// On success every source is `loading` and the previous search, if any,
    /// is cancelled. On failure the session keeps its results and records the
    /// validation error.
    pub fn begin(&mut self, input: &str) -> Result<SearchTicket, SessionError> {
        let destination = match Destination::parse(input) {
            Ok(d) => d,
            Err(e) => {
                let err = SessionError::from(e);
                self.error = Some(err.clone());
                return Err(err);
            }
        };

        if let Some(previous) = self.cancel.take() {
            previous.cancel();
        }
        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());

        self.generation += 1;
        self.destination = Some(destination.clone());
        self.mode = ViewMode::Results;
        self.error = None;
        self.packages.clear();
        let ids = self.fan_out.source_ids();
        self.statuses.reset_loading(&ids);
        self.loading = true;

        tracing::debug!(destination = %destination, generation = self.generation, "Search started");
        self.reporter.search_started(&destination, &ids);

        Ok(SearchTicket {
            generation: self.generation,
            destination,
            fan_out: Arc::clone(&self.fan_out),
            reporter: Arc::clone(&self.reporter),
            cancel,
        })
    }

    /// Apply a finished search, unless it has been superseded.
    pub fn complete(&mut self, done: CompletedSearch) -> SearchOutcome {
        if done.generation != self.generation {
            tracing::debug!(
                destination = %done.destination,
                generation = done.generation,
                current = self.generation,
                "Discarding stale search result"
            );
            return SearchOutcome::Superseded;
        }
        self.loading = false;
        self.cancel = None;

        let report = match done.result {
            Ok(report) => report,
            Err(FanOutError::Cancelled) => {
                self.statuses.fail_unsettled();
                return SearchOutcome::Superseded;
            }
            Err(FanOutError::Join { reason, settled }) => {
                tracing::error!(destination = %done.destination, error = %reason, "Fan-out failed");
                // Keep what the progress board already showed for settled sources
                for (source, status) in &settled {
                    self.statuses.set(source, *status);
                }
                self.statuses.fail_unsettled();
                let err = SessionError::FetchFailed;
                self.reporter.error(&err.to_string());
                self.error = Some(err);
                return SearchOutcome::Failed;
            }
        };

        for outcome in report.outcomes() {
            self.statuses.set(&outcome.source, outcome.status());
        }

        let merged = report.merged();
        let total = merged.len();
        self.packages = dedupe(merged);
        self.error = self.packages.is_empty().then_some(SessionError::NoPackages);

        let summary = SearchSummary {
            destination: done.destination,
            packages: self.packages.len(),
            duplicates: total - self.packages.len(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            elapsed: report.elapsed(),
        };
        tracing::info!(
            destination = %summary.destination,
            packages = summary.packages,
            duplicates = summary.duplicates,
            "Search complete"
        );
        self.reporter.search_finished(&summary);
        SearchOutcome::Completed(summary)
    }

    /// Abandon the in-flight search, if any.
    ///
    /// Unsettled sources become `error` and a result that still arrives for
    /// the abandoned generation is discarded.
    pub fn cancel(&mut self) -> bool {
        let Some(token) = self.cancel.take() else {
            return false;
        };
        token.cancel();
        self.generation += 1;
        self.loading = false;
        self.statuses.fail_unsettled();
        tracing::debug!(generation = self.generation, "Search cancelled");
        true
    }

    /// Search for `input` and wait for the result.
    pub async fn submit(&mut self, input: &str) -> SearchOutcome {
        match self.begin(input) {
            Ok(ticket) => {
                let done = ticket.run().await;
                self.complete(done)
            }
            Err(_) => SearchOutcome::Rejected,
        }
    }

    /// Re-run the current destination.
    pub async fn refresh(&mut self) -> SearchOutcome {
        match self.destination.clone() {
            Some(destination) => self.submit(destination.as_str()).await,
            None => SearchOutcome::NoDestination,
        }
    }

    /// Return to the search screen, keeping destination and results.
    pub fn back(&mut self) {
        self.mode = ViewMode::Search;
    }

    /// Change the sort order. Never dispatches.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Change the rating filter. Values outside 0..=5 are rejected and the
    /// current filter is kept.
    pub fn set_min_rating(&mut self, min_rating: f64) -> Result<(), SessionError> {
        if !(0.0..=5.0).contains(&min_rating) {
            return Err(SessionError::InvalidRating(min_rating));
        }
        self.min_rating = min_rating;
        Ok(())
    }

    /// The canonical set projected through the current sort and filter.
    pub fn view(&self) -> Vec<&Package> {
        project(&self.packages, self.sort, self.min_rating)
    }

    /// Counts for the current view.
    pub fn summary(&self) -> ViewSummary {
        ViewSummary::of(&self.view())
    }

    /// The last accepted destination.
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Which screen the session is on.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The user-facing error from the last operation, if any.
    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// Current sort order.
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Current minimum rating.
    pub fn min_rating(&self) -> f64 {
        self.min_rating
    }

    /// The deduplicated set, in configured-source order.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Per-source status for the latest search.
    pub fn statuses(&self) -> &StatusBoard {
        &self.statuses
    }

    /// Whether a search is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Generation of the latest search.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Everything a front-end renders, as plain data.
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        let view = self.view();
        SessionSnapshot {
            destination: self.destination.as_ref(),
            mode: self.mode,
            loading: self.loading,
            error: self.error.as_ref().map(ToString::to_string),
            sort: self.sort,
            min_rating: self.min_rating,
            summary: ViewSummary::of(&view),
            statuses: &self.statuses,
            packages: view,
        }
    }
}

/// Serializable view of a [`SearchSession`], as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot<'a> {
    /// Last accepted destination.
    pub destination: Option<&'a Destination>,
    /// Current screen.
    pub mode: ViewMode,
    /// Whether a search is in flight.
    pub loading: bool,
    /// User-facing error message.
    pub error: Option<String>,
    /// Sort order of `packages`.
    pub sort: SortKey,
    /// Rating filter applied to `packages`.
    pub min_rating: f64,
    /// Counts for `packages`.
    pub summary: ViewSummary,
    /// Per-source status.
    pub statuses: &'a StatusBoard,
    /// The projected view.
    pub packages: Vec<&'a Package>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use crate::reporter::testing::RecordingReporter;
    use crate::source::Source;
    use crate::source::testing::{Script, ScriptedSource};
    use std::sync::atomic::Ordering;
    use tripscan_schema::{SourceId, SourceStatus};

    fn session(sources: Vec<ScriptedSource>) -> SearchSession {
        let sources = sources
            .into_iter()
            .map(|s| Arc::new(s) as Arc<dyn Source>)
            .collect();
        SearchSession::new(
            Arc::new(FanOut::new(sources, Duration::from_secs(5))),
            Arc::new(NullReporter),
        )
    }

    fn goa_sources() -> Vec<ScriptedSource> {
        vec![
            ScriptedSource::ok("MakeMyTrip", &[("Goa Beach Paradise", 12999.0)]),
            ScriptedSource::ok("Yatra", &[("North Goa Nights", 8999.0)]),
            ScriptedSource::ok("Goibibo", &[("Goa Family Fun", 21999.0)]),
            ScriptedSource::ok("Booking.com", &[("Luxury Goa Retreat", 45999.0)]),
            ScriptedSource::ok("TripAdvisor", &[("Goa Heritage Walk", 5999.0)]),
            ScriptedSource::failing("Amadeus"),
        ]
    }

    #[tokio::test]
    async fn test_goa_scenario() {
        let mut session = session(goa_sources());

        let outcome = session.submit("Goa").await;

        let SearchOutcome::Completed(summary) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(summary.packages, 5);
        assert_eq!(summary.succeeded, 5);
        assert_eq!(summary.failed, 1);
        assert_eq!(session.packages().len(), 5);
        assert_eq!(session.statuses().count(SourceStatus::Success), 5);
        assert_eq!(
            session.statuses().get(&SourceId::new("Amadeus")),
            Some(SourceStatus::Error)
        );
        assert_eq!(session.error(), None);
        assert_eq!(session.mode(), ViewMode::Results);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_all_fail_sets_no_packages_error() {
        let mut session = session(vec![
            ScriptedSource::failing("A"),
            ScriptedSource::failing("B"),
        ]);
        session.submit("Goa").await;

        assert!(session.packages().is_empty());
        assert_eq!(session.error(), Some(&SessionError::NoPackages));
        assert_eq!(
            session.error().unwrap().to_string(),
            "No packages found for this destination. Please try a different location."
        );
        assert_eq!(session.statuses().count(SourceStatus::Error), 2);
    }

    #[tokio::test]
    async fn test_all_empty_sets_no_packages_error() {
        let mut session = session(vec![ScriptedSource::ok("A", &[])]);
        session.submit("Goa").await;
        assert_eq!(session.error(), Some(&SessionError::NoPackages));
        assert_eq!(session.statuses().count(SourceStatus::Success), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successes() {
        let mut session = session(vec![
            ScriptedSource::failing("A"),
            ScriptedSource::ok("B", &[("Trip", 1000.0)]),
        ]);
        session.submit("Goa").await;
        assert_eq!(session.packages().len(), 1);
        assert_eq!(session.packages()[0].source().as_str(), "B");
        assert_eq!(session.error(), None);
    }

    #[tokio::test]
    async fn test_duplicates_across_sources_collapse() {
        let mut session = session(vec![
            ScriptedSource::ok("A", &[("Goa Trip", 10999.0)]),
            ScriptedSource::ok("B", &[("goa trip", 11499.0), ("Goa Trip", 12499.0)]),
        ]);
        let SearchOutcome::Completed(summary) = session.submit("Goa").await else {
            panic!("expected completion");
        };
        assert_eq!(summary.packages, 2);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(session.packages()[0].source().as_str(), "A");
    }

    #[tokio::test]
    async fn test_blank_destination_rejected_without_dispatch() {
        let source = ScriptedSource::ok("A", &[("Trip", 100.0)]);
        let calls = source.calls();
        let mut session = session(vec![source]);

        assert_eq!(session.submit("   ").await, SearchOutcome::Rejected);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            session.error().map(ToString::to_string).as_deref(),
            Some("Please enter a destination")
        );
        assert_eq!(session.mode(), ViewMode::Search);
    }

    #[tokio::test]
    async fn test_begin_marks_all_loading() {
        let mut session = session(goa_sources());
        let ticket = session.begin("Goa").unwrap();

        assert!(session.is_loading());
        assert_eq!(session.statuses().count(SourceStatus::Loading), 6);
        assert_eq!(ticket.generation(), 1);

        let done = ticket.run().await;
        session.complete(done);
        assert!(session.statuses().all_settled());
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let mut session = session(vec![ScriptedSource::ok("A", &[("Trip", 100.0)])]);

        let first = session.begin("Goa").unwrap();
        let first_done = first.run().await;
        let second = session.begin("Manali").unwrap();

        assert_eq!(session.complete(first_done), SearchOutcome::Superseded);
        assert!(session.packages().is_empty());
        assert!(session.is_loading());

        let outcome = session.complete(second.run().await);
        assert!(matches!(outcome, SearchOutcome::Completed(_)));
        assert_eq!(session.destination().unwrap().as_str(), "Manali");
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_search_cancels_in_flight() {
        let mut session = session(vec![ScriptedSource::new("Stuck", Script::Hang)]);

        let first = session.begin("Goa").unwrap();
        let handle = tokio::spawn(first.run());
        let _second = session.begin("Kerala").unwrap();

        let done = handle.await.unwrap();
        assert!(matches!(done.result, Err(FanOutError::Cancelled)));
        assert_eq!(session.complete(done), SearchOutcome::Superseded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_abandons_search() {
        let mut session = session(vec![ScriptedSource::new("Stuck", Script::Hang)]);
        assert!(!session.cancel());

        let ticket = session.begin("Goa").unwrap();
        assert!(session.cancel());
        assert!(!session.is_loading());
        assert_eq!(session.statuses().count(SourceStatus::Error), 1);

        let done = ticket.run().await;
        assert_eq!(session.complete(done), SearchOutcome::Superseded);
        assert_eq!(session.statuses().count(SourceStatus::Error), 1);
    }

    #[tokio::test]
    async fn test_sort_and_filter_never_dispatch() {
        let source = ScriptedSource::ok("A", &[("Trip", 100.0), ("Other", 5000.0)]);
        let calls = source.calls();
        let mut session = session(vec![source]);
        session.submit("Goa").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        session.set_sort(SortKey::Rating);
        session.set_min_rating(4.0).unwrap();
        session.set_sort(SortKey::Duration);
        let _ = session.view();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(session.view().is_empty());
    }

    #[tokio::test]
    async fn test_refresh() {
        let source = ScriptedSource::ok("A", &[("Trip", 100.0)]);
        let calls = source.calls();
        let mut session = session(vec![source]);

        assert_eq!(session.refresh().await, SearchOutcome::NoDestination);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        session.submit("Goa").await;
        assert!(matches!(session.refresh().await, SearchOutcome::Completed(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.generation(), 2);
    }

    #[tokio::test]
    async fn test_back_keeps_results() {
        let mut session = session(vec![ScriptedSource::ok("A", &[("Trip", 100.0)])]);
        session.submit("Goa").await;
        session.back();

        assert_eq!(session.mode(), ViewMode::Search);
        assert_eq!(session.packages().len(), 1);
        assert_eq!(session.destination().unwrap().as_str(), "Goa");
    }

    #[test]
    fn test_min_rating_bounds() {
        let mut session = session(vec![]);
        assert!(session.set_min_rating(4.5).is_ok());
        assert!(matches!(
            session.set_min_rating(5.5),
            Err(SessionError::InvalidRating(_))
        ));
        assert!(session.set_min_rating(-1.0).is_err());
        assert!((session.min_rating() - 4.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_join_failure_sets_fetch_failed() {
        let recorder = Arc::new(RecordingReporter::default());
        let fan_out = Arc::new(FanOut::new(
            vec![Arc::new(ScriptedSource::ok("A", &[])) as Arc<dyn Source>],
            Duration::from_secs(5),
        ));
        let mut session = SearchSession::new(fan_out, recorder.clone());
        let ticket = session.begin("Goa").unwrap();

        let outcome = session.complete(CompletedSearch {
            generation: ticket.generation(),
            destination: ticket.destination().clone(),
            result: Err(FanOutError::Join {
                reason: "task exploded".into(),
                settled: Vec::new(),
            }),
        });

        assert_eq!(outcome, SearchOutcome::Failed);
        assert_eq!(session.error(), Some(&SessionError::FetchFailed));
        assert!(!session.is_loading());
        assert_eq!(session.mode(), ViewMode::Results);
        assert_eq!(session.statuses().count(SourceStatus::Error), 1);
        assert!(
            recorder
                .events()
                .contains(&"fatal Failed to fetch packages. Please try again.".to_string())
        );
    }

    #[tokio::test]
    async fn test_join_failure_keeps_settled_statuses() {
        let mut session = session(vec![
            ScriptedSource::ok("A", &[("Trip", 100.0)]),
            ScriptedSource::failing("B"),
            ScriptedSource::ok("C", &[]),
        ]);
        let ticket = session.begin("Goa").unwrap();

        let outcome = session.complete(CompletedSearch {
            generation: ticket.generation(),
            destination: ticket.destination().clone(),
            result: Err(FanOutError::Join {
                reason: "task exploded".into(),
                settled: vec![
                    (SourceId::new("A"), SourceStatus::Success),
                    (SourceId::new("B"), SourceStatus::Error),
                ],
            }),
        });

        assert_eq!(outcome, SearchOutcome::Failed);
        let statuses = session.statuses();
        assert_eq!(statuses.get(&SourceId::new("A")), Some(SourceStatus::Success));
        assert_eq!(statuses.get(&SourceId::new("B")), Some(SourceStatus::Error));
        assert_eq!(statuses.get(&SourceId::new("C")), Some(SourceStatus::Error));
        assert!(statuses.all_settled());
    }

    #[tokio::test]
    async fn test_statuses_never_revert_within_search() {
        let mut session = session(goa_sources());
        session.submit("Goa").await;
        let before: Vec<_> = session.statuses().iter().map(|(_, s)| s).collect();

        let mut board = session.statuses().clone();
        for (id, _) in session.statuses().iter() {
            assert!(!board.set(id, SourceStatus::Loading));
        }
        let after: Vec<_> = board.iter().map(|(_, s)| s).collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_snapshot_serializes() {
        let mut session = session(vec![ScriptedSource::ok("A", &[("Trip", 100.0)])]);
        session.submit("Goa").await;
        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(json["destination"], "Goa");
        assert_eq!(json["mode"], "results");
        assert_eq!(json["summary"]["visible"], 1);
        assert_eq!(json["statuses"][0]["status"], "success");
        assert_eq!(json["packages"][0]["source"], "A");
        assert!(json["error"].is_null());
    }
}
