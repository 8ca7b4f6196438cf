//! Unified UI output interface.
//!
//! Commands and the search session talk to the terminal only through
//! [`Output`], which forwards everything to the UI actor.

use super::actor::{UiActor, UiEvent};
use super::progress::format_elapsed;
use std::sync::{OnceLock, mpsc};
use std::time::Duration;
use tripscan_core::{Reporter, SearchSummary, SessionError};
use tripscan_schema::{Destination, SourceId};

static UI_ACTOR: OnceLock<mpsc::Sender<UiEvent>> = OnceLock::new();

fn actor_sender() -> mpsc::Sender<UiEvent> {
    UI_ACTOR
        .get_or_init(|| {
            let actor = UiActor::spawn();
            let sender = actor.sender();
            // The render thread lives for the rest of the process
            std::mem::forget(actor);
            sender
        })
        .clone()
}

/// A cloneable handle for sending UI events to the terminal actor.
#[derive(Debug, Clone)]
pub struct Output {
    sender: mpsc::Sender<UiEvent>,
}

impl Output {
    pub fn new() -> Self {
        Self {
            sender: actor_sender(),
        }
    }

    fn send(&self, event: UiEvent) {
        let _ = self.sender.send(event);
    }

    pub fn info(&self, msg: &str) {
        self.send(UiEvent::Info(msg.to_string()));
    }

    pub fn success(&self, msg: &str) {
        self.send(UiEvent::Success(msg.to_string()));
    }

    pub fn warning(&self, msg: &str) {
        self.send(UiEvent::Warning(msg.to_string()));
    }

    pub fn error(&self, msg: &str) {
        self.send(UiEvent::Error(msg.to_string()));
    }

    /// Wait until all pending UI events are rendered.
    pub async fn wait_async(&self) {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.send(UiEvent::Sync(tx));
        let _ = rx.await;
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Footer line for a finished search.
pub fn summary_line(summary: &SearchSummary) -> String {
    let total = summary.succeeded + summary.failed;
    let mut line = format!(
        "{} package{} from {} of {total} sources, elapsed {}",
        summary.packages,
        if summary.packages == 1 { "" } else { "s" },
        summary.succeeded,
        format_elapsed(summary.elapsed),
    );
    if summary.duplicates > 0 {
        line.push_str(&format!(" ({} duplicates removed)", summary.duplicates));
    }
    line
}

impl Reporter for Output {
    fn search_started(&self, destination: &Destination, sources: &[SourceId]) {
        self.send(UiEvent::SearchStarted {
            destination: destination.to_string(),
            sources: sources.to_vec(),
        });
    }

    fn source_loading(&self, source: &SourceId) {
        self.send(UiEvent::Loading(source.clone()));
    }

    fn source_succeeded(&self, source: &SourceId, count: usize, elapsed: Duration) {
        self.send(UiEvent::Succeeded {
            source: source.clone(),
            count,
            elapsed,
        });
    }

    fn source_failed(&self, source: &SourceId, reason: &str, elapsed: Duration) {
        self.send(UiEvent::Failed {
            source: source.clone(),
            reason: reason.to_string(),
            elapsed,
        });
    }

    fn search_finished(&self, summary: &SearchSummary) {
        if summary.packages == 0 {
            self.warning(&SessionError::NoPackages.to_string());
        } else {
            self.success(&summary_line(summary));
        }
    }

    fn info(&self, msg: &str) {
        Output::info(self, msg);
    }

    fn warning(&self, msg: &str) {
        Output::warning(self, msg);
    }

    fn error(&self, msg: &str) {
        Output::error(self, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(packages: usize, duplicates: usize) -> SearchSummary {
        SearchSummary {
            destination: Destination::parse("Goa").unwrap(),
            packages,
            duplicates,
            succeeded: 5,
            failed: 1,
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(&summary(5, 0)),
            "5 packages from 5 of 6 sources, elapsed 1.5s"
        );
        assert_eq!(
            summary_line(&summary(1, 2)),
            "1 package from 5 of 6 sources, elapsed 1.5s (2 duplicates removed)"
        );
    }

    #[tokio::test]
    async fn test_output_clone_shares_actor() {
        let output = Output::new();
        let clone = output.clone();
        output.info("from original");
        clone.info("from clone");
        clone.wait_async().await;
    }
}
