//! UI Actor - Single-threaded event processing
//!
//! Adapter tasks settle on tokio worker threads in any order, but terminal
//! output is strictly serial. Every UI event is therefore sent over a channel
//! to one render thread, which exclusively owns the [`SourceBoard`] state.
use super::board::{RowState, Severity, SourceBoard};
use super::buffer::OutputBuffer;
use super::theme::Theme;
use std::io::IsTerminal;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tripscan_schema::SourceId;

/// Events that can be sent to the UI actor
#[derive(Debug)]
pub enum UiEvent {
    /// A search was dispatched; lay out one row per source
    SearchStarted {
        destination: String,
        sources: Vec<SourceId>,
    },
    /// A source is in flight
    Loading(SourceId),
    /// A source returned packages
    Succeeded {
        source: SourceId,
        count: usize,
        elapsed: Duration,
    },
    /// A source failed, timed out or panicked
    Failed {
        source: SourceId,
        reason: String,
        elapsed: Duration,
    },
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
    /// Reply once every earlier event has been rendered
    Sync(tokio::sync::oneshot::Sender<()>),
    Shutdown,
}

/// Handle to the UI actor thread
#[derive(Debug)]
pub struct UiActor {
    sender: mpsc::Sender<UiEvent>,
    _handle: thread::JoinHandle<()>,
}

impl UiActor {
    pub fn spawn() -> Self {
        let (sender, receiver) = mpsc::channel();
        let live = std::io::stdout().is_terminal();
        let handle = thread::spawn(move || run_event_loop(&receiver, live));
        Self {
            sender,
            _handle: handle,
        }
    }

    pub fn sender(&self) -> mpsc::Sender<UiEvent> {
        self.sender.clone()
    }
}

impl Drop for UiActor {
    fn drop(&mut self) {
        let _ = self.sender.send(UiEvent::Shutdown);
    }
}

fn run_event_loop(receiver: &mpsc::Receiver<UiEvent>, live: bool) {
    let mut buffer = OutputBuffer::default();
    let theme = Theme::default();
    let mut board = SourceBoard::new(theme.clone(), live);

    loop {
        // 100ms timeout drives the blink animation
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(UiEvent::SearchStarted {
                destination,
                sources,
            }) => {
                let title = format!("Searching {} sources for {destination}", sources.len());
                board.prepare(&mut buffer, &title, &sources);
            }
            Ok(UiEvent::Loading(source)) => {
                board.update(&source, RowState::Loading);
            }
            Ok(UiEvent::Succeeded {
                source,
                count,
                elapsed,
            }) => {
                board.update(&source, RowState::Success { count, elapsed });
            }
            Ok(UiEvent::Failed {
                source,
                reason,
                elapsed,
            }) => {
                board.update(&source, RowState::Failed { reason, elapsed });
            }
            Ok(UiEvent::Info(msg)) => {
                buffer.write_styled(&format!("  {} {msg}", theme.icons.info));
                buffer.flush();
            }
            Ok(UiEvent::Success(msg)) => board.print_footer(&mut buffer, &msg, Severity::Success),
            Ok(UiEvent::Warning(msg)) => board.print_footer(&mut buffer, &msg, Severity::Warning),
            Ok(UiEvent::Error(msg)) => board.print_footer(&mut buffer, &msg, Severity::Error),
            Ok(UiEvent::Sync(tx)) => {
                let _ = tx.send(());
            }
            Ok(UiEvent::Shutdown) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => board.render_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_processes_and_syncs() {
        let actor = UiActor::spawn();
        let sender = actor.sender();
        sender.send(UiEvent::Info("test".to_string())).unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel();
        sender.send(UiEvent::Sync(tx)).unwrap();
        rx.blocking_recv().unwrap();
    }
}
