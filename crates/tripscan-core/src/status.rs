//! Per-source status tracking for the current search.

use serde::Serialize;
use tripscan_schema::{SourceId, SourceStatus};

/// Status of every configured source, kept in configured order.
///
/// Transitions are forward-only; a stale or backwards update is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatusBoard {
    entries: Vec<StatusEntry>,
}

/// One row of a [`StatusBoard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// The configured source.
    pub source: SourceId,
    /// Where it is in the current search.
    pub status: SourceStatus,
}

impl StatusBoard {
    /// A board with every source pending.
    pub fn new(sources: &[SourceId]) -> Self {
        Self {
            entries: sources
                .iter()
                .map(|source| StatusEntry {
                    source: source.clone(),
                    status: SourceStatus::Pending,
                })
                .collect(),
        }
    }

    /// Start a fresh search: every source back to pending, then loading.
    ///
    /// This is the only way a status moves backwards.
    pub fn reset_loading(&mut self, sources: &[SourceId]) {
        *self = Self::new(sources);
        for entry in &mut self.entries {
            entry.status = SourceStatus::Loading;
        }
    }

    /// Advance `source` to `status`. Returns false if the source is unknown
    /// or the transition would move backwards.
    pub fn set(&mut self, source: &SourceId, status: SourceStatus) -> bool {
        match self.entries.iter_mut().find(|e| &e.source == source) {
            Some(entry) if entry.status.can_advance_to(status) => {
                entry.status = status;
                true
            }
            _ => false,
        }
    }

    /// Settle every still-unsettled source as an error.
    pub fn fail_unsettled(&mut self) {
        for entry in &mut self.entries {
            if !entry.status.is_settled() {
                entry.status = SourceStatus::Error;
            }
        }
    }

    /// Status of `source`, or None if it is not configured.
    pub fn get(&self, source: &SourceId) -> Option<SourceStatus> {
        self.entries
            .iter()
            .find(|e| &e.source == source)
            .map(|e| e.status)
    }

    /// Entries in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (&SourceId, SourceStatus)> {
        self.entries.iter().map(|e| (&e.source, e.status))
    }

    /// How many sources are in `status`.
    pub fn count(&self, status: SourceStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Number of configured sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sources are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every source reached `success` or `error`.
    pub fn all_settled(&self) -> bool {
        self.entries.iter().all(|e| e.status.is_settled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<SourceId> {
        ["A", "B", "C"].into_iter().map(SourceId::new).collect()
    }

    #[test]
    fn test_reset_marks_all_loading() {
        let mut board = StatusBoard::new(&ids());
        assert_eq!(board.count(SourceStatus::Pending), 3);

        board.reset_loading(&ids());
        assert_eq!(board.count(SourceStatus::Loading), 3);
        assert!(!board.all_settled());
    }

    #[test]
    fn test_set_is_forward_only() {
        let mut board = StatusBoard::new(&ids());
        board.reset_loading(&ids());
        let a = SourceId::new("A");

        assert!(board.set(&a, SourceStatus::Success));
        assert!(!board.set(&a, SourceStatus::Loading));
        assert!(!board.set(&a, SourceStatus::Error));
        assert_eq!(board.get(&a), Some(SourceStatus::Success));

        assert!(!board.set(&SourceId::new("Z"), SourceStatus::Success));
    }

    #[test]
    fn test_fail_unsettled_keeps_successes() {
        let mut board = StatusBoard::new(&ids());
        board.reset_loading(&ids());
        board.set(&SourceId::new("B"), SourceStatus::Success);
        board.fail_unsettled();

        let statuses: Vec<_> = board.iter().map(|(_, s)| s).collect();
        assert_eq!(
            statuses,
            [SourceStatus::Error, SourceStatus::Success, SourceStatus::Error]
        );
        assert!(board.all_settled());
    }

    #[test]
    fn test_serializes_in_configured_order() {
        let board = StatusBoard::new(&ids());
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(
            json,
            r#"[{"source":"A","status":"pending"},{"source":"B","status":"pending"},{"source":"C","status":"pending"}]"#
        );
    }
}
