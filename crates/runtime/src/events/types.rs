//! Event payloads published on the bus.

use crawl_core::PhaseChange;

use crate::history::CommitId;

/// History bookkeeping notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    Committed { id: CommitId, branch: String },
    BranchCreated { name: String, from: CommitId },
    CheckedOut { branch: String, head: CommitId },
}

/// Outcome of background save requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceEvent {
    Saved { commits: usize },
    /// The write failed; gameplay continued regardless.
    SaveFailed { reason: String },
    /// The save queue was full and this save was skipped.
    SaveDropped,
}

/// Event wrapper routed by topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PhaseChanged(PhaseChange),
    History(HistoryEvent),
    Persistence(PersistenceEvent),
}
