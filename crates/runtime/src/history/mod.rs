//! Commit/branch history of world snapshots.
//!
//! Every commit stores a full deep copy of the world state; no snapshot
//! aliases live state or another commit. Branches are named pointers to
//! commits and exactly one branch is active. Committing rebinds the active
//! branch to the new commit.

mod error;

pub use error::HistoryError;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crawl_core::GameState;
use serde::{Deserialize, Serialize};

use crate::repository::{SAVE_FORMAT_VERSION, SaveDocument};
use crate::utils::hash::commit_digest;

/// Branch every fresh history starts on.
pub const MAIN_BRANCH: &str = "main";

/// Hex-encoded SHA-256 commit identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters, for logs.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable point-in-time snapshot of the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    pub parent: Option<CommitId>,
    /// Position in commit order across the whole history.
    pub sequence: u64,
    pub state: GameState,
}

/// Commit store plus branch pointers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    commits: BTreeMap<CommitId, Arc<Commit>>,
    branches: BTreeMap<String, CommitId>,
    active: String,
    next_sequence: u64,
}

impl History {
    /// Starts a history with one commit holding `initial`, on branch `main`.
    pub fn new(initial: &GameState) -> Result<Self, HistoryError> {
        let mut history = Self {
            commits: BTreeMap::new(),
            branches: BTreeMap::new(),
            active: MAIN_BRANCH.to_owned(),
            next_sequence: 0,
        };
        history.commit(initial)?;
        Ok(history)
    }

    /// Deep-copies `state` into a new commit and moves the active branch to it.
    pub fn commit(&mut self, state: &GameState) -> Result<CommitId, HistoryError> {
        let parent = self.branches.get(&self.active).cloned();
        let sequence = self.next_sequence;
        let id = commit_digest(parent.as_ref().map(CommitId::as_str), sequence, state)
            .map(CommitId)
            .map_err(|e| HistoryError::Fingerprint(e.to_string()))?;

        self.commits.insert(
            id.clone(),
            Arc::new(Commit {
                id: id.clone(),
                parent,
                sequence,
                state: state.clone(),
            }),
        );
        self.branches.insert(self.active.clone(), id.clone());
        self.next_sequence += 1;

        tracing::debug!(commit = id.short(), branch = %self.active, sequence, "committed");
        Ok(id)
    }

    pub fn get_commit(&self, id: &CommitId) -> Option<&Commit> {
        self.commits.get(id).map(Arc::as_ref)
    }

    /// Creates branch `name` pointing at `from`. The active branch is unchanged.
    pub fn create_branch(&mut self, name: &str, from: &CommitId) -> Result<(), HistoryError> {
        if !self.commits.contains_key(from) {
            return Err(HistoryError::UnknownCommit(from.clone()));
        }
        if self.branches.contains_key(name) {
            return Err(HistoryError::BranchExists(name.to_owned()));
        }
        self.branches.insert(name.to_owned(), from.clone());
        tracing::debug!(branch = name, from = from.short(), "branch created");
        Ok(())
    }

    /// Makes `name` the active branch and returns its head snapshot.
    pub fn checkout(&mut self, name: &str) -> Result<&GameState, HistoryError> {
        if !self.branches.contains_key(name) {
            return Err(HistoryError::UnknownBranch(name.to_owned()));
        }
        self.active = name.to_owned();
        tracing::debug!(branch = name, "checked out");
        self.current_state()
    }

    pub fn branch_head(&self, name: &str) -> Option<&CommitId> {
        self.branches.get(name)
    }

    /// Head of the active branch.
    pub fn head(&self) -> Option<&CommitId> {
        self.branches.get(&self.active)
    }

    pub fn current_branch(&self) -> &str {
        &self.active
    }

    /// Snapshot at the head of the active branch.
    pub fn current_state(&self) -> Result<&GameState, HistoryError> {
        let head = self
            .head()
            .ok_or_else(|| HistoryError::UnknownBranch(self.active.clone()))?;
        self.commits
            .get(head)
            .map(|commit| &commit.state)
            .ok_or_else(|| HistoryError::Corrupted(format!("branch head `{head}` has no commit")))
    }

    pub fn branches(&self) -> impl Iterator<Item = (&str, &CommitId)> {
        self.branches.iter().map(|(name, id)| (name.as_str(), id))
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// The history in its persisted form.
    ///
    /// Commit snapshots are shared, not copied, so the cost grows with the
    /// number of commits rather than with their total size.
    pub fn to_document(&self) -> SaveDocument {
        SaveDocument {
            version: SAVE_FORMAT_VERSION,
            commits: self.commits.clone(),
            branches: self.branches.clone(),
            active_branch: self.active.clone(),
        }
    }

    /// Rebuilds a history from a save, checking that it is self-consistent.
    pub fn from_document(document: SaveDocument) -> Result<Self, HistoryError> {
        for (key, commit) in &document.commits {
            if key != &commit.id {
                return Err(HistoryError::Corrupted(format!(
                    "commit stored under `{key}` claims id `{}`",
                    commit.id
                )));
            }
            if let Some(parent) = &commit.parent
                && !document.commits.contains_key(parent)
            {
                return Err(HistoryError::Corrupted(format!(
                    "commit `{key}` has unknown parent `{parent}`"
                )));
            }
        }
        for (name, head) in &document.branches {
            if !document.commits.contains_key(head) {
                return Err(HistoryError::Corrupted(format!(
                    "branch `{name}` points at unknown commit `{head}`"
                )));
            }
        }
        if !document.branches.contains_key(&document.active_branch) {
            return Err(HistoryError::Corrupted(format!(
                "active branch `{}` does not exist",
                document.active_branch
            )));
        }

        let next_sequence = document
            .commits
            .values()
            .map(|commit| commit.sequence + 1)
            .max()
            .unwrap_or(0);
        Ok(Self {
            commits: document.commits,
            branches: document.branches,
            active: document.active_branch,
            next_sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(depth: u32) -> GameState {
        let mut state = GameState::new(9, 10);
        state.depth = depth;
        state
    }

    #[test]
    fn fresh_history_has_main_at_the_initial_commit() {
        let history = History::new(&state(1)).unwrap();
        assert_eq!(history.current_branch(), MAIN_BRANCH);
        assert_eq!(history.commit_count(), 1);
        assert_eq!(history.current_state().unwrap(), &state(1));
    }

    #[test]
    fn commit_moves_the_active_branch() {
        let mut history = History::new(&state(1)).unwrap();
        let first = history.head().cloned().unwrap();
        let second = history.commit(&state(2)).unwrap();

        assert_ne!(first, second);
        assert_eq!(history.branch_head(MAIN_BRANCH), Some(&second));
        assert_eq!(history.get_commit(&second).unwrap().parent, Some(first));
        assert_eq!(history.current_state().unwrap().depth, 2);
    }

    #[test]
    fn committing_the_same_state_twice_gives_distinct_ids() {
        let mut history = History::new(&state(1)).unwrap();
        let a = history.commit(&state(1)).unwrap();
        let b = history.commit(&state(1)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn stored_snapshots_do_not_alias_the_caller() {
        let mut live = state(1);
        let mut history = History::new(&live).unwrap();
        let id = history.commit(&live).unwrap();

        live.depth = 99;

        assert_eq!(history.get_commit(&id).unwrap().state.depth, 1);
    }

    #[test]
    fn checkout_of_unknown_branch_fails() {
        let mut history = History::new(&state(1)).unwrap();
        assert_eq!(
            history.checkout("nope"),
            Err(HistoryError::UnknownBranch("nope".into()))
        );
        assert_eq!(history.current_branch(), MAIN_BRANCH);
    }

    #[test]
    fn branch_from_unknown_commit_fails() {
        let mut history = History::new(&state(1)).unwrap();
        let missing = CommitId::new("deadbeef");
        assert_eq!(
            history.create_branch("alt", &missing),
            Err(HistoryError::UnknownCommit(missing))
        );
    }

    #[test]
    fn duplicate_branch_is_rejected() {
        let mut history = History::new(&state(1)).unwrap();
        let head = history.head().cloned().unwrap();
        assert_eq!(
            history.create_branch(MAIN_BRANCH, &head),
            Err(HistoryError::BranchExists(MAIN_BRANCH.into()))
        );
    }

    #[test]
    fn checkout_returns_the_branch_head_snapshot() {
        let mut history = History::new(&state(1)).unwrap();
        let root = history.head().cloned().unwrap();
        history.commit(&state(2)).unwrap();
        history.create_branch("alt", &root).unwrap();

        let checked_out = history.checkout("alt").unwrap().clone();
        let head = history.branch_head("alt").unwrap();
        assert_eq!(&checked_out, &history.get_commit(head).unwrap().state);
        assert_eq!(checked_out.depth, 1);

        // New commits land on the checked-out branch only.
        history.commit(&state(5)).unwrap();
        assert_eq!(history.current_state().unwrap().depth, 5);
        history.checkout(MAIN_BRANCH).unwrap();
        assert_eq!(history.current_state().unwrap().depth, 2);
    }

    #[test]
    fn document_round_trip_keeps_sequence_going() {
        let mut history = History::new(&state(1)).unwrap();
        history.commit(&state(2)).unwrap();

        let mut restored = History::from_document(history.to_document()).unwrap();
        assert_eq!(restored, history);

        let id = restored.commit(&state(3)).unwrap();
        assert_eq!(restored.get_commit(&id).unwrap().sequence, 2);
    }

    #[test]
    fn documents_share_snapshots_with_the_history() {
        let mut history = History::new(&state(1)).unwrap();
        history.commit(&state(2)).unwrap();

        let document = history.to_document();
        assert_eq!(document.commits.len(), 2);
        for (id, commit) in &document.commits {
            assert!(Arc::ptr_eq(commit, &history.commits[id]));
        }
    }

    #[test]
    fn dangling_branch_is_corruption() {
        let history = History::new(&state(1)).unwrap();
        let mut document = history.to_document();
        document
            .branches
            .insert("ghost".into(), CommitId::new("missing"));
        assert!(matches!(
            History::from_document(document),
            Err(HistoryError::Corrupted(_))
        ));
    }

    #[test]
    fn missing_active_branch_is_corruption() {
        let history = History::new(&state(1)).unwrap();
        let mut document = history.to_document();
        document.active_branch = "elsewhere".into();
        assert!(matches!(
            History::from_document(document),
            Err(HistoryError::Corrupted(_))
        ));
    }
}
