//! History engine errors.

use crawl_core::{ErrorSeverity, GameError};

use super::CommitId;

/// Errors raised by history operations.
///
/// Unknown branches and commits are caller mistakes and are returned as
/// such; they never reach the player.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("unknown branch `{0}`")]
    UnknownBranch(String),

    #[error("unknown commit `{0}`")]
    UnknownCommit(CommitId),

    #[error("branch `{0}` already exists")]
    BranchExists(String),

    #[error("history is corrupted: {0}")]
    Corrupted(String),

    #[error("failed to fingerprint snapshot: {0}")]
    Fingerprint(String),
}

impl GameError for HistoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownBranch(_) | Self::UnknownCommit(_) | Self::BranchExists(_) => {
                ErrorSeverity::Validation
            }
            Self::Corrupted(_) | Self::Fingerprint(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownBranch(_) => "HISTORY_UNKNOWN_BRANCH",
            Self::UnknownCommit(_) => "HISTORY_UNKNOWN_COMMIT",
            Self::BranchExists(_) => "HISTORY_BRANCH_EXISTS",
            Self::Corrupted(_) => "HISTORY_CORRUPTED",
            Self::Fingerprint(_) => "HISTORY_FINGERPRINT",
        }
    }
}
