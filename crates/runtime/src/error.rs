//! Runtime error types.

use crawl_core::{ContentError, ErrorSeverity, GameError};

use crate::history::HistoryError;
use crate::repository::RepositoryError;

/// Errors surfaced by the session API.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to build the world: {0}")]
    Content(#[from] ContentError),

    #[error("persistence worker is not running")]
    WorkerStopped,

    #[error("background persistence needs a Tokio runtime")]
    NoAsyncRuntime,
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::History(err) => err.severity(),
            Self::Repository(_) | Self::WorkerStopped => ErrorSeverity::Recoverable,
            Self::NoAsyncRuntime => ErrorSeverity::Fatal,
            Self::Content(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::History(err) => err.error_code(),
            Self::Repository(_) => "RUNTIME_REPOSITORY",
            Self::Content(err) => err.error_code(),
            Self::WorkerStopped => "RUNTIME_WORKER_STOPPED",
            Self::NoAsyncRuntime => "RUNTIME_NO_ASYNC_RUNTIME",
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
