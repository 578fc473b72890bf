//! Session orchestration for the dungeon simulation.
//!
//! This crate wraps the deterministic rules from `crawl-core` in a session
//! object that owns the live world, records every settled turn in a
//! commit/branch history, and persists that history in the background.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session and its builder
//! - [`history`] stores commits and branch pointers
//! - [`repository`] encodes and stores save documents
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` keeps background tasks internal to the crate
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod repository;
pub mod session;
pub mod utils;

mod workers;

pub use config::{RuntimeConfig, default_save_path};
pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, HistoryEvent, PersistenceEvent, Topic};
pub use history::{Commit, CommitId, History, HistoryError, MAIN_BRANCH};
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, SAVE_FORMAT_VERSION,
    SaveDocument, SaveRepository,
};
pub use session::{Session, SessionBuilder};
pub use workers::PersistenceHandle;
