//! Topic-based event routing.
//!
//! The bus doubles as the engine's phase observer, so frontends learn about
//! phase changes the same way they learn about commits and saves.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{Event, HistoryEvent, PersistenceEvent};
