//! Background workers.

mod persistence;

pub use persistence::{PersistenceHandle, PersistenceWorker};
