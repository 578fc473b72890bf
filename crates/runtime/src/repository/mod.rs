//! Save document storage.
//!
//! A save is one [`SaveDocument`] holding every commit, every branch and the
//! active branch name. Repositories only move whole documents around.

mod document;
mod error;
mod file;
mod memory;
mod traits;

pub use document::{SAVE_FORMAT_VERSION, SaveDocument};
pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;
pub use traits::SaveRepository;
