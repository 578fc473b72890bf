//! In-memory SaveRepository implementation for tests and local runs.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{RepositoryError, Result, SaveDocument, SaveRepository};

/// Keeps the save document in memory and counts writes.
#[derive(Default)]
pub struct InMemorySaveRepository {
    document: RwLock<Option<SaveDocument>>,
    saves: AtomicUsize,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an existing save.
    pub fn with_document(document: SaveDocument) -> Self {
        Self {
            document: RwLock::new(Some(document)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn save(&self, document: &SaveDocument) -> Result<()> {
        let mut slot = self
            .document
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(document.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveDocument>> {
        let slot = self
            .document
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slot.clone())
    }

    fn exists(&self) -> bool {
        self.document
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    fn delete(&self) -> Result<()> {
        let mut slot = self
            .document
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }
}
