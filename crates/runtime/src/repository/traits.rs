//! Repository contract for the save document.

use super::{Result, SaveDocument};

/// Storage for the single save document.
///
/// `load` returning `Ok(None)` means no save exists, which callers treat as
/// "start fresh".
pub trait SaveRepository: Send + Sync {
    /// Replace the stored document.
    fn save(&self, document: &SaveDocument) -> Result<()>;

    /// Load the stored document, if any.
    fn load(&self) -> Result<Option<SaveDocument>>;

    /// Check if a save exists.
    fn exists(&self) -> bool;

    /// Delete the save. Deleting a missing save is not an error.
    fn delete(&self) -> Result<()>;
}
