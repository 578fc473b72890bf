//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RepositoryError, Result, SaveDocument, SaveRepository};

/// Stores the save document as a single JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write never leaves a truncated save behind.
pub struct FileSaveRepository {
    path: PathBuf,
}

impl FileSaveRepository {
    /// Create a repository writing to `path`. The parent directory is created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, document: &SaveDocument) -> Result<()> {
        let bytes = document.to_json()?;
        let temp_path = self.temp_path();

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!("Saved {} commits to {}", document.commits.len(), self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path).map_err(RepositoryError::Io)?;
        let document = SaveDocument::from_json(&bytes)?;

        tracing::debug!("Loaded {} commits from {}", document.commits.len(), self.path.display());
        Ok(Some(document))
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::debug!("Deleted save {}", self.path.display());
        }
        Ok(())
    }
}
