//! Dialogue parcel loader.

use std::path::Path;

use crawl_core::env::DialogueParcel;

use crate::loaders::{LoadResult, read_ron};

/// Loader for dialogue parcels, one RON file per parcel.
pub struct DialogueLoader;

impl DialogueLoader {
    pub fn load(path: &Path) -> LoadResult<DialogueParcel> {
        read_ron(path, "dialogue parcel")
    }

    /// Load every `*.ron` file in `dir`, sorted by file name.
    ///
    /// A missing directory yields no parcels.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<DialogueParcel>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| Self::load(path)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_has_no_parcels() {
        let dir = tempfile::tempdir().unwrap();
        let parcels = DialogueLoader::load_dir(&dir.path().join("dialogue")).unwrap();
        assert!(parcels.is_empty());
    }

    #[test]
    fn non_ron_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a parcel").unwrap();
        std::fs::write(
            dir.path().join("hermit.ron"),
            r#"(
                key: "hermit",
                speaker: "Hermit",
                start: "hello",
                nodes: {
                    "hello": (text: "Leave me be."),
                },
            )"#,
        )
        .unwrap();

        let parcels = DialogueLoader::load_dir(dir.path()).unwrap();
        assert_eq!(parcels.len(), 1);
        assert_eq!(parcels[0].speaker, "Hermit");
        assert!(parcels[0].node("hello").unwrap().choices.is_empty());
    }
}
