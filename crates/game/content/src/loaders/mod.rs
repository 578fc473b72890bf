//! Content loaders for reading game data from files.
//!
//! Every loader turns one RON/TOML file (or directory) into crawl-core
//! content definitions; [`ContentFactory`] assembles and validates them.

pub mod actors;
pub mod config;
pub mod dialogue;
pub mod factory;
pub mod item;
pub mod map;
pub mod tables;

pub use actors::ActorLoader;
pub use config::ConfigLoader;
pub use dialogue::DialogueLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use map::{MapLoader, WorldFile};
pub use tables::TablesLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Reads and parses a RON document, naming `what` in the error.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON at {}: {}", what, path.display(), e))
}
