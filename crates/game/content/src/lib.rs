//! Data-driven content definitions and loaders.
//!
//! This crate reads the static game content from a data directory:
//! - Item, enemy and player catalogs (RON)
//! - Themes, world layout and map definitions (RON)
//! - Loot tables, skills and combat actions (RON)
//! - Dialogue parcels, one file per parcel (RON)
//! - Game configuration (TOML)
//!
//! Content is consumed by the rules through `ContentOracle` and never appears
//! in game state. Loading fails fast: a broken reference anywhere aborts.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActorLoader, ConfigLoader, ContentFactory, DialogueLoader, ItemLoader, LoadResult, MapLoader,
    TablesLoader, WorldFile,
};

/// Directory holding the data set shipped with this crate.
pub fn bundled_data_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
