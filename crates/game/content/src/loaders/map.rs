//! World layout, map definition and theme loader.
//!
//! Maps are generated at runtime; these files only describe how each map is
//! sized, themed, linked and populated.

use std::path::Path;

use crawl_core::env::{MapDefinition, ThemeDefinition, WorldDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// World file structure: the start map plus every map definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldFile {
    pub start_map: String,
    pub maps: Vec<MapDefinition>,
}

impl WorldFile {
    pub fn definition(&self) -> WorldDefinition {
        WorldDefinition {
            start_map: self.start_map.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThemeCatalog {
    themes: Vec<ThemeDefinition>,
}

/// Loader for world and theme data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load the world file.
    pub fn load_world(path: &Path) -> LoadResult<WorldFile> {
        let world: WorldFile = read_ron(path, "world")?;
        for map in &world.maps {
            if map.width == 0 || map.height == 0 {
                anyhow::bail!("map '{}' has an empty size {}x{}", map.id, map.width, map.height);
            }
        }
        Ok(world)
    }

    /// Load the theme catalog.
    pub fn load_themes(path: &Path) -> LoadResult<Vec<ThemeDefinition>> {
        let catalog: ThemeCatalog = read_ron(path, "theme catalog")?;
        Ok(catalog.themes)
    }
}
