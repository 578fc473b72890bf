//! Player template and enemy catalog loader.

use std::path::Path;

use crawl_core::env::{EnemyDefinition, PlayerDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyDefinition>,
}

/// Loader for actor content from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load the enemy catalog.
    pub fn load_enemies(path: &Path) -> LoadResult<Vec<EnemyDefinition>> {
        let catalog: EnemyCatalog = read_ron(path, "enemy catalog")?;
        Ok(catalog.enemies)
    }

    /// Load the player starting template.
    pub fn load_player(path: &Path) -> LoadResult<PlayerDefinition> {
        read_ron(path, "player definition")
    }
}
