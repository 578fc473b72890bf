//! Content factory for building the content oracle from data files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crawl_core::{ContentTables, GameConfig};

use crate::loaders::{
    ActorLoader, ConfigLoader, DialogueLoader, ItemLoader, LoadResult, MapLoader, TablesLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── player.ron
/// ├── items.ron
/// ├── enemies.ron
/// ├── themes.ron
/// ├── world.ron
/// ├── loot.ron
/// ├── skills.ron
/// ├── combat_actions.ron
/// └── dialogue/
///     ├── elder.ron
///     └── ...
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    ///
    /// A data set without a config file runs on defaults.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config.toml, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load, assemble and validate every content table.
    ///
    /// Fails on the first unreadable file, duplicate key or broken
    /// reference.
    pub fn load_content(&self) -> LoadResult<ContentTables> {
        let player = ActorLoader::load_player(&self.path("player.ron"))?;
        let world = MapLoader::load_world(&self.path("world.ron"))?;
        let mut tables = ContentTables::new(player, world.definition());

        let items = ItemLoader::load(&self.path("items.ron"))?;
        ensure_unique("item", items.iter().map(|def| def.key.as_str()))?;
        items.into_iter().for_each(|def| tables.insert_item(def));

        let enemies = ActorLoader::load_enemies(&self.path("enemies.ron"))?;
        ensure_unique("enemy", enemies.iter().map(|def| def.key.as_str()))?;
        enemies.into_iter().for_each(|def| tables.insert_enemy(def));

        let themes = MapLoader::load_themes(&self.path("themes.ron"))?;
        ensure_unique("theme", themes.iter().map(|def| def.key.as_str()))?;
        themes.into_iter().for_each(|def| tables.insert_theme(def));

        ensure_unique("map", world.maps.iter().map(|def| def.id.as_str()))?;
        world.maps.into_iter().for_each(|def| tables.insert_map(def));

        let loot = TablesLoader::load_loot(&self.path("loot.ron"))?;
        ensure_unique("loot table", loot.iter().map(|def| def.key.as_str()))?;
        loot.into_iter().for_each(|def| tables.insert_loot_table(def));

        let skills = TablesLoader::load_skills(&self.path("skills.ron"))?;
        ensure_unique("skill", skills.iter().map(|def| def.key.as_str()))?;
        skills.into_iter().for_each(|def| tables.insert_skill(def));

        let actions = TablesLoader::load_combat_actions(&self.path("combat_actions.ron"))?;
        ensure_unique("combat action", actions.iter().map(|def| def.key.as_str()))?;
        actions
            .into_iter()
            .for_each(|def| tables.insert_combat_action(def));

        let dialogues = DialogueLoader::load_dir(&self.path("dialogue"))?;
        ensure_unique("dialogue", dialogues.iter().map(|def| def.key.as_str()))?;
        dialogues
            .into_iter()
            .for_each(|def| tables.insert_dialogue(def));

        tables
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid content in {}: {}", self.data_dir.display(), e))?;

        tracing::debug!(data_dir = %self.data_dir.display(), "content loaded");
        Ok(tables)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}

fn ensure_unique<'a>(kind: &str, keys: impl Iterator<Item = &'a str>) -> LoadResult<()> {
    let mut seen = BTreeSet::new();
    for key in keys {
        if !seen.insert(key) {
            anyhow::bail!("duplicate {} key '{}'", kind, key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = ensure_unique("item", ["potion", "scroll", "potion"].into_iter()).unwrap_err();
        assert!(err.to_string().contains("duplicate item key 'potion'"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContentFactory::new(dir.path()).load_config().unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
