//! Rules tables loader: loot tables, skills and combat actions.

use std::path::Path;

use crawl_core::env::{CombatActionDefinition, LootTable, SkillDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LootCatalog {
    tables: Vec<LootTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SkillCatalog {
    skills: Vec<SkillDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CombatActionCatalog {
    actions: Vec<CombatActionDefinition>,
}

/// Loader for game rules tables.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load_loot(path: &Path) -> LoadResult<Vec<LootTable>> {
        let catalog: LootCatalog = read_ron(path, "loot table")?;
        Ok(catalog.tables)
    }

    pub fn load_skills(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let catalog: SkillCatalog = read_ron(path, "skill catalog")?;
        Ok(catalog.skills)
    }

    /// Load combat actions. A negative cost is rejected here since validation
    /// only checks references.
    pub fn load_combat_actions(path: &Path) -> LoadResult<Vec<CombatActionDefinition>> {
        let catalog: CombatActionCatalog = read_ron(path, "combat action")?;
        if let Some(action) = catalog.actions.iter().find(|action| action.cost < 0) {
            anyhow::bail!("combat action '{}' has negative cost {}", action.key, action.cost);
        }
        Ok(catalog.actions)
    }
}
