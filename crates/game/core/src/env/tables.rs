//! In-memory content tables.

use std::collections::BTreeMap;

use super::{
    CombatActionDefinition, ContentError, ContentKind, ContentOracle, DialogueParcel,
    EnemyDefinition, ItemDefinition, LootTable, MapDefinition, PlayerDefinition,
    REQUIRED_COMBAT_ACTIONS, SkillDefinition, SkillKind, ThemeDefinition, WorldDefinition,
};

/// Keyed content documents backing [`ContentOracle`].
///
/// Built by the content loaders (or directly in tests) and checked once with
/// [`ContentTables::validate`] before play starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentTables {
    pub player: PlayerDefinition,
    pub world: WorldDefinition,
    pub items: BTreeMap<String, ItemDefinition>,
    pub enemies: BTreeMap<String, EnemyDefinition>,
    pub themes: BTreeMap<String, ThemeDefinition>,
    pub maps: BTreeMap<String, MapDefinition>,
    pub dialogues: BTreeMap<String, DialogueParcel>,
    pub skills: BTreeMap<String, SkillDefinition>,
    pub combat_actions: BTreeMap<String, CombatActionDefinition>,
    pub loot_tables: BTreeMap<String, LootTable>,
}

impl ContentTables {
    pub fn new(player: PlayerDefinition, world: WorldDefinition) -> Self {
        Self {
            player,
            world,
            items: BTreeMap::new(),
            enemies: BTreeMap::new(),
            themes: BTreeMap::new(),
            maps: BTreeMap::new(),
            dialogues: BTreeMap::new(),
            skills: BTreeMap::new(),
            combat_actions: BTreeMap::new(),
            loot_tables: BTreeMap::new(),
        }
    }

    pub fn insert_item(&mut self, def: ItemDefinition) {
        self.items.insert(def.key.clone(), def);
    }

    pub fn insert_enemy(&mut self, def: EnemyDefinition) {
        self.enemies.insert(def.key.clone(), def);
    }

    pub fn insert_theme(&mut self, def: ThemeDefinition) {
        self.themes.insert(def.key.clone(), def);
    }

    pub fn insert_map(&mut self, def: MapDefinition) {
        self.maps.insert(def.id.clone(), def);
    }

    pub fn insert_dialogue(&mut self, def: DialogueParcel) {
        self.dialogues.insert(def.key.clone(), def);
    }

    pub fn insert_skill(&mut self, def: SkillDefinition) {
        self.skills.insert(def.key.clone(), def);
    }

    pub fn insert_combat_action(&mut self, def: CombatActionDefinition) {
        self.combat_actions.insert(def.key.clone(), def);
    }

    pub fn insert_loot_table(&mut self, def: LootTable) {
        self.loot_tables.insert(def.key.clone(), def);
    }

    /// Checks every cross reference. The first problem found is returned.
    pub fn validate(&self) -> Result<(), ContentError> {
        for key in REQUIRED_COMBAT_ACTIONS {
            if !self.combat_actions.contains_key(key) {
                return Err(ContentError::missing(ContentKind::CombatAction, key));
            }
        }

        if !self.maps.contains_key(&self.world.start_map) {
            return Err(ContentError::broken(
                "world",
                ContentKind::Map,
                &self.world.start_map,
            ));
        }

        self.validate_player()?;

        for enemy in self.enemies.values() {
            if enemy.hp <= 0 {
                return Err(ContentError::invalid(
                    ContentKind::Enemy,
                    &enemy.key,
                    "hp must be positive",
                ));
            }
        }

        for theme in self.themes.values() {
            let owner = format!("theme `{}`", theme.key);
            self.require_items(&owner, &theme.items)?;
            for enemy in &theme.enemies {
                if !self.enemies.contains_key(enemy) {
                    return Err(ContentError::broken(&owner, ContentKind::Enemy, enemy));
                }
            }
            if theme.enemy_count.0 > theme.enemy_count.1 || theme.item_count.0 > theme.item_count.1
            {
                return Err(ContentError::invalid(
                    ContentKind::Theme,
                    &theme.key,
                    "count ranges must be (min, max)",
                ));
            }
        }

        for map in self.maps.values() {
            self.validate_map(map)?;
        }

        for table in self.loot_tables.values() {
            let owner = format!("loot table `{}`", table.key);
            for entry in &table.entries {
                if !self.items.contains_key(&entry.item) {
                    return Err(ContentError::broken(&owner, ContentKind::Item, &entry.item));
                }
            }
            if table.entries.iter().map(|entry| entry.weight).sum::<u32>() == 0 {
                return Err(ContentError::invalid(
                    ContentKind::LootTable,
                    &table.key,
                    "total weight must be positive",
                ));
            }
        }

        for parcel in self.dialogues.values() {
            if parcel.node(&parcel.start).is_none() {
                return Err(ContentError::broken(
                    format!("dialogue `{}`", parcel.key),
                    ContentKind::DialogueNode,
                    &parcel.start,
                ));
            }
        }

        for skill in self.skills.values() {
            if let SkillKind::Active { action } = &skill.kind
                && !self.combat_actions.contains_key(action)
            {
                return Err(ContentError::broken(
                    format!("skill `{}`", skill.key),
                    ContentKind::CombatAction,
                    action,
                ));
            }
        }

        Ok(())
    }

    fn validate_player(&self) -> Result<(), ContentError> {
        self.require_items("player", &self.player.inventory)?;
        self.require_items("player", &self.player.equipment)?;
        for key in &self.player.equipment {
            if self.items.get(key).is_some_and(|item| item.equipment.is_none()) {
                return Err(ContentError::invalid(
                    ContentKind::Item,
                    key,
                    "starting equipment must be equippable",
                ));
            }
        }
        for skill in &self.player.skills {
            if !self.skills.contains_key(skill) {
                return Err(ContentError::broken("player", ContentKind::Skill, skill));
            }
        }
        Ok(())
    }

    fn validate_map(&self, map: &MapDefinition) -> Result<(), ContentError> {
        let owner = format!("map `{}`", map.id);
        if !self.themes.contains_key(&map.theme) {
            return Err(ContentError::broken(&owner, ContentKind::Theme, &map.theme));
        }
        for link in map.above.iter().chain(map.below.iter()) {
            if !self.maps.contains_key(link) {
                return Err(ContentError::broken(&owner, ContentKind::Map, link));
            }
        }
        for portal in &map.portals {
            let target = self
                .maps
                .get(&portal.target_map)
                .ok_or_else(|| ContentError::broken(&owner, ContentKind::Map, &portal.target_map))?;
            if !target.portals.iter().any(|p| p.id == portal.target_portal) {
                return Err(ContentError::broken(
                    &owner,
                    ContentKind::Portal,
                    &portal.target_portal,
                ));
            }
        }
        for chest in &map.chests {
            if !self.loot_tables.contains_key(&chest.loot_table) {
                return Err(ContentError::broken(
                    &owner,
                    ContentKind::LootTable,
                    &chest.loot_table,
                ));
            }
        }
        for npc in &map.npcs {
            if !self.dialogues.contains_key(&npc.parcel) {
                return Err(ContentError::broken(&owner, ContentKind::Dialogue, &npc.parcel));
            }
        }
        Ok(())
    }

    fn require_items(&self, owner: &str, keys: &[String]) -> Result<(), ContentError> {
        match keys.iter().find(|key| !self.items.contains_key(*key)) {
            Some(key) => Err(ContentError::broken(owner, ContentKind::Item, key)),
            None => Ok(()),
        }
    }
}

impl ContentOracle for ContentTables {
    fn item(&self, key: &str) -> Option<&ItemDefinition> {
        self.items.get(key)
    }

    fn enemy(&self, key: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(key)
    }

    fn theme(&self, key: &str) -> Option<&ThemeDefinition> {
        self.themes.get(key)
    }

    fn map(&self, id: &str) -> Option<&MapDefinition> {
        self.maps.get(id)
    }

    fn dialogue(&self, key: &str) -> Option<&DialogueParcel> {
        self.dialogues.get(key)
    }

    fn skill(&self, key: &str) -> Option<&SkillDefinition> {
        self.skills.get(key)
    }

    fn combat_action(&self, key: &str) -> Option<&CombatActionDefinition> {
        self.combat_actions.get(key)
    }

    fn loot_table(&self, key: &str) -> Option<&LootTable> {
        self.loot_tables.get(key)
    }

    fn player(&self) -> &PlayerDefinition {
        &self.player
    }

    fn world(&self) -> &WorldDefinition {
        &self.world
    }
}
