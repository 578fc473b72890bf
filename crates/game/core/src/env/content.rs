//! Static content definitions and the read-only oracle that serves them.
//!
//! Content never appears in the world state directly: actors, items and
//! scenery are instantiated from these definitions and carry their own copy
//! of whatever they need.

use std::collections::BTreeMap;

use crate::state::{AiKind, EquipmentSpec, ItemEffect};

/// Read-only keyed access to validated game content.
pub trait ContentOracle: Send + Sync {
    fn item(&self, key: &str) -> Option<&ItemDefinition>;
    fn enemy(&self, key: &str) -> Option<&EnemyDefinition>;
    fn theme(&self, key: &str) -> Option<&ThemeDefinition>;
    fn map(&self, id: &str) -> Option<&MapDefinition>;
    fn dialogue(&self, key: &str) -> Option<&DialogueParcel>;
    fn skill(&self, key: &str) -> Option<&SkillDefinition>;
    fn combat_action(&self, key: &str) -> Option<&CombatActionDefinition>;
    fn loot_table(&self, key: &str) -> Option<&LootTable>;
    fn player(&self) -> &PlayerDefinition;
    fn world(&self) -> &WorldDefinition;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub key: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unidentified_name: Option<String>,
    pub glyph: char,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<ItemEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Option<EquipmentSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyDefinition {
    pub key: String,
    pub name: String,
    pub glyph: char,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ai: AiKind,
}

/// Starting template for the player character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerDefinition {
    pub name: String,
    pub glyph: char,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    /// Item keys placed in the starting inventory.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<String>,
    /// Item keys equipped at start.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<String>,
}

/// Tile glyphs plus the enemy and item pools a map draws from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThemeDefinition {
    pub key: String,
    pub floor_glyph: char,
    pub wall_glyph: char,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemies: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<String>,
    /// Inclusive `(min, max)` number of enemies spawned.
    pub enemy_count: (u32, u32),
    /// Inclusive `(min, max)` number of ground items spawned.
    pub item_count: (u32, u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDefinition {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub theme: String,
    /// Map reached by the up stairs, arriving at its exit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub above: Option<String>,
    /// Map reached by the down stairs, arriving at its start. `None` means
    /// descending wins the run.
    #[cfg_attr(feature = "serde", serde(default))]
    pub below: Option<String>,
    /// Closed doors placed on corridor mouths.
    #[cfg_attr(feature = "serde", serde(default))]
    pub doors: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub portals: Vec<PortalDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chests: Vec<ChestDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub npcs: Vec<NpcDefinition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortalDefinition {
    pub id: String,
    pub target_map: String,
    pub target_portal: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChestDefinition {
    pub loot_table: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcDefinition {
    pub name: String,
    pub glyph: char,
    pub parcel: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldDefinition {
    pub start_map: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootTable {
    pub key: String,
    /// Number of weighted draws per opening.
    pub rolls: u32,
    pub entries: Vec<LootEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: String,
    pub weight: u32,
}

/// Named dialogue document made of nodes linked by choices.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueParcel {
    pub key: String,
    pub speaker: String,
    pub start: String,
    pub nodes: BTreeMap<String, DialogueNode>,
}

impl DialogueParcel {
    pub fn node(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueNode {
    pub text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub choices: Vec<DialogueChoice>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueChoice {
    pub text: String,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub key: String,
    pub name: String,
    pub kind: SkillKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillKind {
    /// Adds a combat-menu entry bound to a combat action.
    Active { action: String },
    /// Always-on stat bonus.
    Passive {
        #[cfg_attr(feature = "serde", serde(default))]
        attack_bonus: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        defense_bonus: i32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatActionDefinition {
    pub key: String,
    pub name: String,
    /// Action points debited when the action resolves.
    pub cost: i32,
    pub kind: CombatActionKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatActionKind {
    Attack,
    Defend,
    Flee,
    /// Hits the target and every adjacent enemy for `potency` minus defense.
    Cleave { potency: i32 },
    /// Attack with `bonus` added to the attacker's attack.
    PowerStrike { bonus: i32 },
}
