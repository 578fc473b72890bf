//! Read-only content and deterministic randomness consumed by the rules.
//!
//! [`ContentOracle`] is the seam between the rules and whatever loads game
//! data; [`ContentTables`] is the in-memory implementation every loader
//! produces.
mod content;
mod error;
mod rng;
mod tables;

pub use content::{
    ChestDefinition, CombatActionDefinition, CombatActionKind, ContentOracle, DialogueChoice,
    DialogueNode, DialogueParcel, EnemyDefinition, ItemDefinition, LootEntry, LootTable,
    MapDefinition, NpcDefinition, PlayerDefinition, PortalDefinition, SkillDefinition, SkillKind,
    ThemeDefinition, WorldDefinition,
};
pub use error::{ContentError, ContentKind};
pub use rng::{GameRng, level_seed};
pub use tables::ContentTables;

/// Combat actions every content set must define.
pub const REQUIRED_COMBAT_ACTIONS: [&str; 3] = ["attack", "defend", "flee"];
