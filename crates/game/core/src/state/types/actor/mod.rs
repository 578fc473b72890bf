use std::collections::{BTreeMap, BTreeSet};

use super::{EntityId, EquipmentSlot, Item, Position, ResourceMeter, StatusEffect, StatusKind};

/// Behaviour driving a non-player actor during the enemy turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiKind {
    /// Chases the player while it can see them and attacks when adjacent.
    #[default]
    Hostile,
    /// Takes a random step each turn; still strikes an adjacent player.
    Wanderer,
    /// Never moves; strikes an adjacent player.
    Stationary,
}

/// Combatant in the world: the player or a monster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub position: Position,
    pub hp: ResourceMeter,
    pub attack: i32,
    pub defense: i32,
    /// Budget spent by combat-menu actions; refilled every player turn.
    pub action_points: ResourceMeter,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<Item>,
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "crate::state::tagged::map")
    )]
    pub equipment: BTreeMap<EquipmentSlot, Item>,
    /// Keys of learned skills.
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "crate::state::tagged::set")
    )]
    pub skills: BTreeSet<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub statuses: Vec<StatusEffect>,
    pub ai: Option<AiKind>,
    pub is_player: bool,
}

impl Actor {
    /// Creates a bare actor with no inventory, equipment, skills or AI.
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        glyph: char,
        position: Position,
        hp: i32,
        attack: i32,
        defense: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            glyph,
            position,
            hp: ResourceMeter::full(hp),
            attack,
            defense,
            action_points: ResourceMeter::default(),
            inventory: Vec::new(),
            equipment: BTreeMap::new(),
            skills: BTreeSet::new(),
            statuses: Vec::new(),
            ai: None,
            is_player: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_depleted()
    }

    /// Sum of equipment attack bonuses.
    pub fn equipment_attack(&self) -> i32 {
        self.equipment
            .values()
            .filter_map(|item| item.equipment.as_ref())
            .map(|spec| spec.attack_bonus)
            .sum()
    }

    /// Sum of equipment defense bonuses.
    pub fn equipment_defense(&self) -> i32 {
        self.equipment
            .values()
            .filter_map(|item| item.equipment.as_ref())
            .map(|spec| spec.defense_bonus)
            .sum()
    }

    /// Total potency of active statuses of `kind`.
    pub fn status_potency(&self, kind: StatusKind) -> i32 {
        self.statuses
            .iter()
            .filter(|status| status.kind == kind)
            .map(|status| status.potency)
            .sum()
    }

    pub fn inventory_index(&self, item: EntityId) -> Option<usize> {
        self.inventory.iter().position(|candidate| candidate.id == item)
    }

    pub fn take_from_inventory(&mut self, item: EntityId) -> Option<Item> {
        self.inventory_index(item)
            .map(|index| self.inventory.remove(index))
    }
}
