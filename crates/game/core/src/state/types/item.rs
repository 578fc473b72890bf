//! Item instances and the closed set of effects they can carry.

use super::{EntityId, Position};

/// A concrete item, either lying on the ground or carried by an actor.
///
/// Instances copy everything they need from their content definition so a
/// snapshot of the world stays meaningful without the content tables.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: EntityId,
    /// Content key of the definition this item was created from.
    pub key: String,
    pub name: String,
    /// Alias shown while the item is unidentified.
    pub unidentified_name: Option<String>,
    pub identified: bool,
    pub glyph: char,
    /// Ground position. Meaningless while the item sits in an inventory.
    pub position: Position,
    pub effects: Vec<ItemEffect>,
    pub equipment: Option<EquipmentSpec>,
}

impl Item {
    /// Name the player sees: the true name once identified, the alias otherwise.
    pub fn display_name(&self) -> &str {
        match (&self.unidentified_name, self.identified) {
            (Some(alias), false) => alias,
            _ => &self.name,
        }
    }

    pub fn is_identified(&self) -> bool {
        self.identified || self.unidentified_name.is_none()
    }

    /// The effect that drives using this item from the inventory.
    pub fn primary_effect(&self) -> Option<&ItemEffect> {
        self.effects.first()
    }

    pub fn requires_target(&self) -> bool {
        self.effects.iter().any(ItemEffect::requires_target)
    }
}

/// Effect produced by consuming an item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    /// Restores up to `potency` hit points to the user.
    Heal { potency: i32 },
    /// Deals `potency` damage to the occupant of the target tile, or to the
    /// user when the effect is not targeted.
    Damage {
        potency: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        targeted: bool,
    },
    /// Deals `potency` damage to every actor within `radius` of the target point.
    Fireball { potency: i32, radius: i32 },
    /// Marks every tile of the current map as explored.
    RevealMap,
    ApplyStatus {
        status: StatusEffect,
        #[cfg_attr(feature = "serde", serde(default))]
        targeted: bool,
    },
    /// Opens the identify menu instead of applying immediately.
    Identify,
    IncreaseAttack { potency: i32 },
    IncreaseMaxHp { potency: i32 },
}

impl ItemEffect {
    pub fn requires_target(&self) -> bool {
        match self {
            ItemEffect::Fireball { .. } => true,
            ItemEffect::Damage { targeted, .. } | ItemEffect::ApplyStatus { targeted, .. } => {
                *targeted
            }
            ItemEffect::Heal { .. }
            | ItemEffect::RevealMap
            | ItemEffect::Identify
            | ItemEffect::IncreaseAttack { .. }
            | ItemEffect::IncreaseMaxHp { .. } => false,
        }
    }
}

/// Slot an equippable item occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Trinket,
}

/// Equipment descriptor attached to an item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentSpec {
    pub slot: EquipmentSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_bonus: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense_bonus: i32,
    /// Status inflicted on a defender that survives a hit with this item equipped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_hit: Option<StatusEffect>,
}

/// Kinds of timed status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    /// Loses `potency` HP at the start of every enemy turn.
    Poison,
    /// Regains `potency` HP at the start of every enemy turn.
    Regeneration,
    /// Adds `potency` to defense against enemy attacks.
    Guard,
    /// Subtracts `potency` from attack.
    Weakness,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub potency: i32,
    /// Remaining enemy-turn ticks before the status expires.
    pub turns: u32,
}

impl StatusEffect {
    pub const fn new(kind: StatusKind, potency: i32, turns: u32) -> Self {
        Self {
            kind,
            potency,
            turns,
        }
    }
}
