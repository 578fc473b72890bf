//! Interactive scenery: doors, chests, stairs, portals and talking NPCs.

use super::{EntityId, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub position: Position,
    pub interaction: Option<Interaction>,
}

impl Entity {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        glyph: char,
        position: Position,
        interaction: Option<Interaction>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            glyph,
            position,
            interaction,
        }
    }

    pub fn is_stairs(&self) -> bool {
        matches!(self.interaction, Some(Interaction::Stairs { .. }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StairDirection {
    Up,
    Down,
}

/// Behaviour attached to a piece of scenery.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interaction {
    Door {
        open: bool,
    },
    Chest {
        loot_table: String,
        looted: bool,
    },
    Stairs {
        direction: StairDirection,
    },
    Portal {
        /// Identifier other portals use to target this one.
        portal_id: String,
        target_map: String,
        target_portal: String,
    },
    Conversation {
        parcel: String,
    },
}
