//! Per-map slice of the world state, used when swapping maps.

use std::collections::{BTreeMap, BTreeSet};

use super::{Actor, Entity, Item, Position, TileMap};

/// Everything that belongs to one map, minus the player.
///
/// Produced by [`GameState::take_level`](super::GameState::take_level) when the
/// player leaves a map and consumed by
/// [`GameState::install_level`](super::GameState::install_level) on arrival.
/// Owned values only, so a cached level never aliases live state.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelSnapshot {
    pub map_id: String,
    pub depth: u32,
    pub map: TileMap,
    pub start: Position,
    pub exit: Position,
    pub actors: Vec<Actor>,
    pub items: Vec<Item>,
    pub entities: Vec<Entity>,
    #[cfg_attr(feature = "serde", serde(with = "crate::state::tagged::set"))]
    pub explored: BTreeSet<Position>,
}

/// Levels the player has left, keyed by map id.
pub type MapCache = BTreeMap<String, LevelSnapshot>;
