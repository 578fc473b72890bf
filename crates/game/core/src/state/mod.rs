//! Authoritative world state document.
//!
//! This module owns the data structures that describe actors, items, scenery,
//! the tile grid, visibility and the narration log. Runtime layers clone or
//! query this state but mutate it exclusively through the engine.
mod level;
#[cfg(feature = "serde")]
pub mod tagged;
pub mod types;

use std::collections::BTreeSet;

pub use level::{LevelSnapshot, MapCache};
pub use types::{
    Actor, AiKind, Conversation, Direction, Entity, EntityId, EquipmentSlot, EquipmentSpec,
    Interaction, Item, ItemEffect, LogEntry, LogKind, MessageLog, Position, ResourceMeter,
    StairDirection, StatusEffect, StatusKind, Tile, TileFlags, TileMap,
};

use crate::engine::Phase;
use crate::env::GameRng;

/// Canonical snapshot of the simulation.
///
/// A single mutable document exclusively owned by the session. Cloning it is a
/// full deep copy, which is what history commits and the map cache rely on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub phase: Phase,

    /// Run seed; each level's generator is derived from it.
    pub seed: u64,

    /// Deterministic generator used for loot rolls and AI wandering.
    pub rng: GameRng,

    /// Sequential entity ID allocator (monotonically increasing, 0 is the player).
    next_entity_id: u32,

    pub map_id: String,
    pub depth: u32,
    pub map: TileMap,
    /// Player arrival tile for this map.
    pub start: Position,
    /// Tile holding the way down.
    pub exit: Position,

    pub actors: Vec<Actor>,
    /// Items lying on the ground.
    pub items: Vec<Item>,
    pub entities: Vec<Entity>,

    pub log: MessageLog,

    #[cfg_attr(feature = "serde", serde(with = "tagged::set"))]
    pub visible: BTreeSet<Position>,
    /// Every tile ever seen on this map. Only ever grows.
    #[cfg_attr(feature = "serde", serde(with = "tagged::set"))]
    pub explored: BTreeSet<Position>,

    pub conversation: Option<Conversation>,
    pub combat_target: Option<EntityId>,
    /// Item waiting for a target or an identify choice.
    pub pending_item: Option<EntityId>,
    /// Cursor shared by the combat, inventory and identify menus.
    pub selection: usize,
    /// Scroll-back offset of the message log view.
    pub log_offset: usize,

    #[cfg_attr(feature = "serde", serde(with = "tagged::map"))]
    pub map_cache: MapCache,
}

impl GameState {
    /// Creates an empty world with no map and no actors.
    pub fn new(seed: u64, log_capacity: usize) -> Self {
        Self {
            phase: Phase::PlayerTurn,
            seed,
            rng: GameRng::new(seed),
            next_entity_id: 1,
            map_id: String::new(),
            depth: 0,
            map: TileMap::default(),
            start: Position::ORIGIN,
            exit: Position::ORIGIN,
            actors: Vec::new(),
            items: Vec::new(),
            entities: Vec::new(),
            log: MessageLog::with_capacity(log_capacity),
            visible: BTreeSet::new(),
            explored: BTreeSet::new(),
            conversation: None,
            combat_target: None,
            pending_item: None,
            selection: 0,
            log_offset: 0,
            map_cache: MapCache::new(),
        }
    }

    /// Allocates a new unique EntityId. Never returns [`EntityId::PLAYER`].
    pub fn allocate_entity_id(&mut self) -> EntityId {
        if self.next_entity_id == EntityId::PLAYER.0 {
            self.next_entity_id = 1;
        }
        let id = EntityId(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.wrapping_add(1);
        id
    }

    pub fn log(&mut self, kind: LogKind, text: impl Into<String>) {
        self.log.push(kind, text);
    }

    pub fn player(&self) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.is_player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.is_player)
    }

    pub fn player_position(&self) -> Option<Position> {
        self.player().map(|player| player.position)
    }

    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub fn actor_at(&self, position: Position) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.position == position)
    }

    pub fn entity_at(&self, position: Position) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.position == position)
    }

    /// Whether a non-player actor may step onto `position`.
    pub fn is_free(&self, position: Position) -> bool {
        self.map.is_walkable(position) && self.actor_at(position).is_none()
    }

    /// Detaches the current map and everything on it, leaving only the player.
    pub fn take_level(&mut self) -> LevelSnapshot {
        let (players, others): (Vec<Actor>, Vec<Actor>) =
            std::mem::take(&mut self.actors)
                .into_iter()
                .partition(|actor| actor.is_player);
        self.actors = players;
        self.visible.clear();

        LevelSnapshot {
            map_id: std::mem::take(&mut self.map_id),
            depth: self.depth,
            map: std::mem::take(&mut self.map),
            start: self.start,
            exit: self.exit,
            actors: others,
            items: std::mem::take(&mut self.items),
            entities: std::mem::take(&mut self.entities),
            explored: std::mem::take(&mut self.explored),
        }
    }

    /// Installs `level` as the current map. The player is kept as-is.
    pub fn install_level(&mut self, level: LevelSnapshot) {
        self.actors.retain(|actor| actor.is_player);
        self.actors.extend(level.actors);
        self.map_id = level.map_id;
        self.depth = level.depth;
        self.map = level.map;
        self.start = level.start;
        self.exit = level.exit;
        self.items = level.items;
        self.entities = level.entities;
        self.explored = level.explored;
        self.visible.clear();
    }
}
