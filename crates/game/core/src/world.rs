//! Level construction and map travel.
//!
//! A level is generated from its [`MapDefinition`](crate::env::MapDefinition)
//! and filled from the theme pools. Levels the player leaves go into the
//! map cache so that returning restores them exactly.

use crate::config::GameConfig;
use crate::env::{
    ContentError, ContentKind, ContentOracle, EnemyDefinition, GameRng, ItemDefinition, level_seed,
};
use crate::fov;
use crate::mapgen::{self, Palette};
use crate::state::{
    Actor, Entity, EntityId, GameState, Interaction, Item, LevelSnapshot, LogKind, Position,
    ResourceMeter, StairDirection, Tile,
};

pub const STAIRS_DOWN_GLYPH: char = '>';
pub const STAIRS_UP_GLYPH: char = '<';
pub const PORTAL_GLYPH: char = 'O';
pub const CHEST_GLYPH: char = '=';

/// Minimum Chebyshev distance between the arrival tile and a spawned enemy.
const SAFE_RADIUS: i32 = 2;

/// Where the player lands on the destination map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Arrival {
    Start,
    Exit,
    /// Next to the portal with this id.
    Portal(String),
}

/// Creates an item instance from its definition.
pub fn spawn_item(state: &mut GameState, definition: &ItemDefinition, position: Position) -> Item {
    Item {
        id: state.allocate_entity_id(),
        key: definition.key.clone(),
        name: definition.name.clone(),
        unidentified_name: definition.unidentified_name.clone(),
        identified: definition.unidentified_name.is_none(),
        glyph: definition.glyph,
        position,
        effects: definition.effects.clone(),
        equipment: definition.equipment.clone(),
    }
}

/// Creates a monster from its definition.
pub fn spawn_enemy(state: &mut GameState, definition: &EnemyDefinition, position: Position) -> Actor {
    let mut actor = Actor::new(
        state.allocate_entity_id(),
        &definition.name,
        definition.glyph,
        position,
        definition.hp,
        definition.attack,
        definition.defense,
    );
    actor.ai = Some(definition.ai);
    actor
}

/// Generates and populates map `map_id`.
///
/// Randomness comes from the level's own stream (see [`level_seed`]); only
/// the id allocator of `state` is used and the current level is left
/// untouched.
pub fn build_level(
    state: &mut GameState,
    content: &dyn ContentOracle,
    config: &GameConfig,
    map_id: &str,
    depth: u32,
) -> Result<LevelSnapshot, ContentError> {
    let definition = content
        .map(map_id)
        .ok_or_else(|| ContentError::missing(ContentKind::Map, map_id))?;
    let theme = content
        .theme(&definition.theme)
        .ok_or_else(|| ContentError::missing(ContentKind::Theme, &definition.theme))?;

    let mut rng = GameRng::new(level_seed(state.seed, depth, map_id));
    let palette = Palette {
        floor: theme.floor_glyph,
        wall: theme.wall_glyph,
    };
    let generated = mapgen::generate(
        definition.width,
        definition.height,
        palette,
        &mut rng,
        config.max_generation_attempts,
    );
    let mut map = generated.map;
    let (start, exit) = (generated.start, generated.exit);

    let mut entities = Vec::new();
    entities.push(Entity::new(
        state.allocate_entity_id(),
        "stairs down",
        STAIRS_DOWN_GLYPH,
        exit,
        Some(Interaction::Stairs {
            direction: StairDirection::Down,
        }),
    ));
    if definition.above.is_some() {
        entities.push(Entity::new(
            state.allocate_entity_id(),
            "stairs up",
            STAIRS_UP_GLYPH,
            start,
            Some(Interaction::Stairs {
                direction: StairDirection::Up,
            }),
        ));
    }

    let mut doorways = generated.doorways;
    rng.shuffle(&mut doorways);
    for position in doorways.into_iter().take(definition.doors as usize) {
        map.set(position, Tile::door(false));
        entities.push(Entity::new(
            state.allocate_entity_id(),
            "door",
            Tile::CLOSED_DOOR_GLYPH,
            position,
            Some(Interaction::Door { open: false }),
        ));
    }

    let mut free: Vec<Position> = map
        .positions()
        .filter(|position| {
            map.is_walkable(*position)
                && *position != start
                && *position != exit
                && !entities.iter().any(|entity| entity.position == *position)
        })
        .collect();
    rng.shuffle(&mut free);

    for portal in &definition.portals {
        let Some(position) = free.pop() else { break };
        entities.push(Entity::new(
            state.allocate_entity_id(),
            "portal",
            PORTAL_GLYPH,
            position,
            Some(Interaction::Portal {
                portal_id: portal.id.clone(),
                target_map: portal.target_map.clone(),
                target_portal: portal.target_portal.clone(),
            }),
        ));
    }
    for chest in &definition.chests {
        let Some(position) = free.pop() else { break };
        entities.push(Entity::new(
            state.allocate_entity_id(),
            "chest",
            CHEST_GLYPH,
            position,
            Some(Interaction::Chest {
                loot_table: chest.loot_table.clone(),
                looted: false,
            }),
        ));
    }
    for npc in &definition.npcs {
        let Some(position) = free.pop() else { break };
        entities.push(Entity::new(
            state.allocate_entity_id(),
            &npc.name,
            npc.glyph,
            position,
            Some(Interaction::Conversation {
                parcel: npc.parcel.clone(),
            }),
        ));
    }

    let mut actors = Vec::new();
    let enemy_count = rng.range(theme.enemy_count.0, theme.enemy_count.1);
    let mut spawn_points: Vec<Position> = free
        .iter()
        .copied()
        .filter(|position| position.chebyshev(start) > SAFE_RADIUS)
        .collect();
    for _ in 0..enemy_count {
        let Some(position) = spawn_points.pop() else { break };
        let Some(key) = rng.choose(&theme.enemies) else { break };
        let enemy = content
            .enemy(key)
            .ok_or_else(|| ContentError::missing(ContentKind::Enemy, key))?;
        free.retain(|candidate| *candidate != position);
        actors.push(spawn_enemy(state, enemy, position));
    }

    let mut items = Vec::new();
    let item_count = rng.range(theme.item_count.0, theme.item_count.1);
    for _ in 0..item_count {
        let Some(position) = free.pop() else { break };
        let Some(key) = rng.choose(&theme.items) else { break };
        let item = content
            .item(key)
            .ok_or_else(|| ContentError::missing(ContentKind::Item, key))?;
        items.push(spawn_item(state, item, position));
    }

    tracing::debug!(
        map_id,
        depth,
        attempts = generated.attempts,
        rooms = generated.rooms.len(),
        enemies = actors.len(),
        items = items.len(),
        "level built"
    );

    Ok(LevelSnapshot {
        map_id: map_id.to_owned(),
        depth,
        map,
        start,
        exit,
        actors,
        items,
        entities,
        explored: Default::default(),
    })
}

/// Builds a fresh run: the start map plus a player created from content.
pub fn new_game(
    content: &dyn ContentOracle,
    config: &GameConfig,
    seed: u64,
) -> Result<GameState, ContentError> {
    let mut state = GameState::new(seed, config.log_capacity);
    let level = build_level(&mut state, content, config, &content.world().start_map, 1)?;

    let template = content.player();
    let mut player = Actor::new(
        EntityId::PLAYER,
        &template.name,
        template.glyph,
        level.start,
        template.hp,
        template.attack,
        template.defense,
    );
    player.is_player = true;
    player.action_points = ResourceMeter::full(config.action_points);
    player.skills = template.skills.iter().cloned().collect();

    for key in &template.inventory {
        let definition = content
            .item(key)
            .ok_or_else(|| ContentError::missing(ContentKind::Item, key))?;
        let item = spawn_item(&mut state, definition, level.start);
        player.inventory.push(item);
    }
    for key in &template.equipment {
        let definition = content
            .item(key)
            .ok_or_else(|| ContentError::missing(ContentKind::Item, key))?;
        let slot = definition
            .equipment
            .as_ref()
            .map(|spec| spec.slot)
            .ok_or_else(|| ContentError::invalid(ContentKind::Item, key, "not equippable"))?;
        let item = spawn_item(&mut state, definition, level.start);
        player.equipment.insert(slot, item);
    }

    state.actors.push(player);
    state.install_level(level);
    fov::refresh_visibility(&mut state, config.fov_radius);
    state.log(
        LogKind::System,
        format!("Welcome, {}. Find the way down.", template.name),
    );
    Ok(state)
}

/// Moves the player to `target_map`, caching the level being left.
///
/// A cached destination is restored as it was left; otherwise a fresh level
/// is built. The current level is only detached once the destination is
/// known to exist, so a failure leaves the state untouched.
pub fn travel(
    state: &mut GameState,
    content: &dyn ContentOracle,
    config: &GameConfig,
    target_map: &str,
    depth: u32,
    arrival: Arrival,
) -> Result<(), ContentError> {
    let destination = match state.map_cache.remove(target_map) {
        Some(cached) => cached,
        None => build_level(state, content, config, target_map, depth)?,
    };

    let outgoing = state.take_level();
    tracing::debug!(from = %outgoing.map_id, to = target_map, "travel");
    state.map_cache.insert(outgoing.map_id.clone(), outgoing);
    state.install_level(destination);

    let landing = match &arrival {
        Arrival::Start => state.start,
        Arrival::Exit => state.exit,
        Arrival::Portal(id) => state
            .entities
            .iter()
            .find(|entity| {
                matches!(&entity.interaction, Some(Interaction::Portal { portal_id, .. }) if portal_id == id)
            })
            .map(|entity| entity.position)
            .unwrap_or(state.start),
    };
    let landing = free_spot(state, landing);
    if let Some(player) = state.player_mut() {
        player.position = landing;
    }
    fov::refresh_visibility(state, config.fov_radius);
    Ok(())
}

/// `preferred` if no monster stands there, else the nearest free neighbour.
fn free_spot(state: &GameState, preferred: Position) -> Position {
    let occupied = |position: Position| {
        state
            .actor_at(position)
            .is_some_and(|actor| !actor.is_player)
    };
    if !occupied(preferred) {
        return preferred;
    }
    crate::state::Direction::ALL
        .iter()
        .map(|direction| preferred.step(*direction))
        .find(|position| state.map.is_walkable(*position) && !occupied(*position))
        .unwrap_or(preferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Phase;
    use crate::test_support;

    #[test]
    fn new_game_places_the_player_at_the_start() {
        let content = test_support::content();
        let config = GameConfig::default();
        let state = new_game(&content, &config, 42).unwrap();

        let player = state.player().unwrap();
        assert_eq!(player.position, state.start);
        assert_eq!(state.map_id, "cellar");
        assert_eq!(state.phase, Phase::PlayerTurn);
        assert_eq!(player.inventory.len(), content.player.inventory.len());
        assert_eq!(player.equipment.len(), content.player.equipment.len());
        assert_eq!(player.action_points.current, config.action_points);
        assert!(state.visible.contains(&state.start));
        assert_eq!(state.actors.iter().filter(|a| a.is_player).count(), 1);
    }

    #[test]
    fn new_game_is_deterministic() {
        let content = test_support::content();
        let config = GameConfig::default();
        let a = new_game(&content, &config, 9).unwrap();
        let b = new_game(&content, &config, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn level_layout_ignores_earlier_randomness() {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut state = GameState::new(3, 10);
        let first = build_level(&mut state, &content, &config, "crypt", 2).unwrap();

        let rng_before = state.rng;
        for _ in 0..50 {
            state.rng.next_u32();
        }
        let second = build_level(&mut state, &content, &config, "crypt", 2).unwrap();

        assert_eq!(first.map, second.map);
        assert_eq!((first.start, first.exit), (second.start, second.exit));
        assert_ne!(state.rng, rng_before);

        let other = build_level(&mut state, &content, &config, "cellar", 1).unwrap();
        assert_ne!(first.map, other.map);
    }

    #[test]
    fn level_has_stairs_and_defined_scenery() {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut state = GameState::new(3, 10);
        let level = build_level(&mut state, &content, &config, "cellar", 1).unwrap();

        let stairs_down = level
            .entities
            .iter()
            .find(|e| e.interaction == Some(Interaction::Stairs { direction: StairDirection::Down }));
        assert_eq!(stairs_down.map(|e| e.position), Some(level.exit));
        assert!(
            level
                .entities
                .iter()
                .any(|e| matches!(e.interaction, Some(Interaction::Chest { .. })))
        );
        assert!(
            level
                .entities
                .iter()
                .any(|e| matches!(e.interaction, Some(Interaction::Portal { .. })))
        );
        assert!(level.actors.iter().all(|a| a.position.chebyshev(level.start) > SAFE_RADIUS));
    }

    #[test]
    fn unknown_map_is_a_content_error() {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut state = GameState::new(3, 10);
        assert_eq!(
            build_level(&mut state, &content, &config, "nowhere", 1),
            Err(ContentError::missing(ContentKind::Map, "nowhere"))
        );
    }

    #[test]
    fn travel_caches_and_restores_levels() {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut state = new_game(&content, &config, 4).unwrap();
        let cellar = state.map.clone();
        let first_enemy = state.actors.iter().find(|a| !a.is_player).map(|a| a.id);

        travel(&mut state, &content, &config, "crypt", 2, Arrival::Start).unwrap();
        assert_eq!(state.map_id, "crypt");
        assert!(state.map_cache.contains_key("cellar"));
        assert_eq!(state.player_position(), Some(state.start));

        travel(&mut state, &content, &config, "cellar", 1, Arrival::Exit).unwrap();
        assert_eq!(state.map_id, "cellar");
        assert_eq!(state.map, cellar);
        assert!(state.map_cache.contains_key("crypt"));
        assert!(!state.map_cache.contains_key("cellar"));
        assert_eq!(
            state.actors.iter().find(|a| !a.is_player).map(|a| a.id),
            first_enemy
        );
    }

    #[test]
    fn portal_arrival_lands_on_the_matching_portal() {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut state = new_game(&content, &config, 8).unwrap();

        travel(
            &mut state,
            &content,
            &config,
            "crypt",
            1,
            Arrival::Portal("crypt_gate".into()),
        )
        .unwrap();

        let portal = state
            .entities
            .iter()
            .find(|e| matches!(&e.interaction, Some(Interaction::Portal { portal_id, .. }) if portal_id == "crypt_gate"))
            .map(|e| e.position);
        let player = state.player_position();
        assert!(portal.is_some());
        assert!(player.zip(portal).is_some_and(|(p, q)| p.chebyshev(q) <= 1));
    }

    #[test]
    fn failed_travel_leaves_the_state_untouched() {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut state = new_game(&content, &config, 4).unwrap();
        let before = state.clone();

        let result = travel(&mut state, &content, &config, "nowhere", 2, Arrival::Start);

        assert!(result.is_err());
        assert_eq!(state, before);
    }
}
