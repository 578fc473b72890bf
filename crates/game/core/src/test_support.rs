//! Shared fixtures for unit tests.

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::env::{
    ChestDefinition, CombatActionDefinition, CombatActionKind, ContentOracle, ContentTables,
    DialogueChoice, DialogueNode, DialogueParcel, EnemyDefinition, ItemDefinition, LootEntry,
    LootTable, MapDefinition, NpcDefinition, PlayerDefinition, PortalDefinition, SkillDefinition,
    SkillKind, ThemeDefinition, WorldDefinition,
};
use crate::state::{
    Actor, AiKind, EntityId, EquipmentSlot, EquipmentSpec, GameState, ItemEffect, Position,
    ResourceMeter, StatusEffect, StatusKind, Tile, TileMap,
};
use crate::world;

pub const GOBLIN_HP: i32 = 8;
pub const GOBLIN_ATTACK: i32 = 3;
pub const GOBLIN_DEFENSE: i32 = 1;
pub const CLEAVE_POTENCY: i32 = 4;

fn item(key: &str, name: &str, glyph: char, effects: Vec<ItemEffect>) -> ItemDefinition {
    ItemDefinition {
        key: key.into(),
        name: name.into(),
        unidentified_name: None,
        glyph,
        effects,
        equipment: None,
    }
}

fn weapon(key: &str, name: &str, attack_bonus: i32, on_hit: Option<StatusEffect>) -> ItemDefinition {
    ItemDefinition {
        equipment: Some(EquipmentSpec {
            slot: EquipmentSlot::Weapon,
            attack_bonus,
            defense_bonus: 0,
            on_hit,
        }),
        ..item(key, name, '/', Vec::new())
    }
}

fn combat_action(key: &str, cost: i32, kind: CombatActionKind) -> CombatActionDefinition {
    CombatActionDefinition {
        key: key.into(),
        name: key.replace('_', " "),
        cost,
        kind,
    }
}

fn map(id: &str, above: Option<&str>, below: Option<&str>) -> MapDefinition {
    MapDefinition {
        id: id.into(),
        width: 30,
        height: 20,
        theme: "stone".into(),
        above: above.map(Into::into),
        below: below.map(Into::into),
        doors: 2,
        portals: Vec::new(),
        chests: Vec::new(),
        npcs: Vec::new(),
    }
}

fn goblin() -> EnemyDefinition {
    EnemyDefinition {
        key: "goblin".into(),
        name: "goblin".into(),
        glyph: 'g',
        hp: GOBLIN_HP,
        attack: GOBLIN_ATTACK,
        defense: GOBLIN_DEFENSE,
        ai: AiKind::Hostile,
    }
}

/// Small but complete content set covering every content kind.
pub fn content() -> ContentTables {
    let player = PlayerDefinition {
        name: "Hero".into(),
        glyph: '@',
        hp: 30,
        attack: 5,
        defense: 1,
        inventory: vec!["potion".into()],
        equipment: vec!["short_sword".into()],
        skills: Vec::new(),
    };
    let mut tables = ContentTables::new(
        player,
        WorldDefinition {
            start_map: "cellar".into(),
        },
    );

    tables.insert_item(item("potion", "healing potion", '!', vec![ItemEffect::Heal { potency: 10 }]));
    tables.insert_item(ItemDefinition {
        unidentified_name: Some("murky potion".into()),
        ..item("mystery_potion", "potion of might", '!', vec![ItemEffect::IncreaseAttack { potency: 1 }])
    });
    tables.insert_item(item(
        "fire_scroll",
        "scroll of fire",
        '?',
        vec![ItemEffect::Fireball {
            potency: 5,
            radius: 1,
        }],
    ));
    tables.insert_item(item("identify_scroll", "scroll of identify", '?', vec![ItemEffect::Identify]));
    tables.insert_item(item("map_scroll", "scroll of mapping", '?', vec![ItemEffect::RevealMap]));
    tables.insert_item(weapon("short_sword", "short sword", 2, None));
    tables.insert_item(weapon(
        "venom_dagger",
        "venom dagger",
        1,
        Some(StatusEffect::new(StatusKind::Poison, 2, 3)),
    ));

    tables.insert_enemy(goblin());
    tables.insert_enemy(EnemyDefinition {
        key: "rat".into(),
        name: "rat".into(),
        glyph: 'r',
        hp: 4,
        attack: 2,
        defense: 0,
        ai: AiKind::Wanderer,
    });

    tables.insert_theme(ThemeDefinition {
        key: "stone".into(),
        floor_glyph: Tile::FLOOR_GLYPH,
        wall_glyph: Tile::WALL_GLYPH,
        enemies: vec!["goblin".into(), "rat".into()],
        items: vec!["potion".into(), "fire_scroll".into()],
        enemy_count: (2, 3),
        item_count: (1, 2),
    });

    let mut cellar = map("cellar", None, Some("crypt"));
    cellar.portals.push(PortalDefinition {
        id: "cellar_gate".into(),
        target_map: "crypt".into(),
        target_portal: "crypt_gate".into(),
    });
    cellar.chests.push(ChestDefinition {
        loot_table: "starter".into(),
    });
    cellar.npcs.push(NpcDefinition {
        name: "elder".into(),
        glyph: 'E',
        parcel: "elder".into(),
    });
    let mut crypt = map("crypt", Some("cellar"), None);
    crypt.portals.push(PortalDefinition {
        id: "crypt_gate".into(),
        target_map: "cellar".into(),
        target_portal: "cellar_gate".into(),
    });
    tables.insert_map(cellar);
    tables.insert_map(crypt);

    let choice = |text: &str, target: &str| DialogueChoice {
        text: text.into(),
        target: target.into(),
    };
    let mut nodes = BTreeMap::new();
    nodes.insert(
        "greeting".to_owned(),
        DialogueNode {
            text: "Welcome, traveller.".into(),
            choices: vec![
                choice("Farewell.", "farewell"),
                choice("Any rumours?", "rumours"),
                choice("What lies in the vault?", "vault"),
            ],
        },
    );
    nodes.insert(
        "rumours".to_owned(),
        DialogueNode {
            text: "The crypt below is restless.".into(),
            choices: vec![choice("Back.", "greeting")],
        },
    );
    nodes.insert(
        "farewell".to_owned(),
        DialogueNode {
            text: "Walk carefully.".into(),
            choices: Vec::new(),
        },
    );
    tables.insert_dialogue(DialogueParcel {
        key: "elder".into(),
        speaker: "Elder".into(),
        start: "greeting".into(),
        nodes,
    });

    tables.insert_skill(SkillDefinition {
        key: "cleave".into(),
        name: "Cleave".into(),
        kind: SkillKind::Active {
            action: "cleave".into(),
        },
    });
    tables.insert_skill(SkillDefinition {
        key: "toughness".into(),
        name: "Toughness".into(),
        kind: SkillKind::Passive {
            attack_bonus: 0,
            defense_bonus: 1,
        },
    });

    tables.insert_combat_action(combat_action("attack", 1, CombatActionKind::Attack));
    tables.insert_combat_action(combat_action("defend", 1, CombatActionKind::Defend));
    tables.insert_combat_action(combat_action("flee", 0, CombatActionKind::Flee));
    tables.insert_combat_action(combat_action(
        "cleave",
        2,
        CombatActionKind::Cleave {
            potency: CLEAVE_POTENCY,
        },
    ));
    tables.insert_combat_action(combat_action(
        "power_strike",
        2,
        CombatActionKind::PowerStrike { bonus: 3 },
    ));

    tables.insert_loot_table(LootTable {
        key: "starter".into(),
        rolls: 2,
        entries: vec![
            LootEntry {
                item: "potion".into(),
                weight: 3,
            },
            LootEntry {
                item: "fire_scroll".into(),
                weight: 1,
            },
        ],
    });

    tables
}

/// Open `width` x `height` floor with a bare player in the middle.
pub fn arena(width: u32, height: u32) -> GameState {
    let mut state = GameState::new(7, GameConfig::DEFAULT_LOG_CAPACITY);
    state.map_id = "arena".into();
    state.depth = 1;
    state.map = TileMap::filled(width, height, Tile::floor(Tile::FLOOR_GLYPH));

    let center = Position::new(width as i32 / 2, height as i32 / 2);
    let mut player = Actor::new(EntityId::PLAYER, "Hero", '@', center, 30, 5, 1);
    player.is_player = true;
    player.action_points = ResourceMeter::full(GameConfig::DEFAULT_ACTION_POINTS);
    state.actors.push(player);
    state.start = center;
    state
}

pub fn spawn_goblin(state: &mut GameState, position: Position) -> EntityId {
    let goblin = world::spawn_enemy(state, &goblin(), position);
    let id = goblin.id;
    state.actors.push(goblin);
    id
}

fn instantiate(state: &mut GameState, key: &str, position: Position) -> crate::state::Item {
    let content = content();
    let definition = content.item(key).unwrap_or_else(|| panic!("unknown item {key}"));
    world::spawn_item(state, definition, position)
}

/// Adds an item to the player's inventory.
pub fn give_item(state: &mut GameState, key: &str) -> EntityId {
    let item = instantiate(state, key, Position::ORIGIN);
    let id = item.id;
    state.player_mut().unwrap().inventory.push(item);
    id
}

/// Puts an item on the ground.
pub fn drop_item(state: &mut GameState, key: &str, position: Position) -> EntityId {
    let item = instantiate(state, key, position);
    let id = item.id;
    state.items.push(item);
    id
}

/// Equips an item directly, bypassing the inventory.
pub fn equip(state: &mut GameState, key: &str) -> EntityId {
    let item = instantiate(state, key, Position::ORIGIN);
    let id = item.id;
    let slot = item.equipment.as_ref().unwrap().slot;
    state.player_mut().unwrap().equipment.insert(slot, item);
    id
}
