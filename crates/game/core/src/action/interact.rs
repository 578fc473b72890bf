//! Interactions with scenery at a tile.

use super::{ActionContext, dialogue};
use crate::engine::Phase;
use crate::error::GameError;
use crate::state::{Interaction, Item, LogKind, Position, StairDirection, Tile};
use crate::world::{self, Arrival};

/// Resolves the interaction of the scenery at `position`, if any.
///
/// Each interaction requests its own phase change; when nothing happens the
/// phase is left untouched.
pub(crate) fn interact_at(ctx: &mut ActionContext<'_>, position: Position) {
    let Some(index) = ctx
        .state
        .entities
        .iter()
        .position(|entity| entity.position == position && entity.interaction.is_some())
    else {
        ctx.state.log(LogKind::Info, "There is nothing there.");
        return;
    };
    let Some(interaction) = ctx.state.entities[index].interaction.clone() else {
        return;
    };

    match interaction {
        Interaction::Door { open } => toggle_door(ctx, index, position, open),
        Interaction::Chest { loot_table, looted } => {
            open_chest(ctx, index, &loot_table, looted)
        }
        Interaction::Stairs { direction } => take_stairs(ctx, direction),
        Interaction::Portal {
            target_map,
            target_portal,
            ..
        } => {
            ctx.state.log(LogKind::Info, "You step through the portal.");
            let depth = ctx.state.depth;
            travel(ctx, &target_map, depth, Arrival::Portal(target_portal));
        }
        Interaction::Conversation { parcel } => {
            if !dialogue::start(ctx, &parcel) {
                ctx.transition(Phase::EnemyTurn);
            }
        }
    }
}

fn toggle_door(ctx: &mut ActionContext<'_>, index: usize, position: Position, open: bool) {
    if open && ctx.state.actor_at(position).is_some() {
        ctx.state.log(LogKind::Info, "Something is standing in the doorway.");
        return;
    }

    let now_open = !open;
    let tile = Tile::door(now_open);
    ctx.state.map.set(position, tile);
    let door = &mut ctx.state.entities[index];
    door.interaction = Some(Interaction::Door { open: now_open });
    door.glyph = tile.glyph;

    let message = if now_open {
        "You open the door."
    } else {
        "You close the door."
    };
    ctx.state.log(LogKind::Info, message);
    ctx.refresh_visibility();
    ctx.transition(Phase::EnemyTurn);
}

fn open_chest(ctx: &mut ActionContext<'_>, index: usize, table_key: &str, looted: bool) {
    if looted {
        ctx.state.log(LogKind::Loot, "The chest is empty.");
        return;
    }

    let content = ctx.content;
    let mut found: Vec<Item> = Vec::new();
    match content.loot_table(table_key) {
        Some(table) => {
            let total: u32 = table.entries.iter().map(|entry| entry.weight).sum();
            for _ in 0..table.rolls {
                if total == 0 {
                    break;
                }
                let mut roll = ctx.state.rng.range(0, total - 1);
                let Some(entry) = table.entries.iter().find(|entry| {
                    if roll < entry.weight {
                        return true;
                    }
                    roll -= entry.weight;
                    false
                }) else {
                    continue;
                };
                if let Some(definition) = content.item(&entry.item) {
                    found.push(world::spawn_item(ctx.state, definition, Position::ORIGIN));
                }
            }
        }
        None => tracing::warn!(table = table_key, "loot table not found"),
    }

    ctx.state.entities[index].interaction = Some(Interaction::Chest {
        loot_table: table_key.to_owned(),
        looted: true,
    });

    if found.is_empty() {
        ctx.state.log(LogKind::Loot, "The chest is empty.");
    }
    for item in found {
        let message = format!("You find a {} in the chest.", item.display_name());
        if let Some(player) = ctx.state.player_mut() {
            player.inventory.push(item);
        }
        ctx.state.log(LogKind::Loot, message);
    }
    ctx.transition(Phase::EnemyTurn);
}

fn take_stairs(ctx: &mut ActionContext<'_>, direction: StairDirection) {
    let content = ctx.content;
    let Some(map) = content.map(&ctx.state.map_id) else {
        tracing::warn!(map = %ctx.state.map_id, "current map has no definition");
        ctx.state.log(LogKind::Warning, "The stairs lead nowhere.");
        return;
    };

    match direction {
        StairDirection::Down => match &map.below {
            Some(below) => {
                let depth = ctx.state.depth + 1;
                ctx.state
                    .log(LogKind::Info, format!("You descend to depth {depth}."));
                travel(ctx, below, depth, Arrival::Start);
            }
            None => {
                ctx.state
                    .log(LogKind::System, "You escape the dungeon. Victory!");
                ctx.transition(Phase::Win);
            }
        },
        StairDirection::Up => match &map.above {
            Some(above) => {
                let depth = ctx.state.depth.saturating_sub(1);
                ctx.state
                    .log(LogKind::Info, format!("You climb to depth {depth}."));
                travel(ctx, above, depth, Arrival::Exit);
            }
            None => ctx.state.log(LogKind::Info, "The way up is sealed."),
        },
    }
}

fn travel(ctx: &mut ActionContext<'_>, target_map: &str, depth: u32, arrival: Arrival) {
    match world::travel(ctx.state, ctx.content, ctx.config, target_map, depth, arrival) {
        Ok(()) => {
            ctx.state.combat_target = None;
            ctx.state.pending_item = None;
            ctx.transition(Phase::PlayerTurn);
        }
        Err(error) => {
            tracing::error!(
                %error,
                code = error.error_code(),
                severity = error.severity().as_str(),
                map = target_map,
                "map travel failed"
            );
            ctx.state.log(LogKind::Warning, "The way is sealed.");
        }
    }
}
