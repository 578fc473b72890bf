use super::{Action, ActionContext, effect, interact};
use crate::engine::Phase;
use crate::state::{Direction, EntityId, GameState, LogKind, Position};

pub(super) fn handle(ctx: &mut ActionContext<'_>, action: Action) {
    match action {
        Action::Move(direction) => match ctx.state.pending_item {
            Some(item) => fire(ctx, item, direction),
            None => aim_interaction(ctx, direction),
        },
        Action::Cancel => {
            ctx.state.pending_item = None;
            ctx.state.combat_target = None;
            ctx.transition(Phase::PlayerTurn);
        }
        _ => {}
    }
}

/// Follows `direction` from `origin` for at most `range` tiles.
///
/// The aimed tile is never `origin`: a blocked adjacent tile is itself the
/// target. Otherwise stops on the first tile holding another actor, or on
/// the last walkable tile before an obstacle.
pub(crate) fn trace(
    state: &GameState,
    origin: Position,
    direction: Direction,
    range: i32,
) -> Position {
    let mut current = origin.step(direction);
    for _ in 1..range.max(1) {
        let occupied = state.actor_at(current).is_some_and(|actor| !actor.is_player);
        if occupied || !state.map.is_walkable(current) {
            break;
        }
        let next = current.step(direction);
        if !state.map.is_walkable(next) {
            break;
        }
        current = next;
    }
    current
}

fn fire(ctx: &mut ActionContext<'_>, item: EntityId, direction: Direction) {
    let Some(player) = ctx.state.player() else {
        return;
    };
    let origin = player.position;
    let user = player.id;
    let Some(index) = player.inventory_index(item) else {
        ctx.state.pending_item = None;
        ctx.transition(Phase::PlayerTurn);
        return;
    };
    let used = player.inventory[index].clone();

    let target = trace(ctx.state, origin, direction, ctx.config.targeting_range);
    effect::use_item(ctx, user, &used, Some(target));

    if let Some(player) = ctx.state.player_mut() {
        player.take_from_inventory(item);
    }
    ctx.state.pending_item = None;
    ctx.transition(Phase::EnemyTurn);
}

fn aim_interaction(ctx: &mut ActionContext<'_>, direction: Direction) {
    let Some(origin) = ctx.state.player_position() else {
        return;
    };
    let target = origin.step(direction);
    if !ctx.state.map.contains(target) {
        ctx.state.log(LogKind::Info, "There is nothing there.");
        ctx.transition(Phase::PlayerTurn);
        return;
    }

    interact::interact_at(ctx, target);
    if ctx.state.phase == Phase::Targeting {
        ctx.transition(Phase::PlayerTurn);
    }
}
