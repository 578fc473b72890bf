//! Monster turn: AI moves and attacks, then timed statuses tick.

use super::{Action, ActionContext, combat};
use crate::engine::Phase;
use crate::state::{AiKind, Direction, EntityId, LogKind, Position, StatusKind};

pub(super) fn handle(ctx: &mut ActionContext<'_>, action: Action) {
    if action != Action::Proceed {
        return;
    }

    let acting: Vec<(EntityId, AiKind)> = ctx
        .state
        .actors
        .iter()
        .filter(|actor| !actor.is_player)
        .filter_map(|actor| actor.ai.map(|ai| (actor.id, ai)))
        .collect();
    for (id, ai) in acting {
        if ctx.state.player().is_none() {
            break;
        }
        take_turn(ctx, id, ai);
    }

    tick_statuses(ctx);

    match ctx.state.player_mut() {
        Some(player) => {
            player.action_points.refill();
            ctx.transition(Phase::PlayerTurn);
        }
        None => ctx.transition(Phase::Loss),
    }
}

fn take_turn(ctx: &mut ActionContext<'_>, id: EntityId, ai: AiKind) {
    let (Some(actor), Some(player)) = (ctx.state.actor(id), ctx.state.player()) else {
        return;
    };
    let here = actor.position;
    let target = player.position;
    let player_id = player.id;

    if here.chebyshev(target) == 1 {
        combat::melee(ctx.state, ctx.content, id, player_id, 0);
        return;
    }

    let step = match ai {
        AiKind::Hostile if ctx.state.visible.contains(&here) => chase(ctx, here, target),
        AiKind::Wanderer => {
            let direction = *ctx.state.rng.choose(&Direction::ALL).unwrap_or(&Direction::North);
            Some(here.step(direction)).filter(|next| ctx.state.is_free(*next))
        }
        AiKind::Hostile | AiKind::Stationary => None,
    };
    if let (Some(next), Some(actor)) = (step, ctx.state.actor_mut(id)) {
        actor.position = next;
    }
}

/// Free neighbouring tile that gets closest to `target`.
fn chase(ctx: &ActionContext<'_>, from: Position, target: Position) -> Option<Position> {
    let current = from.distance_squared(target);
    Direction::ALL
        .iter()
        .map(|direction| from.step(*direction))
        .filter(|next| ctx.state.is_free(*next) && next.distance_squared(target) < current)
        .min_by_key(|next| next.distance_squared(target))
}

fn tick_statuses(ctx: &mut ActionContext<'_>) {
    let mut poisoned: Vec<(EntityId, i32)> = Vec::new();

    for actor in &mut ctx.state.actors {
        let regeneration = actor.status_potency(StatusKind::Regeneration);
        if regeneration > 0 {
            actor.hp.restore(regeneration);
        }
        let poison = actor.status_potency(StatusKind::Poison);
        if poison > 0 {
            poisoned.push((actor.id, poison));
        }
        for status in &mut actor.statuses {
            status.turns = status.turns.saturating_sub(1);
        }
        actor.statuses.retain(|status| status.turns > 0);
    }

    for (id, amount) in poisoned {
        if combat::strike(ctx.state, "Poison", id, amount) == Some(true) {
            ctx.state
                .log(LogKind::Death, "The poison claims another victim.");
        }
    }
}
