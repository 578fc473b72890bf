//! Item effect resolution.
//!
//! Effects never fail the turn. A malformed effect (non-positive potency or
//! radius) is narrated as a fizzle and otherwise ignored.

use super::{ActionContext, combat};
use crate::state::{EntityId, Item, ItemEffect, LogKind, Position};

/// Applies every effect of `item` on behalf of `user`.
///
/// Targeted effects resolve at `target`; untargeted ones affect the user.
pub(crate) fn use_item(
    ctx: &mut ActionContext<'_>,
    user: EntityId,
    item: &Item,
    target: Option<Position>,
) {
    if item.effects.is_empty() {
        ctx.state.log(
            LogKind::Info,
            format!("The {} does nothing.", item.display_name()),
        );
        return;
    }
    for effect in &item.effects {
        apply_effect(ctx, user, item.display_name(), effect, target);
    }
}

pub(crate) fn apply_effect(
    ctx: &mut ActionContext<'_>,
    user: EntityId,
    source: &str,
    effect: &ItemEffect,
    target: Option<Position>,
) {
    if is_malformed(effect) {
        tracing::warn!(?effect, source, "malformed item effect");
        ctx.state
            .log(LogKind::Warning, format!("The {source} fizzles."));
        return;
    }

    match effect {
        ItemEffect::Heal { potency } => {
            let Some(actor) = ctx.state.actor_mut(user) else {
                return;
            };
            let restored = actor.hp.restore(*potency);
            let name = actor.name.clone();
            ctx.state
                .log(LogKind::Heal, format!("{name} recovers {restored} HP."));
        }
        ItemEffect::Damage { potency, targeted } => {
            let Some(victim) = victim(ctx, user, *targeted, target) else {
                ctx.state
                    .log(LogKind::Info, format!("The {source} hits nothing."));
                return;
            };
            combat::strike(ctx.state, source, victim, *potency);
        }
        ItemEffect::Fireball { potency, radius } => {
            let center = target
                .or_else(|| ctx.state.actor(user).map(|actor| actor.position))
                .unwrap_or_default();
            let caught: Vec<EntityId> = ctx
                .state
                .actors
                .iter()
                .filter(|actor| actor.position.distance_squared(center) <= radius * radius)
                .map(|actor| actor.id)
                .collect();
            ctx.state
                .log(LogKind::Combat, format!("The {source} explodes at {center}!"));
            for id in caught {
                combat::strike(ctx.state, source, id, *potency);
            }
        }
        ItemEffect::RevealMap => {
            let all: Vec<Position> = ctx.state.map.positions().collect();
            ctx.state.explored.extend(all);
            ctx.state
                .log(LogKind::Info, "The layout of the level floods your mind.");
        }
        ItemEffect::ApplyStatus { status, targeted } => {
            let Some(victim) = victim(ctx, user, *targeted, target) else {
                ctx.state
                    .log(LogKind::Info, format!("The {source} hits nothing."));
                return;
            };
            if let Some(actor) = ctx.state.actor_mut(victim) {
                actor.statuses.push(*status);
                let name = actor.name.clone();
                ctx.state.log(
                    LogKind::Info,
                    format!("{name} is affected by {}.", status.kind),
                );
            }
        }
        ItemEffect::Identify => {
            ctx.state.log(LogKind::Info, "Nothing happens.");
        }
        ItemEffect::IncreaseAttack { potency } => {
            if let Some(actor) = ctx.state.actor_mut(user) {
                actor.attack += potency;
                let name = actor.name.clone();
                ctx.state
                    .log(LogKind::Info, format!("{name} feels stronger."));
            }
        }
        ItemEffect::IncreaseMaxHp { potency } => {
            if let Some(actor) = ctx.state.actor_mut(user) {
                actor.hp.maximum += potency;
                actor.hp.current += potency;
                let name = actor.name.clone();
                ctx.state
                    .log(LogKind::Heal, format!("{name} feels more resilient."));
            }
        }
    }
}

fn is_malformed(effect: &ItemEffect) -> bool {
    match effect {
        ItemEffect::Heal { potency }
        | ItemEffect::Damage { potency, .. }
        | ItemEffect::IncreaseAttack { potency }
        | ItemEffect::IncreaseMaxHp { potency } => *potency <= 0,
        ItemEffect::Fireball { potency, radius } => *potency <= 0 || *radius < 0,
        ItemEffect::ApplyStatus { status, .. } => status.turns == 0,
        ItemEffect::RevealMap | ItemEffect::Identify => false,
    }
}

fn victim(
    ctx: &ActionContext<'_>,
    user: EntityId,
    targeted: bool,
    target: Option<Position>,
) -> Option<EntityId> {
    if targeted {
        target
            .and_then(|position| ctx.state.actor_at(position))
            .map(|actor| actor.id)
    } else {
        ctx.state.actor(user).map(|actor| actor.id)
    }
}
