//! Combat menu and damage resolution.

use super::{Action, ActionContext, wrap_selection};
use crate::engine::Phase;
use crate::env::{CombatActionKind, ContentOracle, SkillKind};
use crate::state::{Actor, EntityId, GameState, LogKind, StatusEffect, StatusKind};

/// Entry of the combat menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CombatOption {
    /// Combat action key resolvable through the content oracle.
    Action(String),
    Cancel,
}

/// Menu entries in display order: attack, defend, flee, learned active
/// skills, cancel.
pub fn combat_options(state: &GameState, content: &dyn ContentOracle) -> Vec<CombatOption> {
    let mut options: Vec<CombatOption> = ["attack", "defend", "flee"]
        .into_iter()
        .filter(|key| content.combat_action(key).is_some())
        .map(|key| CombatOption::Action(key.to_owned()))
        .collect();

    if let Some(player) = state.player() {
        for skill in &player.skills {
            let Some(SkillKind::Active { action }) = content.skill(skill).map(|s| &s.kind) else {
                continue;
            };
            if content.combat_action(action).is_some() {
                options.push(CombatOption::Action(action.clone()));
            }
        }
    }

    options.push(CombatOption::Cancel);
    options
}

/// Base attack plus equipment, passive skills and weakness.
pub fn effective_attack(actor: &Actor, content: &dyn ContentOracle) -> i32 {
    let (passive, _) = passive_bonuses(actor, content);
    actor.attack + actor.equipment_attack() + passive - actor.status_potency(StatusKind::Weakness)
}

/// Base defense plus equipment, passive skills and guard.
pub fn effective_defense(actor: &Actor, content: &dyn ContentOracle) -> i32 {
    let (_, passive) = passive_bonuses(actor, content);
    actor.defense + actor.equipment_defense() + passive + actor.status_potency(StatusKind::Guard)
}

fn passive_bonuses(actor: &Actor, content: &dyn ContentOracle) -> (i32, i32) {
    actor
        .skills
        .iter()
        .filter_map(|key| content.skill(key))
        .fold((0, 0), |(attack, defense), skill| match skill.kind {
            SkillKind::Passive {
                attack_bonus,
                defense_bonus,
            } => (attack + attack_bonus, defense + defense_bonus),
            SkillKind::Active { .. } => (attack, defense),
        })
}

/// Applies `amount` damage to `target`, removing it when it dies.
///
/// Returns `Some(true)` when the target died, `None` when it does not exist.
pub(crate) fn strike(
    state: &mut GameState,
    source: &str,
    target: EntityId,
    amount: i32,
) -> Option<bool> {
    let amount = amount.max(0);
    let actor = state.actor_mut(target)?;
    actor.hp.drain(amount);
    let name = actor.name.clone();
    let alive = actor.is_alive();

    if amount == 0 {
        state.log(
            LogKind::Combat,
            format!("{source} hits {name} but does no damage."),
        );
    } else {
        state.log(
            LogKind::Combat,
            format!("{source} hits {name} for {amount} damage."),
        );
    }

    if alive {
        return Some(false);
    }

    state.actors.retain(|actor| actor.id != target);
    if state.combat_target == Some(target) {
        state.combat_target = None;
    }
    state.log(LogKind::Death, format!("{name} dies."));
    tracing::debug!(%target, %name, "actor killed");
    Some(true)
}

/// Basic attack from `attacker` to `defender` using effective stats.
///
/// A surviving defender receives the attacker's weapon on-hit status.
pub(crate) fn melee(
    state: &mut GameState,
    content: &dyn ContentOracle,
    attacker: EntityId,
    defender: EntityId,
    bonus: i32,
) {
    let (Some(a), Some(d)) = (state.actor(attacker), state.actor(defender)) else {
        return;
    };
    let damage = (effective_attack(a, content) + bonus - effective_defense(d, content)).max(0);
    let source = a.name.clone();
    let on_hit: Vec<StatusEffect> = a
        .equipment
        .values()
        .filter_map(|item| item.equipment.as_ref()?.on_hit)
        .collect();

    if strike(state, &source, defender, damage) == Some(false) && !on_hit.is_empty() {
        if let Some(target) = state.actor_mut(defender) {
            target.statuses.extend(on_hit.iter().copied());
            let name = target.name.clone();
            for status in on_hit {
                state.log(
                    LogKind::Combat,
                    format!("{name} is afflicted with {}.", status.kind),
                );
            }
        }
    }
}

pub(super) fn handle(ctx: &mut ActionContext<'_>, action: Action) {
    match action {
        Action::SelectNext | Action::SelectPrevious => {
            let len = combat_options(ctx.state, ctx.content).len();
            ctx.state.selection =
                wrap_selection(ctx.state.selection, len, action == Action::SelectNext);
        }
        Action::Confirm => confirm(ctx),
        Action::Cancel => leave_combat(ctx),
        _ => {}
    }
}

fn leave_combat(ctx: &mut ActionContext<'_>) {
    ctx.state.combat_target = None;
    ctx.transition(Phase::PlayerTurn);
}

fn confirm(ctx: &mut ActionContext<'_>) {
    let options = combat_options(ctx.state, ctx.content);
    let Some(option) = options.get(ctx.state.selection % options.len()) else {
        return;
    };
    let key = match option {
        CombatOption::Cancel => return leave_combat(ctx),
        CombatOption::Action(key) => key,
    };
    let Some(definition) = ctx.content.combat_action(key) else {
        return;
    };

    if definition.kind == CombatActionKind::Flee {
        ctx.state.log(LogKind::Combat, "You flee.");
        return leave_combat(ctx);
    }

    let Some(target) = ctx.state.combat_target.filter(|id| ctx.state.actor(*id).is_some()) else {
        ctx.state.combat_target = None;
        ctx.transition(Phase::EnemyTurn);
        return;
    };

    let Some(player) = ctx.state.player_mut() else {
        return;
    };
    if player.action_points.current < definition.cost {
        let message = format!(
            "Not enough action points for {} ({} needed).",
            definition.name, definition.cost
        );
        ctx.state.log(LogKind::Warning, message);
        return;
    }
    player.action_points.drain(definition.cost);
    let player_id = player.id;

    match definition.kind {
        CombatActionKind::Attack => melee(ctx.state, ctx.content, player_id, target, 0),
        CombatActionKind::PowerStrike { bonus } => {
            melee(ctx.state, ctx.content, player_id, target, bonus)
        }
        CombatActionKind::Cleave { potency } => cleave(ctx, player_id, target, potency),
        CombatActionKind::Defend => defend(ctx, player_id),
        CombatActionKind::Flee => {}
    }

    let exhausted = ctx
        .state
        .player()
        .is_none_or(|player| player.action_points.is_depleted());
    if exhausted || ctx.state.combat_target.is_none() {
        ctx.state.combat_target = None;
        ctx.transition(Phase::EnemyTurn);
    }
}

/// Hits the primary target and every other adjacent non-player actor for
/// `potency` minus the defender's defense.
fn cleave(ctx: &mut ActionContext<'_>, attacker: EntityId, primary: EntityId, potency: i32) {
    let Some(origin) = ctx.state.actor(attacker).map(|actor| actor.position) else {
        return;
    };
    let source = ctx
        .state
        .actor(attacker)
        .map(|actor| actor.name.clone())
        .unwrap_or_default();
    let mut victims = vec![primary];
    victims.extend(
        ctx.state
            .actors
            .iter()
            .filter(|actor| {
                !actor.is_player
                    && actor.id != primary
                    && actor.id != attacker
                    && actor.position.chebyshev(origin) <= 1
            })
            .map(|actor| actor.id),
    );

    for victim in victims {
        let Some(defense) = ctx
            .state
            .actor(victim)
            .map(|actor| effective_defense(actor, ctx.content))
        else {
            continue;
        };
        strike(ctx.state, &source, victim, potency - defense);
    }
}

fn defend(ctx: &mut ActionContext<'_>, actor: EntityId) {
    let Some(actor) = ctx.state.actor_mut(actor) else {
        return;
    };
    let guard = StatusEffect::new(StatusKind::Guard, actor.defense.max(1), 1);
    actor.statuses.push(guard);
    ctx.state.log(LogKind::Combat, "You raise your guard.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::dispatch;
    use crate::config::GameConfig;
    use crate::state::Position;
    use crate::test_support;

    fn resolve(state: &mut GameState, action: Action) {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut ctx = ActionContext::new(state, &content, &config);
        dispatch(&mut ctx, action);
    }

    fn in_combat(hp: i32) -> (GameState, EntityId) {
        let mut state = test_support::arena(7, 7);
        let goblin = test_support::spawn_goblin(&mut state, Position::new(4, 3));
        if let Some(actor) = state.actor_mut(goblin) {
            actor.hp.current = hp;
            actor.hp.maximum = hp;
        }
        state.combat_target = Some(goblin);
        state.phase = Phase::CombatMenu;
        (state, goblin)
    }

    #[test]
    fn menu_lists_learned_skills_before_cancel() {
        let content = test_support::content();
        let mut state = test_support::arena(7, 7);
        if let Some(player) = state.player_mut() {
            player.skills.insert("cleave".into());
        }
        let options = combat_options(&state, &content);
        assert_eq!(
            options,
            vec![
                CombatOption::Action("attack".into()),
                CombatOption::Action("defend".into()),
                CombatOption::Action("flee".into()),
                CombatOption::Action("cleave".into()),
                CombatOption::Cancel,
            ]
        );
    }

    #[test]
    fn selection_wraps_over_the_menu() {
        let (mut state, _) = in_combat(10);
        resolve(&mut state, Action::SelectPrevious);
        assert_eq!(state.selection, 3);
        resolve(&mut state, Action::SelectNext);
        assert_eq!(state.selection, 0);
    }

    #[test]
    fn attack_deals_attack_minus_defense() {
        let (mut state, goblin) = in_combat(10);
        resolve(&mut state, Action::Confirm);

        let player = state.player().unwrap();
        let expected = (player.attack - test_support::GOBLIN_DEFENSE).max(0);
        assert_eq!(state.actor(goblin).unwrap().hp.current, 10 - expected);
        assert_eq!(
            player.action_points.current,
            GameConfig::DEFAULT_ACTION_POINTS - 1
        );
        assert_eq!(state.phase, Phase::CombatMenu);
    }

    #[test]
    fn lethal_attack_removes_the_defender_and_ends_the_turn() {
        let (mut state, goblin) = in_combat(1);
        resolve(&mut state, Action::Confirm);

        assert!(state.actor(goblin).is_none());
        assert_eq!(state.log.last().map(|entry| entry.kind), Some(LogKind::Death));
        assert_eq!(state.combat_target, None);
        assert_eq!(state.phase, Phase::EnemyTurn);
    }

    #[test]
    fn insufficient_action_points_refuse_the_action() {
        let (mut state, goblin) = in_combat(10);
        if let Some(player) = state.player_mut() {
            player.action_points.current = 0;
        }
        resolve(&mut state, Action::Confirm);

        assert_eq!(state.actor(goblin).unwrap().hp.current, 10);
        assert_eq!(state.log.last().map(|entry| entry.kind), Some(LogKind::Warning));
        assert_eq!(state.phase, Phase::CombatMenu);
    }

    #[test]
    fn spending_the_last_point_ends_the_turn() {
        let (mut state, _) = in_combat(50);
        if let Some(player) = state.player_mut() {
            player.action_points.current = 1;
        }
        resolve(&mut state, Action::Confirm);
        assert_eq!(state.phase, Phase::EnemyTurn);
        assert_eq!(state.combat_target, None);
    }

    #[test]
    fn flee_and_cancel_return_to_the_player_turn() {
        let (mut state, _) = in_combat(10);
        state.selection = 2;
        resolve(&mut state, Action::Confirm);
        assert_eq!(state.phase, Phase::PlayerTurn);
        assert_eq!(state.combat_target, None);

        let (mut state, _) = in_combat(10);
        resolve(&mut state, Action::Cancel);
        assert_eq!(state.phase, Phase::PlayerTurn);
        assert_eq!(state.combat_target, None);
    }

    #[test]
    fn defend_grants_guard() {
        let (mut state, _) = in_combat(10);
        state.selection = 1;
        resolve(&mut state, Action::Confirm);

        let player = state.player().unwrap();
        assert!(player.status_potency(StatusKind::Guard) > 0);
    }

    #[test]
    fn cleave_uses_its_own_potency_on_every_adjacent_enemy() {
        let (mut state, primary) = in_combat(20);
        let flank = test_support::spawn_goblin(&mut state, Position::new(2, 2));
        let distant = test_support::spawn_goblin(&mut state, Position::new(6, 6));
        if let Some(player) = state.player_mut() {
            player.skills.insert("cleave".into());
            player.attack = 100;
        }
        state.selection = 3;

        resolve(&mut state, Action::Confirm);

        let expected = 20 - (test_support::CLEAVE_POTENCY - test_support::GOBLIN_DEFENSE);
        assert_eq!(state.actor(primary).unwrap().hp.current, expected);
        assert_eq!(
            state.actor(flank).unwrap().hp.current,
            test_support::GOBLIN_HP - (test_support::CLEAVE_POTENCY - test_support::GOBLIN_DEFENSE)
        );
        assert_eq!(
            state.actor(distant).unwrap().hp.current,
            test_support::GOBLIN_HP
        );
    }

    #[test]
    fn weapon_on_hit_status_lands_on_a_survivor() {
        let (mut state, goblin) = in_combat(50);
        test_support::equip(&mut state, "venom_dagger");
        resolve(&mut state, Action::Confirm);

        assert!(state.actor(goblin).unwrap().status_potency(StatusKind::Poison) > 0);
    }
}
