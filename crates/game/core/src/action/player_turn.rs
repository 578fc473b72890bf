use super::{Action, ActionContext, interact};
use crate::engine::Phase;
use crate::state::{Direction, Entity, Interaction, LogKind};

pub(super) fn handle(ctx: &mut ActionContext<'_>, action: Action) {
    match action {
        Action::Move(direction) => move_player(ctx, direction),
        Action::Wait => ctx.transition(Phase::EnemyTurn),
        Action::Pickup => pickup(ctx),
        Action::Interact => {
            ctx.state.pending_item = None;
            ctx.state.log(LogKind::Info, "Interact in which direction?");
            ctx.transition(Phase::Targeting);
        }
        Action::OpenInventory => {
            let has_items = ctx
                .state
                .player()
                .is_some_and(|player| !player.inventory.is_empty());
            if has_items {
                ctx.state.selection = 0;
            }
            ctx.transition(Phase::Inventory);
        }
        Action::OpenMessageLog => {
            ctx.state.log_offset = 0;
            ctx.transition(Phase::MessageLog);
        }
        _ => {}
    }
}

fn move_player(ctx: &mut ActionContext<'_>, direction: Direction) {
    let Some(origin) = ctx.state.player_position() else {
        return;
    };
    let destination = origin.step(direction);

    if !ctx.state.map.contains(destination) {
        ctx.state.log(LogKind::Info, "You cannot go that way.");
        return;
    }

    if ctx.state.entity_at(destination).is_some_and(Entity::is_stairs) {
        interact::interact_at(ctx, destination);
        return;
    }

    let defender = ctx
        .state
        .actor_at(destination)
        .filter(|actor| !actor.is_player)
        .map(|actor| actor.id);
    if let Some(defender) = defender {
        ctx.state.combat_target = Some(defender);
        ctx.state.selection = 0;
        ctx.transition(Phase::CombatMenu);
        return;
    }

    if !ctx.state.map.is_walkable(destination) {
        let closed_door = ctx
            .state
            .entity_at(destination)
            .is_some_and(|entity| matches!(entity.interaction, Some(Interaction::Door { .. })));
        let message = if closed_door {
            "The door is closed."
        } else {
            "You bump into a wall."
        };
        ctx.state.log(LogKind::Info, message);
        return;
    }

    if let Some(player) = ctx.state.player_mut() {
        player.position = destination;
    }
    ctx.refresh_visibility();
    ctx.transition(Phase::EnemyTurn);
}

fn pickup(ctx: &mut ActionContext<'_>) {
    let Some(here) = ctx.state.player_position() else {
        return;
    };
    let (found, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut ctx.state.items)
        .into_iter()
        .partition(|item| item.position == here);
    ctx.state.items = remaining;

    if found.is_empty() {
        ctx.state.log(LogKind::Info, "There is nothing here to pick up.");
        return;
    }

    for item in found {
        let message = format!("You pick up the {}.", item.display_name());
        if let Some(player) = ctx.state.player_mut() {
            player.inventory.push(item);
        }
        ctx.state.log(LogKind::Loot, message);
    }
}

#[cfg(test)]
mod tests {
    use crate::action::{Action, ActionContext, dispatch};
    use crate::config::GameConfig;
    use crate::engine::Phase;
    use crate::state::{Direction, Entity, Interaction, Position, StairDirection, Tile};
    use crate::test_support;

    fn resolve(state: &mut crate::state::GameState, action: Action) {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut ctx = ActionContext::new(state, &content, &config);
        dispatch(&mut ctx, action);
    }

    #[test]
    fn successful_move_ends_the_turn_and_updates_visibility() {
        let mut state = test_support::arena(7, 7);
        resolve(&mut state, Action::Move(Direction::East));

        assert_eq!(state.player_position(), Some(Position::new(4, 3)));
        assert_eq!(state.phase, Phase::EnemyTurn);
        assert!(state.visible.contains(&Position::new(4, 3)));
        assert!(state.explored.is_superset(&state.visible));
    }

    #[test]
    fn blocked_move_only_logs() {
        let mut state = test_support::arena(7, 7);
        state.map.set(Position::new(4, 3), Tile::wall('#'));
        let before = state.clone();

        resolve(&mut state, Action::Move(Direction::East));

        assert_eq!(state.player_position(), before.player_position());
        assert_eq!(state.phase, Phase::PlayerTurn);
        assert_eq!(state.log.len(), before.log.len() + 1);
        state.log = before.log.clone();
        assert_eq!(state, before);
    }

    #[test]
    fn moving_off_the_grid_is_refused() {
        let mut state = test_support::arena(3, 3);
        if let Some(player) = state.player_mut() {
            player.position = Position::new(0, 0);
        }
        resolve(&mut state, Action::Move(Direction::NorthWest));

        assert_eq!(state.player_position(), Some(Position::new(0, 0)));
        assert_eq!(state.phase, Phase::PlayerTurn);
    }

    #[test]
    fn bumping_a_monster_opens_the_combat_menu() {
        let mut state = test_support::arena(7, 7);
        let goblin = test_support::spawn_goblin(&mut state, Position::new(4, 3));
        state.selection = 5;

        resolve(&mut state, Action::Move(Direction::East));

        assert_eq!(state.phase, Phase::CombatMenu);
        assert_eq!(state.combat_target, Some(goblin));
        assert_eq!(state.selection, 0);
        assert_eq!(state.player_position(), Some(Position::new(3, 3)));
    }

    fn place_stairs(state: &mut crate::state::GameState, position: Position, direction: StairDirection) {
        let id = state.allocate_entity_id();
        state.entities.push(Entity::new(
            id,
            "stairs",
            '>',
            position,
            Some(Interaction::Stairs { direction }),
        ));
    }

    #[test]
    fn stepping_onto_stairs_takes_them() {
        let mut state = test_support::arena(7, 7);
        state.map_id = "crypt".into();
        place_stairs(&mut state, Position::new(4, 3), StairDirection::Down);

        resolve(&mut state, Action::Move(Direction::East));

        assert_eq!(state.phase, Phase::Win);
        assert_eq!(state.player_position(), Some(Position::new(3, 3)));
    }

    #[test]
    fn sealed_stairs_up_keep_the_turn() {
        let mut state = test_support::arena(7, 7);
        state.map_id = "cellar".into();
        place_stairs(&mut state, Position::new(4, 3), StairDirection::Up);

        resolve(&mut state, Action::Move(Direction::East));

        assert_eq!(state.phase, Phase::PlayerTurn);
        assert_eq!(state.map_id, "cellar");
        assert_eq!(state.log.last().unwrap().text, "The way up is sealed.");
    }

    #[test]
    fn pickup_moves_ground_items_into_the_inventory() {
        let mut state = test_support::arena(7, 7);
        test_support::drop_item(&mut state, "potion", Position::new(3, 3));
        test_support::drop_item(&mut state, "potion", Position::new(5, 5));

        resolve(&mut state, Action::Pickup);

        let player = state.player().unwrap();
        assert_eq!(player.inventory.len(), 1);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.phase, Phase::PlayerTurn);
    }

    #[test]
    fn opening_menus_only_changes_phase() {
        let mut state = test_support::arena(7, 7);
        resolve(&mut state, Action::OpenMessageLog);
        assert_eq!(state.phase, Phase::MessageLog);

        let mut state = test_support::arena(7, 7);
        resolve(&mut state, Action::OpenInventory);
        assert_eq!(state.phase, Phase::Inventory);
    }
}
