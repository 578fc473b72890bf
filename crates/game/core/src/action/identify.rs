use super::{Action, ActionContext, ItemGroup, wrap_selection};
use crate::engine::Phase;
use crate::state::{GameState, LogKind};

/// Unidentified inventory items grouped by display name, excluding the
/// pending identify item itself.
pub fn identify_groups(state: &GameState) -> Vec<ItemGroup> {
    let Some(player) = state.player() else {
        return Vec::new();
    };
    let mut groups: Vec<ItemGroup> = Vec::new();
    let candidates = player
        .inventory
        .iter()
        .filter(|item| !item.is_identified() && Some(item.id) != state.pending_item);
    for item in candidates {
        let name = item.display_name();
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.items.push(item.id),
            None => groups.push(ItemGroup {
                name: name.to_owned(),
                items: vec![item.id],
            }),
        }
    }
    groups
}

pub(super) fn handle(ctx: &mut ActionContext<'_>, action: Action) {
    match action {
        Action::SelectNext | Action::SelectPrevious => {
            let len = identify_groups(ctx.state).len();
            ctx.state.selection =
                wrap_selection(ctx.state.selection, len, action == Action::SelectNext);
        }
        Action::Confirm => confirm(ctx),
        Action::Cancel => back_to_inventory(ctx),
        _ => {}
    }
}

fn back_to_inventory(ctx: &mut ActionContext<'_>) {
    ctx.state.pending_item = None;
    ctx.state.selection = 0;
    ctx.transition(Phase::Inventory);
}

fn confirm(ctx: &mut ActionContext<'_>) {
    let groups = identify_groups(ctx.state);
    let Some(chosen) = groups
        .get(ctx.state.selection % groups.len().max(1))
        .and_then(|group| group.items.first().copied())
    else {
        ctx.state.log(LogKind::Info, "You have nothing to identify.");
        return back_to_inventory(ctx);
    };
    let scroll = ctx.state.pending_item.take();

    let Some(player) = ctx.state.player_mut() else {
        return;
    };
    let Some(key) = player
        .inventory
        .iter()
        .find(|item| item.id == chosen)
        .map(|item| item.key.clone())
    else {
        return;
    };

    let mut revealed = None;
    for item in player
        .inventory
        .iter_mut()
        .chain(player.equipment.values_mut())
        .filter(|item| item.key == key)
    {
        item.identified = true;
        revealed.get_or_insert_with(|| item.name.clone());
    }
    if let Some(scroll) = scroll {
        player.take_from_inventory(scroll);
    }

    if let Some(name) = revealed {
        ctx.state
            .log(LogKind::Info, format!("You identify the {name}."));
    }
    ctx.transition(Phase::EnemyTurn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::dispatch;
    use crate::config::GameConfig;
    use crate::test_support;

    fn resolve(state: &mut GameState, action: Action) {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut ctx = ActionContext::new(state, &content, &config);
        dispatch(&mut ctx, action);
    }

    fn identifying(extra: &[&str]) -> GameState {
        let mut state = test_support::arena(7, 7);
        let scroll = test_support::give_item(&mut state, "identify_scroll");
        for key in extra {
            test_support::give_item(&mut state, key);
        }
        state.pending_item = Some(scroll);
        state.phase = Phase::IdentifyMenu;
        state
    }

    #[test]
    fn confirm_identifies_every_copy_and_consumes_the_scroll() {
        let mut state = identifying(&["mystery_potion", "mystery_potion", "potion"]);
        assert_eq!(identify_groups(&state).len(), 1);

        resolve(&mut state, Action::Confirm);

        let player = state.player().unwrap();
        assert_eq!(player.inventory.len(), 3);
        assert!(
            player
                .inventory
                .iter()
                .filter(|item| item.key == "mystery_potion")
                .all(|item| item.is_identified())
        );
        assert_eq!(state.pending_item, None);
        assert_eq!(state.phase, Phase::EnemyTurn);
    }

    #[test]
    fn cancel_returns_to_the_inventory_without_consuming() {
        let mut state = identifying(&["mystery_potion"]);
        resolve(&mut state, Action::Cancel);

        assert_eq!(state.phase, Phase::Inventory);
        assert_eq!(state.player().unwrap().inventory.len(), 2);
        assert_eq!(state.pending_item, None);
    }

    #[test]
    fn nothing_to_identify_keeps_the_scroll() {
        let mut state = identifying(&["potion"]);
        resolve(&mut state, Action::Confirm);

        assert_eq!(state.phase, Phase::Inventory);
        assert_eq!(state.player().unwrap().inventory.len(), 2);
    }
}
