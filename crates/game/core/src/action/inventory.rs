use super::{Action, ActionContext, effect, wrap_selection};
use crate::engine::Phase;
use crate::state::{Actor, EntityId, ItemEffect, LogKind};

/// Inventory items sharing one display name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemGroup {
    pub name: String,
    /// Members in inventory order; the first one is used on confirm.
    pub items: Vec<EntityId>,
}

impl ItemGroup {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Groups an actor's inventory by display name, in first-seen order.
pub fn inventory_groups(actor: &Actor) -> Vec<ItemGroup> {
    let mut groups: Vec<ItemGroup> = Vec::new();
    for item in &actor.inventory {
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
            let len = player_groups(ctx).len();
            ctx.state.selection =
                wrap_selection(ctx.state.selection, len, action == Action::SelectNext);
        }
        Action::Confirm => {
            if let Some(item) = selected_item(ctx) {
                use_selected(ctx, item);
            }
        }
        Action::Drop => {
            if let Some(item) = selected_item(ctx) {
                drop_item(ctx, item);
            }
        }
        Action::Equip => {
            if let Some(item) = selected_item(ctx) {
                equip_item(ctx, item);
            }
        }
        Action::Cancel => ctx.transition(Phase::PlayerTurn),
        _ => {}
    }
}

fn player_groups(ctx: &ActionContext<'_>) -> Vec<ItemGroup> {
    ctx.state.player().map(inventory_groups).unwrap_or_default()
}

fn selected_item(ctx: &ActionContext<'_>) -> Option<EntityId> {
    let groups = player_groups(ctx);
    if groups.is_empty() {
        return None;
    }
    groups[ctx.state.selection % groups.len()].items.first().copied()
}

fn use_selected(ctx: &mut ActionContext<'_>, id: EntityId) {
    let Some(player) = ctx.state.player() else {
        return;
    };
    let user = player.id;
    let Some(item) = player.inventory.iter().find(|item| item.id == id).cloned() else {
        return;
    };

    match item.primary_effect() {
        None => {
            let message = if item.equipment.is_some() {
                format!("The {} must be equipped to be of use.", item.display_name())
            } else {
                format!("The {} cannot be used.", item.display_name())
            };
            ctx.state.log(LogKind::Info, message);
        }
        Some(ItemEffect::Identify) => {
            ctx.state.pending_item = Some(id);
            ctx.state.selection = 0;
            ctx.transition(Phase::IdentifyMenu);
        }
        Some(_) if item.requires_target() => {
            ctx.state.pending_item = Some(id);
            ctx.state.log(
                LogKind::Info,
                format!("Aim the {} in which direction?", item.display_name()),
            );
            ctx.transition(Phase::Targeting);
        }
        Some(_) => {
            effect::use_item(ctx, user, &item, None);
            if let Some(player) = ctx.state.player_mut() {
                player.take_from_inventory(id);
            }
            ctx.transition(Phase::EnemyTurn);
        }
    }
}

fn drop_item(ctx: &mut ActionContext<'_>, id: EntityId) {
    let Some(player) = ctx.state.player_mut() else {
        return;
    };
    let position = player.position;
    let Some(mut item) = player.take_from_inventory(id) else {
        return;
    };
    item.position = position;
    let message = format!("You drop the {}.", item.display_name());
    ctx.state.items.push(item);
    ctx.state.log(LogKind::Info, message);
    ctx.transition(Phase::EnemyTurn);
}

fn equip_item(ctx: &mut ActionContext<'_>, id: EntityId) {
    let Some(player) = ctx.state.player_mut() else {
        return;
    };
    let Some(slot) = player
        .inventory
        .iter()
        .find(|item| item.id == id)
        .and_then(|item| item.equipment.as_ref())
        .map(|spec| spec.slot)
    else {
        ctx.state.log(LogKind::Info, "You cannot equip that.");
        return;
    };
    let Some(item) = player.take_from_inventory(id) else {
        return;
    };

    let mut message = format!("You equip the {}.", item.display_name());
    if let Some(previous) = player.equipment.insert(slot, item) {
        message.push_str(&format!(" You put away the {}.", previous.display_name()));
        player.inventory.push(previous);
    }
    ctx.state.log(LogKind::Info, message);
    ctx.transition(Phase::EnemyTurn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::dispatch;
    use crate::config::GameConfig;
    use crate::state::{EquipmentSlot, GameState};
    use crate::test_support;

    fn resolve(state: &mut GameState, action: Action) {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut ctx = ActionContext::new(state, &content, &config);
        dispatch(&mut ctx, action);
    }

    fn with_inventory(keys: &[&str]) -> GameState {
        let mut state = test_support::arena(7, 7);
        for key in keys {
            test_support::give_item(&mut state, key);
        }
        state.phase = Phase::Inventory;
        state.selection = 0;
        state
    }

    #[test]
    fn groups_follow_display_names() {
        let state = with_inventory(&["potion", "potion", "fire_scroll", "mystery_potion"]);
        let groups = inventory_groups(state.player().unwrap());
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].count(), 2);
        assert_eq!(groups[2].name, "murky potion");
    }

    #[test]
    fn previous_wraps_on_group_count() {
        let mut state = with_inventory(&["potion", "potion", "fire_scroll", "mystery_potion"]);
        resolve(&mut state, Action::SelectPrevious);
        assert_eq!(state.selection, 2);
    }

    #[test]
    fn immediate_item_is_consumed() {
        let mut state = with_inventory(&["potion", "potion"]);
        if let Some(player) = state.player_mut() {
            player.hp.current = 1;
        }
        resolve(&mut state, Action::Confirm);

        let player = state.player().unwrap();
        assert_eq!(player.inventory.len(), 1);
        assert!(player.hp.current > 1);
        assert_eq!(state.phase, Phase::EnemyTurn);
    }

    #[test]
    fn targeted_item_opens_targeting() {
        let mut state = with_inventory(&["fire_scroll"]);
        resolve(&mut state, Action::Confirm);
        assert_eq!(state.phase, Phase::Targeting);
        assert!(state.pending_item.is_some());
        assert_eq!(state.player().unwrap().inventory.len(), 1);
    }

    #[test]
    fn identify_scroll_opens_the_identify_menu() {
        let mut state = with_inventory(&["identify_scroll", "mystery_potion"]);
        resolve(&mut state, Action::Confirm);
        assert_eq!(state.phase, Phase::IdentifyMenu);
        assert!(state.pending_item.is_some());
    }

    #[test]
    fn item_without_effect_only_logs() {
        let mut state = with_inventory(&["venom_dagger"]);
        resolve(&mut state, Action::Confirm);
        assert_eq!(state.phase, Phase::Inventory);
        assert_eq!(state.player().unwrap().inventory.len(), 1);
    }

    #[test]
    fn drop_places_the_item_underfoot() {
        let mut state = with_inventory(&["potion"]);
        resolve(&mut state, Action::Drop);

        assert!(state.player().unwrap().inventory.is_empty());
        assert_eq!(state.items.len(), 1);
        assert_eq!(Some(state.items[0].position), state.player_position());
        assert_eq!(state.phase, Phase::EnemyTurn);
    }

    #[test]
    fn equip_swaps_the_previous_item_back() {
        let mut state = with_inventory(&["venom_dagger"]);
        let old = test_support::equip(&mut state, "short_sword");
        resolve(&mut state, Action::Equip);

        let player = state.player().unwrap();
        assert_eq!(
            player.equipment.get(&EquipmentSlot::Weapon).map(|item| item.key.as_str()),
            Some("venom_dagger")
        );
        assert!(player.inventory_index(old).is_some());
        assert_eq!(state.phase, Phase::EnemyTurn);
    }

    #[test]
    fn close_returns_to_the_player_turn() {
        let mut state = with_inventory(&[]);
        resolve(&mut state, Action::Cancel);
        assert_eq!(state.phase, Phase::PlayerTurn);
    }
}
