//! Per-phase action handlers.
//!
//! Every phase owns a disjoint handler. An [`Action`] that means nothing in
//! the current phase is ignored without touching the state.
//!
//! # Module Structure
//!
//! - `player_turn`: movement, pickup and the doors into the sub-modes
//! - `combat`: combat menu, damage and effective stats
//! - `targeting`: free-aim interaction and directional item use
//! - `inventory` / `identify`: item menus
//! - `dialogue`: conversation navigation
//! - `message_log`: scroll-back view
//! - `enemy_turn`: monster AI and status ticks
//! - `effect`: item effect resolution
//! - `interact`: doors, chests, stairs, portals and conversations

mod combat;
mod dialogue;
mod effect;
mod enemy_turn;
mod identify;
mod interact;
mod inventory;
mod message_log;
mod player_turn;
mod targeting;

pub use combat::{CombatOption, combat_options, effective_attack, effective_defense};
pub use inventory::{ItemGroup, inventory_groups};
pub use identify::identify_groups;

use crate::config::GameConfig;
use crate::engine::{self, Phase, PhaseChange};
use crate::env::ContentOracle;
use crate::fov;
use crate::state::{Direction, GameState};

/// Abstract player intent, already mapped from device input.
///
/// The same variant can mean different things in different phases: `Move`
/// walks during the player turn and aims while targeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Move(Direction),
    Wait,
    Pickup,
    /// Enter free-aim targeting to interact with an adjacent tile.
    Interact,
    OpenInventory,
    OpenMessageLog,
    SelectNext,
    SelectPrevious,
    Confirm,
    Cancel,
    Drop,
    Equip,
    ScrollUp,
    ScrollDown,
    /// Lets the simulation advance a non-interactive phase (the enemy turn).
    Proceed,
}

/// Mutable view handed to phase handlers.
pub struct ActionContext<'a> {
    pub state: &'a mut GameState,
    pub content: &'a dyn ContentOracle,
    pub config: &'a GameConfig,
    transitions: Vec<PhaseChange>,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        state: &'a mut GameState,
        content: &'a dyn ContentOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            state,
            content,
            config,
            transitions: Vec::new(),
        }
    }

    /// Requests a phase change and records it for the observer.
    pub fn transition(&mut self, to: Phase) {
        if let Some(change) = engine::transition(self.state, to) {
            self.transitions.push(change);
        }
    }

    pub fn refresh_visibility(&mut self) {
        fov::refresh_visibility(self.state, self.config.fov_radius);
    }

    pub fn into_transitions(self) -> Vec<PhaseChange> {
        self.transitions
    }
}

/// Routes `action` to the handler of the current phase.
pub fn dispatch(ctx: &mut ActionContext<'_>, action: Action) {
    match ctx.state.phase {
        Phase::MainMenu => {
            if action == Action::Confirm {
                ctx.transition(Phase::PlayerTurn);
            }
        }
        Phase::PlayerTurn => player_turn::handle(ctx, action),
        Phase::EnemyTurn => enemy_turn::handle(ctx, action),
        Phase::CombatMenu => combat::handle(ctx, action),
        Phase::Targeting => targeting::handle(ctx, action),
        Phase::Inventory => inventory::handle(ctx, action),
        Phase::IdentifyMenu => identify::handle(ctx, action),
        Phase::Dialogue => dialogue::handle(ctx, action),
        Phase::MessageLog => message_log::handle(ctx, action),
        Phase::Win | Phase::Loss => {}
    }
}

/// Steps a menu cursor by one, wrapping on `len`. Out-of-range cursors are
/// normalized first.
pub(crate) fn wrap_selection(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    let current = current % len;
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}
