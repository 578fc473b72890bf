//! Phase state machine.

use crate::state::GameState;

/// Legal category of input at a given moment.
///
/// `Win` and `Loss` are terminal for the current run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    MainMenu,
    #[default]
    PlayerTurn,
    EnemyTurn,
    CombatMenu,
    Targeting,
    Inventory,
    IdentifyMenu,
    Dialogue,
    MessageLog,
    Win,
    Loss,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::Loss)
    }
}

/// Notification emitted when the phase actually changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
}

/// Read-only listener for phase changes.
///
/// Observers receive the change after the action that caused it has fully
/// resolved and must not assume they can touch world data.
pub trait PhaseObserver {
    fn on_transition(&mut self, change: PhaseChange);
}

impl<F> PhaseObserver for F
where
    F: FnMut(PhaseChange),
{
    fn on_transition(&mut self, change: PhaseChange) {
        self(change)
    }
}

/// Moves `state` into `to`.
///
/// Returns `None` when `to` is already the current phase. Adjacency is not
/// checked here; handlers only request transitions that make sense.
pub fn transition(state: &mut GameState, to: Phase) -> Option<PhaseChange> {
    let from = state.phase;
    if from == to {
        return None;
    }
    debug_assert!(
        to != Phase::Dialogue || state.conversation.is_some(),
        "entered Dialogue without a conversation context"
    );

    state.phase = to;
    tracing::debug!(%from, %to, "phase transition");
    Some(PhaseChange { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Conversation;

    #[test]
    fn same_phase_is_a_no_op() {
        let mut state = GameState::new(1, 10);
        assert_eq!(transition(&mut state, Phase::PlayerTurn), None);
        assert_eq!(state.phase, Phase::PlayerTurn);
    }

    #[test]
    fn change_is_reported() {
        let mut state = GameState::new(1, 10);
        let change = transition(&mut state, Phase::Inventory);
        assert_eq!(
            change,
            Some(PhaseChange {
                from: Phase::PlayerTurn,
                to: Phase::Inventory
            })
        );
        assert_eq!(state.phase, Phase::Inventory);
    }

    #[test]
    fn dialogue_with_context_is_allowed() {
        let mut state = GameState::new(1, 10);
        state.conversation = Some(Conversation::new("elder", "greeting"));
        assert!(transition(&mut state, Phase::Dialogue).is_some());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "without a conversation")]
    fn dialogue_without_context_fails_loudly() {
        let mut state = GameState::new(1, 10);
        transition(&mut state, Phase::Dialogue);
    }
}
