//! Action resolution entry point.
//!
//! The [`GameEngine`] is the only writer of [`GameState`]. It dispatches an
//! abstract [`Action`] to the handler of the current phase, enforces the
//! player invariant, and reports every phase change to an optional observer.

mod phase;

pub use phase::{Phase, PhaseChange, PhaseObserver, transition};

use crate::action::{self, Action, ActionContext};
use crate::config::GameConfig;
use crate::env::ContentOracle;
use crate::state::GameState;

/// Phase changes produced while resolving one action, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub transitions: Vec<PhaseChange>,
}

impl ResolveOutcome {
    /// Phase the action ended in, if it changed.
    pub fn final_phase(&self) -> Option<Phase> {
        self.transitions.last().map(|change| change.to)
    }
}

/// Game engine that resolves abstract actions against the world state.
///
/// Resolution never fails: impossible or meaningless actions are either
/// ignored or narrated through the message log.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    content: &'a dyn ContentOracle,
    config: &'a GameConfig,
    observer: Option<&'a mut dyn PhaseObserver>,
}

impl<'a> GameEngine<'a> {
    pub fn new(
        state: &'a mut GameState,
        content: &'a dyn ContentOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            state,
            content,
            config,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: &'a mut dyn PhaseObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Resolves `action` in the current phase.
    pub fn resolve(&mut self, action: Action) -> ResolveOutcome {
        let mut ctx = ActionContext::new(self.state, self.content, self.config);
        action::dispatch(&mut ctx, action);

        let players = ctx.state.actors.iter().filter(|a| a.is_player).count();
        debug_assert!(players <= 1, "more than one player actor");
        if players == 0 && ctx.state.phase != Phase::Loss {
            ctx.transition(Phase::Loss);
        }

        let transitions = ctx.into_transitions();
        if let Some(observer) = self.observer.as_deref_mut() {
            for change in &transitions {
                observer.on_transition(*change);
            }
        }
        ResolveOutcome { transitions }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Direction;
    use crate::test_support;

    #[test]
    fn observer_sees_every_change() {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut state = test_support::arena(7, 7);
        let mut seen = Vec::new();
        let mut record = |change: PhaseChange| seen.push(change);

        let outcome = GameEngine::new(&mut state, &content, &config)
            .with_observer(&mut record)
            .resolve(Action::Move(Direction::East));

        assert_eq!(outcome.final_phase(), Some(Phase::EnemyTurn));
        assert_eq!(
            seen,
            vec![PhaseChange {
                from: Phase::PlayerTurn,
                to: Phase::EnemyTurn
            }]
        );
    }

    #[test]
    fn losing_the_player_ends_the_run() {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut state = test_support::arena(7, 7);
        state.actors.retain(|actor| !actor.is_player);

        let outcome = GameEngine::new(&mut state, &content, &config).resolve(Action::Wait);

        assert_eq!(outcome.final_phase(), Some(Phase::Loss));
        assert_eq!(state.phase, Phase::Loss);
    }

    #[test]
    fn terminal_phases_ignore_input() {
        let content = test_support::content();
        let config = GameConfig::default();
        let mut state = test_support::arena(7, 7);
        state.phase = Phase::Win;
        let before = state.clone();

        GameEngine::new(&mut state, &content, &config).resolve(Action::Move(Direction::East));

        assert_eq!(state, before);
    }
}
