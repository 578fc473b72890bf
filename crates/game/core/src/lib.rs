//! Deterministic dungeon rules and data types shared across crates.
//!
//! `crawl-core` defines the canonical rules (phases, actions, world
//! generation, field of view) and exposes pure APIs that the runtime drives.
//! All state mutation flows through [`engine::GameEngine`]; content arrives
//! through the [`env::ContentOracle`] trait so the rules never touch files.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod fov;
pub mod mapgen;
pub mod state;
pub mod world;

#[cfg(test)]
mod test_support;

pub use action::{Action, CombatOption, ItemGroup};
pub use config::GameConfig;
pub use engine::{GameEngine, Phase, PhaseChange, PhaseObserver, ResolveOutcome};
pub use env::{ContentError, ContentKind, ContentOracle, ContentTables, GameRng};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    Actor, Direction, EntityId, GameState, Item, LevelSnapshot, LogEntry, LogKind, Position,
    Tile, TileMap,
};
pub use world::{Arrival, new_game, travel};
