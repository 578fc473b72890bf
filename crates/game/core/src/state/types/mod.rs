pub mod actor;
pub mod common;
pub mod conversation;
pub mod entities;
pub mod item;
pub mod log;
pub mod map;

pub use actor::{Actor, AiKind};
pub use common::{Direction, EntityId, Position, ResourceMeter};
pub use conversation::Conversation;
pub use entities::{Entity, Interaction, StairDirection};
pub use item::{EquipmentSlot, EquipmentSpec, Item, ItemEffect, StatusEffect, StatusKind};
pub use log::{LogEntry, LogKind, MessageLog};
pub use map::{Tile, TileFlags, TileMap};
