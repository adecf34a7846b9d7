#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const WANDER_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod command;
pub mod conversation;
pub mod data_paths;
pub mod entity_search;
pub mod error;
pub mod game;
pub mod idgen;
pub mod item;
pub mod loader;
pub mod location;
pub mod message;
pub mod parser;
pub mod person;
pub mod player;
pub mod repl;
pub mod session;
pub mod store;
pub mod style;
pub mod trigger;
pub mod view;
pub mod way;
pub mod world;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports for convenience
pub use command::{CommandKind, ParsedCommand};
pub use error::EngineError;
pub use item::{InventoryItem, Item, ItemHolder};
pub use loader::{build_world, load_world, load_world_from};
pub use location::Location;
pub use player::Player;
pub use repl::{Terminal, run_repl};
pub use session::{GameSession, SessionStatus};
pub use view::{MessageKind, View, ViewItem};
pub use world::{ObjectRef, World, WorldObject};
