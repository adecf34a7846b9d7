//! A running game: the world plus everything the engine needs around it.

use anyhow::Result;
use log::info;

use crate::parser::PatternCache;
use crate::store::{MemoryStore, WorldStore};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// An `EndGame` action ran.
    GameOver,
    /// The player used the exit command.
    Quit,
}

/// Explicit context passed to the parser, the handlers and the trigger engine.
pub struct GameSession {
    pub world: World,
    pub patterns: PatternCache,
    pub status: SessionStatus,
    pub store: Box<dyn WorldStore>,
}

impl GameSession {
    /// Session backed by an in-memory store.
    pub fn new(world: World) -> Self {
        Self::with_store(world, Box::new(MemoryStore::new()))
    }

    pub fn with_store(world: World, store: Box<dyn WorldStore>) -> Self {
        Self {
            world,
            patterns: PatternCache::new(),
            status: SessionStatus::Running,
            store,
        }
    }

    pub fn is_over(&self) -> bool {
        self.status != SessionStatus::Running
    }

    pub fn end_game(&mut self) {
        info!("game over");
        self.status = SessionStatus::GameOver;
    }

    pub fn quit(&mut self) {
        info!("player quit");
        self.status = SessionStatus::Quit;
    }

    /// Report one executed action to the store.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn flush(&mut self) -> Result<()> {
        self.store.flush(&self.world)
    }

    /// Report a completed player command to the store.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn commit(&mut self) -> Result<()> {
        self.store.commit(&self.world)
    }
}
