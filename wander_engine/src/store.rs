//! Persistence collaborators.
//!
//! The engine reports progress to a [`WorldStore`]: `flush` after every
//! executed action, `commit` once per completed player command. What a store
//! does with that is up to it; [`RonSnapshotStore`] writes the world to a RON
//! file on commit, [`MemoryStore`] only records the calls.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::WANDER_VERSION;
use crate::world::World;

pub trait WorldStore {
    /// Called after each executed action, with the world already mutated.
    ///
    /// # Errors
    /// Implementation specific.
    fn flush(&mut self, world: &World) -> Result<()>;

    /// Called once after each completed player command.
    ///
    /// # Errors
    /// Implementation specific.
    fn commit(&mut self, world: &World) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Flush,
    Commit,
}

/// Records flush / commit calls. Clones share the same log, so a test can keep
/// a handle while the session owns the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Rc<RefCell<Vec<StoreEvent>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.borrow().clone()
    }

    pub fn flushes(&self) -> usize {
        self.count(StoreEvent::Flush)
    }

    pub fn commits(&self) -> usize {
        self.count(StoreEvent::Commit)
    }

    fn count(&self, event: StoreEvent) -> usize {
        self.events.borrow().iter().filter(|e| **e == event).count()
    }
}

impl WorldStore for MemoryStore {
    fn flush(&mut self, _world: &World) -> Result<()> {
        self.events.borrow_mut().push(StoreEvent::Flush);
        Ok(())
    }

    fn commit(&mut self, _world: &World) -> Result<()> {
        self.events.borrow_mut().push(StoreEvent::Commit);
        Ok(())
    }
}

/// Writes a RON snapshot of the world on commit, if anything was flushed since the last one.
#[derive(Debug, Clone)]
pub struct RonSnapshotStore {
    path: PathBuf,
    dirty: bool,
}

impl RonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorldStore for RonSnapshotStore {
    fn flush(&mut self, _world: &World) -> Result<()> {
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self, world: &World) -> Result<()> {
        if self.dirty {
            save_snapshot(world, &self.path)?;
            self.dirty = false;
        }
        Ok(())
    }
}

/// Serialize the world to `path` in RON format, creating parent directories as needed.
///
/// # Errors
/// - on serialization or file system errors
pub fn save_snapshot(world: &World, path: &Path) -> Result<()> {
    let world_ron = ron::ser::to_string_pretty(world, ron::ser::PrettyConfig::default())
        .with_context(|| "error converting World to 'ron' format".to_string())?;

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).with_context(|| format!("error creating snapshot folder '{}'", dir.display()))?;
    }
    fs::write(path, world_ron).with_context(|| format!("failed to write snapshot to '{}'", path.display()))?;
    info!("world snapshot written to '{}'", path.display());
    Ok(())
}

/// Load a world snapshot written by [`save_snapshot`].
///
/// # Errors
/// - if the file cannot be read or parsed
pub fn load_snapshot(path: &Path) -> Result<World> {
    let text = fs::read_to_string(path).with_context(|| format!("reading snapshot '{}'", path.display()))?;
    let world: World = ron::from_str(&text).with_context(|| format!("parsing snapshot '{}'", path.display()))?;
    if world.version != WANDER_VERSION {
        warn!(
            "snapshot '{}' was written by version {} (running {WANDER_VERSION})",
            path.display(),
            world.version
        );
    }
    info!("world snapshot loaded from '{}'", path.display());
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::NAMESPACE_INVENTORY_ITEM;
    use crate::item::ItemHolder;
    use crate::testutil::{cellar_world, id};

    #[test]
    fn memory_store_counts_are_shared_between_clones() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        let world = World::new_empty();
        store.flush(&world).unwrap();
        store.flush(&world).unwrap();
        store.commit(&world).unwrap();
        assert_eq!(handle.flushes(), 2);
        assert_eq!(handle.commits(), 1);
        assert_eq!(handle.events().last(), Some(&StoreEvent::Commit));
    }

    #[test]
    fn snapshot_round_trips_world_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves").join("snapshot.ron");
        let mut world = cellar_world();
        let key = id(&NAMESPACE_INVENTORY_ITEM, "key");
        world.player.add_item(key);

        save_snapshot(&world, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert!(loaded.player.contains_item(key));
        assert_eq!(loaded.items.len(), world.items.len());
        assert_eq!(loaded.actions.len(), world.actions.len());
        assert_eq!(loaded.game.title, world.game.title);
    }

    #[test]
    fn snapshot_store_writes_only_after_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auto.ron");
        let world = cellar_world();
        let mut store = RonSnapshotStore::new(&path);

        store.commit(&world).unwrap();
        assert!(!path.exists());

        store.flush(&world).unwrap();
        store.commit(&world).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(&dir.path().join("nope.ron")).unwrap_err();
        assert!(err.to_string().contains("reading snapshot"));
    }
}
