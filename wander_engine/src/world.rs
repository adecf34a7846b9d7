//! Data structures representing the game world.
//!
//! [`World`] holds every entity in per-kind arenas keyed by stable ids.
//! Relations between entities are stored as ids and resolved through the
//! lookup helpers below, which report [`EngineError::UnknownEntity`] for
//! dangling references.

use std::collections::{BTreeSet, HashMap};

use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use variantly::Variantly;

use crate::WANDER_VERSION;
use crate::command::CommandKind;
use crate::conversation::{Conversation, ConversationLayer, ConversationOption};
use crate::error::EngineError;
use crate::game::Game;
use crate::item::{Inspection, InventoryItem, Item};
use crate::location::Location;
use crate::person::Person;
use crate::player::Player;
use crate::trigger::Action;
use crate::way::Way;

/// A reference to any object the player can address by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Variantly)]
pub enum ObjectRef {
    Location(Uuid),
    Way(Uuid),
    Item(Uuid),
    InventoryItem(Uuid),
    Person(Uuid),
}

impl ObjectRef {
    pub fn id(self) -> Uuid {
        match self {
            ObjectRef::Location(id)
            | ObjectRef::Way(id)
            | ObjectRef::Item(id)
            | ObjectRef::InventoryItem(id)
            | ObjectRef::Person(id) => id,
        }
    }
}

/// Methods common to any object in the world.
pub trait WorldObject {
    fn id(&self) -> Uuid;
    fn symbol(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// Regex fragments the player may use to refer to this object.
    fn identifiers(&self) -> &[String] {
        &[]
    }
}

/// Complete state of the running game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub game: Game,
    pub player: Player,
    pub locations: HashMap<Uuid, Location>,
    pub ways: HashMap<Uuid, Way>,
    pub items: HashMap<Uuid, Item>,
    pub inventory_items: HashMap<Uuid, InventoryItem>,
    pub persons: HashMap<Uuid, Person>,
    pub conversations: HashMap<Uuid, Conversation>,
    pub layers: HashMap<Uuid, ConversationLayer>,
    pub options: HashMap<Uuid, ConversationOption>,
    pub actions: HashMap<Uuid, Action>,
    pub version: String,
}

fn lookup<'a, T>(map: &'a HashMap<Uuid, T>, kind: &'static str, id: Uuid) -> Result<&'a T, EngineError> {
    map.get(&id).ok_or(EngineError::UnknownEntity { kind, id })
}

fn lookup_mut<'a, T>(map: &'a mut HashMap<Uuid, T>, kind: &'static str, id: Uuid) -> Result<&'a mut T, EngineError> {
    map.get_mut(&id).ok_or(EngineError::UnknownEntity { kind, id })
}

impl World {
    /// Create a new empty world with a default player.
    pub fn new_empty() -> World {
        let world = Self {
            version: WANDER_VERSION.to_string(),
            ..Self::default()
        };
        info!("new, empty 'World' created");
        world
    }

    /// The location the player is in.
    ///
    /// # Errors
    /// - if the player's location id is not in the world
    pub fn player_location(&self) -> Result<&Location, EngineError> {
        self.location(self.player.location)
    }

    pub fn location(&self, id: Uuid) -> Result<&Location, EngineError> {
        lookup(&self.locations, "location", id)
    }

    pub fn location_mut(&mut self, id: Uuid) -> Result<&mut Location, EngineError> {
        lookup_mut(&mut self.locations, "location", id)
    }

    pub fn way(&self, id: Uuid) -> Result<&Way, EngineError> {
        lookup(&self.ways, "way", id)
    }

    pub fn way_mut(&mut self, id: Uuid) -> Result<&mut Way, EngineError> {
        lookup_mut(&mut self.ways, "way", id)
    }

    pub fn item(&self, id: Uuid) -> Result<&Item, EngineError> {
        lookup(&self.items, "item", id)
    }

    pub fn item_mut(&mut self, id: Uuid) -> Result<&mut Item, EngineError> {
        lookup_mut(&mut self.items, "item", id)
    }

    pub fn inventory_item(&self, id: Uuid) -> Result<&InventoryItem, EngineError> {
        lookup(&self.inventory_items, "inventory item", id)
    }

    pub fn inventory_item_mut(&mut self, id: Uuid) -> Result<&mut InventoryItem, EngineError> {
        lookup_mut(&mut self.inventory_items, "inventory item", id)
    }

    pub fn person(&self, id: Uuid) -> Result<&Person, EngineError> {
        lookup(&self.persons, "person", id)
    }

    pub fn person_mut(&mut self, id: Uuid) -> Result<&mut Person, EngineError> {
        lookup_mut(&mut self.persons, "person", id)
    }

    pub fn conversation(&self, id: Uuid) -> Result<&Conversation, EngineError> {
        lookup(&self.conversations, "conversation", id)
    }

    pub fn conversation_mut(&mut self, id: Uuid) -> Result<&mut Conversation, EngineError> {
        lookup_mut(&mut self.conversations, "conversation", id)
    }

    pub fn layer(&self, id: Uuid) -> Result<&ConversationLayer, EngineError> {
        lookup(&self.layers, "conversation layer", id)
    }

    pub fn option(&self, id: Uuid) -> Result<&ConversationOption, EngineError> {
        lookup(&self.options, "conversation option", id)
    }

    pub fn option_mut(&mut self, id: Uuid) -> Result<&mut ConversationOption, EngineError> {
        lookup_mut(&mut self.options, "conversation option", id)
    }

    pub fn action(&self, id: Uuid) -> Result<&Action, EngineError> {
        lookup(&self.actions, "action", id)
    }

    pub fn action_mut(&mut self, id: Uuid) -> Result<&mut Action, EngineError> {
        lookup_mut(&mut self.actions, "action", id)
    }

    /// Resolve an object reference to the object behind it.
    pub fn object(&self, object: ObjectRef) -> Result<&dyn WorldObject, EngineError> {
        let resolved: &dyn WorldObject = match object {
            ObjectRef::Location(id) => self.location(id)?,
            ObjectRef::Way(id) => self.way(id)?,
            ObjectRef::Item(id) => self.item(id)?,
            ObjectRef::InventoryItem(id) => self.inventory_item(id)?,
            ObjectRef::Person(id) => self.person(id)?,
        };
        Ok(resolved)
    }

    /// Inspection behaviour of an object; locations have none.
    pub fn inspection(&self, object: ObjectRef) -> Result<Option<&Inspection>, EngineError> {
        Ok(match object {
            ObjectRef::Location(_) => None,
            ObjectRef::Way(id) => Some(&self.way(id)?.inspection),
            ObjectRef::Item(id) => Some(&self.item(id)?.inspection),
            ObjectRef::InventoryItem(id) => Some(&self.inventory_item(id)?.inspection),
            ObjectRef::Person(id) => Some(&self.person(id)?.inspection),
        })
    }

    /// Custom templates registered for `kind`, grouped by the object that owns them.
    ///
    /// Interactions contribute one entry each, owned by their inventory item.
    pub fn custom_command_sources(&self, kind: CommandKind) -> Vec<(ObjectRef, &[String])> {
        let mut sources: Vec<(ObjectRef, &[String])> = Vec::new();
        match kind {
            CommandKind::Inspect => {
                sources.extend(self.items.values().map(|i| (ObjectRef::Item(i.id), &i.inspection.custom_commands[..])));
                sources.extend(
                    self.inventory_items
                        .values()
                        .map(|i| (ObjectRef::InventoryItem(i.id), &i.inspection.custom_commands[..])),
                );
                sources.extend(self.persons.values().map(|p| (ObjectRef::Person(p.id), &p.inspection.custom_commands[..])));
                sources.extend(self.ways.values().map(|w| (ObjectRef::Way(w.id), &w.inspection.custom_commands[..])));
            },
            CommandKind::Take => {
                sources.extend(self.items.values().map(|i| (ObjectRef::Item(i.id), &i.custom_take_commands[..])));
            },
            CommandKind::TalkTo => {
                sources.extend(self.persons.values().map(|p| (ObjectRef::Person(p.id), &p.talk.custom_commands[..])));
            },
            CommandKind::Move => {
                sources.extend(self.ways.values().map(|w| (ObjectRef::Way(w.id), &w.custom_move_commands[..])));
            },
            CommandKind::Use => {
                sources.extend(self.items.values().map(|i| (ObjectRef::Item(i.id), &i.usage.custom_commands[..])));
                sources.extend(
                    self.inventory_items
                        .values()
                        .map(|i| (ObjectRef::InventoryItem(i.id), &i.usage.custom_commands[..])),
                );
            },
            CommandKind::UseWithCombine => {
                for item in self.inventory_items.values() {
                    for interaction in &item.interactions {
                        sources.push((ObjectRef::InventoryItem(item.id), &interaction.custom_commands[..]));
                    }
                }
            },
            CommandKind::Exit | CommandKind::Help | CommandKind::LookAround | CommandKind::Inventory => {},
        }
        sources
    }

    /// Snapshot of all custom templates of one kind across the world.
    pub fn custom_commands(&self, kind: CommandKind) -> BTreeSet<String> {
        self.custom_command_sources(kind)
            .into_iter()
            .flat_map(|(_, templates)| templates.iter().cloned())
            .collect()
    }

    /// Display name of an object, or its id if it no longer resolves.
    pub fn object_name(&self, object: ObjectRef) -> String {
        self.object(object)
            .map_or_else(|_| object.id().to_string(), |o| o.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{cellar_world, id};
    use crate::idgen::{NAMESPACE_INVENTORY_ITEM, NAMESPACE_ITEM, NAMESPACE_LOCATION};

    #[test]
    fn player_location_resolves() {
        let world = cellar_world();
        assert_eq!(world.player_location().unwrap().name, "Hall");
    }

    #[test]
    fn unknown_ids_report_kind() {
        let world = cellar_world();
        let err = world.item(uuid::Uuid::nil()).unwrap_err();
        assert!(matches!(err, EngineError::UnknownEntity { kind: "item", .. }));
    }

    #[test]
    fn custom_commands_aggregate_per_kind() {
        let world = cellar_world();
        let take = world.custom_commands(CommandKind::Take);
        assert!(take.contains("snatch <A>"));
        let with = world.custom_commands(CommandKind::UseWithCombine);
        assert!(with.contains("unlock <B> with <A>"));
        assert!(with.contains("pry <B> with <A>"));
        assert!(world.custom_commands(CommandKind::Exit).is_empty());
    }

    #[test]
    fn objects_resolve_through_refs() {
        let world = cellar_world();
        let lamp = ObjectRef::Item(id(&NAMESPACE_ITEM, "lamp"));
        assert_eq!(world.object(lamp).unwrap().name(), "brass lamp");
        assert!(world.inspection(lamp).unwrap().is_some());
        let hall = ObjectRef::Location(id(&NAMESPACE_LOCATION, "hall"));
        assert!(world.inspection(hall).unwrap().is_none());
        let ghost = ObjectRef::InventoryItem(id(&NAMESPACE_INVENTORY_ITEM, "ghost"));
        assert_eq!(world.object_name(ghost), ghost.id().to_string());
    }
}
