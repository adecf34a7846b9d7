//! Locations: the places the player can be in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::ItemHolder;
use crate::world::WorldObject;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub description: String,
    /// Items lying here, in authored order.
    pub items: Vec<Uuid>,
    pub persons: Vec<Uuid>,
    /// Ways leading out of this location.
    pub ways_out: Vec<Uuid>,
}

impl WorldObject for Location {
    fn id(&self) -> Uuid {
        self.id
    }
    fn symbol(&self) -> &str {
        &self.symbol
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.description
    }
}

impl Location {
    pub fn add_person(&mut self, person_id: Uuid) {
        if !self.persons.contains(&person_id) {
            self.persons.push(person_id);
        }
    }

    pub fn remove_person(&mut self, person_id: Uuid) {
        self.persons.retain(|id| *id != person_id);
    }
}

impl ItemHolder for Location {
    fn add_item(&mut self, item_id: Uuid) {
        if !self.items.contains(&item_id) {
            self.items.push(item_id);
        }
    }

    fn remove_item(&mut self, item_id: Uuid) {
        self.items.retain(|id| *id != item_id);
    }

    fn contains_item(&self, item_id: Uuid) -> bool {
        self.items.contains(&item_id)
    }
}
