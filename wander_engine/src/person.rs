//! Persons the player can talk to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::Inspection;
use crate::world::WorldObject;

/// Talk-to behaviour of a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub enabled: bool,
    pub forbidden_text: Option<String>,
    pub conversation: Option<Uuid>,
    pub custom_commands: Vec<String>,
    pub actions: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub location: Option<Uuid>,
    pub identifiers: Vec<String>,
    pub talk: Talk,
    pub inspection: Inspection,
}

impl WorldObject for Person {
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
    fn identifiers(&self) -> &[String] {
        &self.identifiers
    }
}
