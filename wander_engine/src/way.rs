//! Ways: one-directional connections between locations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::Inspection;
use crate::world::WorldObject;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Way {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub from: Uuid,
    pub to: Uuid,
    pub identifiers: Vec<String>,
    /// The way's own move action. Its enabled flag decides whether the way can be used.
    pub move_action: Uuid,
    pub move_successful_text: Option<String>,
    pub custom_move_commands: Vec<String>,
    /// Additional actions triggered on every move attempt.
    pub move_actions: Vec<Uuid>,
    pub inspection: Inspection,
}

impl WorldObject for Way {
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
