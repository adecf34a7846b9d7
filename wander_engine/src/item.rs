//! Items and inventory items.
//!
//! An [`Item`] lies in a location and can be taken, used and inspected. Taking
//! it usually grants one or more [`InventoryItem`]s, which the player carries
//! and can use on their own or together with a partner object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::world::{ObjectRef, WorldObject};

/// Anything that holds items by id.
pub trait ItemHolder {
    /// Insert an item into the holder's contents.
    fn add_item(&mut self, item_id: Uuid);
    /// Remove an item from the holder's contents.
    fn remove_item(&mut self, item_id: Uuid);
    /// Return `true` when the holder already contains the given item.
    fn contains_item(&self, item_id: Uuid) -> bool;
}

/// Inspect behaviour shared by items, inventory items, persons and ways.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub text: Option<String>,
    pub custom_commands: Vec<String>,
    pub actions: Vec<Uuid>,
}

/// Use behaviour of items and inventory items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub enabled: bool,
    pub forbidden_text: Option<String>,
    pub successful_text: Option<String>,
    pub custom_commands: Vec<String>,
    pub actions: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub description: String,
    /// `None` once the item has been removed from play.
    pub location: Option<Uuid>,
    pub identifiers: Vec<String>,
    /// The item's own take action. Its enabled flag decides whether the item can be taken.
    pub take_action: Uuid,
    pub take_successful_text: Option<String>,
    pub custom_take_commands: Vec<String>,
    /// Additional actions triggered on every take attempt.
    pub take_actions: Vec<Uuid>,
    pub usage: Usage,
    pub inspection: Inspection,
}

impl WorldObject for Item {
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

/// Use-with or combine information for one partner of an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub partner: ObjectRef,
    pub enabled: bool,
    pub forbidden_text: Option<String>,
    pub successful_text: Option<String>,
    pub custom_commands: Vec<String>,
    pub actions: Vec<Uuid>,
}

impl Interaction {
    /// Combinations pair two inventory items; everything else is a use-with.
    pub fn is_combination(&self) -> bool {
        self.partner.is_inventory_item()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub identifiers: Vec<String>,
    pub usage: Usage,
    pub inspection: Inspection,
    pub interactions: Vec<Interaction>,
}

impl WorldObject for InventoryItem {
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

impl InventoryItem {
    pub fn interaction_with(&self, partner: ObjectRef) -> Option<&Interaction> {
        self.interactions.iter().find(|i| i.partner == partner)
    }

    pub fn interaction_with_mut(&mut self, partner: ObjectRef) -> Option<&mut Interaction> {
        self.interactions.iter_mut().find(|i| i.partner == partner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    #[test]
    fn location_holds_items_once_in_order() {
        let mut hall = Location::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        hall.add_item(a);
        hall.add_item(b);
        hall.add_item(a);
        assert_eq!(hall.items, vec![a, b]);
        hall.remove_item(a);
        assert!(!hall.contains_item(a));
        assert!(hall.contains_item(b));
    }

    #[test]
    fn finds_interaction_by_partner() {
        let chest = ObjectRef::Item(Uuid::new_v4());
        let key = InventoryItem {
            interactions: vec![Interaction {
                partner: chest,
                enabled: true,
                forbidden_text: None,
                successful_text: None,
                custom_commands: Vec::new(),
                actions: Vec::new(),
            }],
            ..InventoryItem::default()
        };
        assert!(key.interaction_with(chest).is_some_and(|i| !i.is_combination()));
        assert!(key.interaction_with(ObjectRef::Item(Uuid::new_v4())).is_none());
    }
}
