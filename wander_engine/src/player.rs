//! The player: where they are and what they carry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::ItemHolder;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub location: Uuid,
    /// Inventory item ids in the order they were received.
    pub inventory: Vec<Uuid>,
}

impl ItemHolder for Player {
    fn add_item(&mut self, item_id: Uuid) {
        if !self.inventory.contains(&item_id) {
            self.inventory.push(item_id);
        }
    }

    fn remove_item(&mut self, item_id: Uuid) {
        self.inventory.retain(|id| *id != item_id);
    }

    fn contains_item(&self, item_id: Uuid) -> bool {
        self.inventory.contains(&item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_keeps_receive_order_without_duplicates() {
        let mut player = Player::default();
        let (key, rope) = (Uuid::new_v4(), Uuid::new_v4());
        player.add_item(rope);
        player.add_item(key);
        player.add_item(rope);
        assert_eq!(player.inventory, vec![rope, key]);
        player.remove_item(rope);
        assert!(!player.contains_item(rope));
    }
}
