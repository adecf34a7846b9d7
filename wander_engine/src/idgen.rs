//! ** idgen module **
//! Namespaces and helpers for generating stable v5 uuids for loaded world objects.
//! The same authored symbol always yields the same id, so snapshots and logs stay comparable.
use uuid::Uuid;

pub const NAMESPACE_LOCATION: Uuid = uuid::uuid!("5b0f3c1e-8d2a-4f61-9c4e-2a7d61e0b4f3");

pub const NAMESPACE_WAY: Uuid = uuid::uuid!("c3e91a70-4b5d-4e28-a1f6-7d0c92b8e5a4");

pub const NAMESPACE_ITEM: Uuid = uuid::uuid!("1f7a6d22-93c4-4b0e-b8d5-6e2f40a9c371");

pub const NAMESPACE_INVENTORY_ITEM: Uuid = uuid::uuid!("8a4c2e90-17b3-4d6f-9e05-b3c8d1f26a7e");

pub const NAMESPACE_PERSON: Uuid = uuid::uuid!("e6d05b38-2f91-47ac-8b3e-0c5a79d4f182");

pub const NAMESPACE_CONVERSATION: Uuid = uuid::uuid!("49b2f7c6-a0e3-4c85-9d71-f8e6b2305ad9");

pub const NAMESPACE_LAYER: Uuid = uuid::uuid!("d7a83e15-6c4f-4a92-b0d8-31e5c6f9a274");

pub const NAMESPACE_OPTION: Uuid = uuid::uuid!("2c6e9f04-d8b1-4e73-a5c2-9b0f7e3d6158");

pub const NAMESPACE_ACTION: Uuid = uuid::uuid!("71f4b0a9-3e26-4d8c-b1a5-c4e92d7f0638");

/// Owned actions (an item's take action, a way's move action) live in their own
/// namespace so they can never collide with an authored action symbol.
pub const NAMESPACE_OWNED_ACTION: Uuid = uuid::uuid!("a05d3c87-e4f2-4b19-8c6a-5f13e9b72d40");

/// Generate a v5 UUID for a given token id from the world definition.
///
/// Uses the namespaces above to separate locations / items / persons etc.
pub fn uuid_from_token(namespace: &Uuid, token: &str) -> Uuid {
    Uuid::new_v5(namespace, token.as_bytes())
}

/// Symbol of an action owned by another world object, e.g. `lamp#take`.
pub fn owned_action_symbol(owner: &str, role: &str) -> String {
    format!("{owner}#{role}")
}

/// Stable id for an owned action.
pub fn owned_action_id(owner: &str, role: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_OWNED_ACTION, &owned_action_symbol(owner, role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_token_yields_same_id() {
        assert_eq!(
            uuid_from_token(&NAMESPACE_ITEM, "lamp"),
            uuid_from_token(&NAMESPACE_ITEM, "lamp")
        );
    }

    #[test]
    fn namespaces_separate_kinds() {
        assert_ne!(
            uuid_from_token(&NAMESPACE_ITEM, "lamp"),
            uuid_from_token(&NAMESPACE_INVENTORY_ITEM, "lamp")
        );
    }

    #[test]
    fn owned_actions_do_not_collide_with_authored_symbols() {
        let authored = uuid_from_token(&NAMESPACE_ACTION, "lamp#take");
        assert_ne!(authored, owned_action_id("lamp", "take"));
        assert_eq!(owned_action_symbol("lamp", "take"), "lamp#take");
    }
}
