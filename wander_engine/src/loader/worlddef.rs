//! WorldDef loader and conversion helpers.
//!
//! Converts the serialized `WorldDef` data model into runtime engine structs.
//! References are turned into v5 uuids derived from their symbols, so the
//! conversion needs no lookup tables; existence is checked beforehand by
//! `wander_data::validate_world`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use uuid::Uuid;

use wander_data::{
    ActionDef, ActionKindDef, ConversationDef, ConversationPatchDef, InspectDef, InteractionDef, InventoryItemDef,
    ItemDef, ItemPatchDef, LayerDef, LocationDef, OptionDef, OptionPatchDef, PartnerDef, PersonDef, PersonPatchDef,
    RelocationDef, UsageDef, WayDef, WorldDef,
};

use crate::command::DISPATCH_ORDER;
use crate::conversation::{Conversation, ConversationLayer, ConversationOption};
use crate::game::Game;
use crate::idgen::{
    NAMESPACE_ACTION, NAMESPACE_CONVERSATION, NAMESPACE_INVENTORY_ITEM, NAMESPACE_ITEM, NAMESPACE_LAYER,
    NAMESPACE_LOCATION, NAMESPACE_OPTION, NAMESPACE_PERSON, NAMESPACE_WAY, owned_action_id, owned_action_symbol,
    uuid_from_token,
};
use crate::item::{Inspection, Interaction, InventoryItem, Item, ItemHolder, Usage};
use crate::location::Location;
use crate::parser::normalize_template;
use crate::person::{Person, Talk};
use crate::player::Player;
use crate::trigger::{
    Action, ActionKind, ConversationPatch, ItemPatch, OptionPatch, PersonPatch, Relocation,
};
use crate::way::Way;
use crate::world::{ObjectRef, World};

/// Load a `WorldDef` from a RON file.
///
/// # Errors
/// - if the file cannot be read or is not valid RON for a `WorldDef`
pub fn load_worlddef(path: &Path) -> Result<WorldDef> {
    let text = fs::read_to_string(path).with_context(|| format!("reading worlddef from '{}'", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing worlddef RON from '{}'", path.display()))
}

fn location_id(symbol: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_LOCATION, symbol)
}

fn way_id(symbol: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_WAY, symbol)
}

fn item_id(symbol: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_ITEM, symbol)
}

fn inventory_item_id(symbol: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_INVENTORY_ITEM, symbol)
}

fn person_id(symbol: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_PERSON, symbol)
}

fn conversation_id(symbol: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_CONVERSATION, symbol)
}

fn layer_id(symbol: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_LAYER, symbol)
}

fn option_id(symbol: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_OPTION, symbol)
}

fn action_id(symbol: &str) -> Uuid {
    uuid_from_token(&NAMESPACE_ACTION, symbol)
}

fn action_ids(symbols: &[String]) -> Vec<Uuid> {
    symbols.iter().map(|s| action_id(s)).collect()
}

fn templates(raw: &[String]) -> Vec<String> {
    raw.iter().map(|t| normalize_template(t)).collect()
}

/// Convert a `WorldDef` into a populated `World`.
///
/// # Errors
/// Conversion itself cannot fail on a validated definition; the `Result` keeps
/// the loader's error path uniform.
pub fn build_world_from_def(def: &WorldDef) -> Result<World> {
    let mut world = World::new_empty();
    world.game = game_from_def(def);

    for location_def in &def.locations {
        let location = location_from_def(location_def);
        world.locations.insert(location.id, location);
    }

    for action_def in &def.actions {
        let action = action_from_def(action_def);
        world.actions.insert(action.id, action);
    }

    for way_def in &def.ways {
        let (way, move_action) = way_from_def(way_def);
        if let Some(from) = world.locations.get_mut(&way.from) {
            from.ways_out.push(way.id);
        }
        world.actions.insert(move_action.id, move_action);
        world.ways.insert(way.id, way);
    }

    for item_def in &def.items {
        let (item, take_action) = item_from_def(item_def);
        if let Some(location) = item.location.and_then(|id| world.locations.get_mut(&id)) {
            location.add_item(item.id);
        }
        world.actions.insert(take_action.id, take_action);
        world.items.insert(item.id, item);
    }

    for inventory_def in &def.inventory_items {
        let item = inventory_item_from_def(inventory_def);
        world.inventory_items.insert(item.id, item);
    }

    for person_def in &def.persons {
        let person = person_from_def(person_def);
        if let Some(location) = person.location.and_then(|id| world.locations.get_mut(&id)) {
            location.add_person(person.id);
        }
        world.persons.insert(person.id, person);
    }

    for conversation_def in &def.conversations {
        add_conversation(&mut world, conversation_def);
    }

    world.player = Player {
        name: def.player.name.clone(),
        location: location_id(&def.player.start_location),
        inventory: Vec::new(),
    };
    for symbol in &def.player.inventory {
        world.player.add_item(inventory_item_id(symbol));
    }

    Ok(world)
}

fn game_from_def(def: &WorldDef) -> Game {
    let mut commands = def.game.commands.clone();
    for kind in DISPATCH_ORDER {
        let list = kind.builtin_templates_mut(&mut commands);
        *list = templates(list);
    }
    Game {
        title: def.game.title.clone(),
        author: def.game.author.clone(),
        start_text: def.game.start_text.clone(),
        end_text: def.game.end_text.clone(),
        commands,
        texts: def.game.texts.clone(),
        colors: def.game.colors,
    }
}

fn location_from_def(def: &LocationDef) -> Location {
    Location {
        id: location_id(&def.id),
        symbol: def.id.clone(),
        name: def.name.clone(),
        description: def.description.clone(),
        items: Vec::new(),
        persons: Vec::new(),
        ways_out: Vec::new(),
    }
}

fn inspection_from_def(def: &InspectDef) -> Inspection {
    Inspection {
        text: def.text.clone(),
        custom_commands: templates(&def.custom_commands),
        actions: action_ids(&def.actions),
    }
}

fn usage_from_def(def: &UsageDef) -> Usage {
    Usage {
        enabled: def.enabled,
        forbidden_text: def.forbidden_text.clone(),
        successful_text: def.successful_text.clone(),
        custom_commands: templates(&def.custom_commands),
        actions: action_ids(&def.actions),
    }
}

fn way_from_def(def: &WayDef) -> (Way, Action) {
    let id = way_id(&def.id);
    let move_action = Action {
        id: owned_action_id(&def.id, "move"),
        symbol: owned_action_symbol(&def.id, "move"),
        name: format!("move through {}", def.name),
        enabled: def.moving.enabled,
        forbidden_text: def.moving.forbidden_text.clone(),
        owner: Some(ObjectRef::Way(id)),
        kind: ActionKind::Move { way: id },
    };
    let way = Way {
        id,
        symbol: def.id.clone(),
        name: def.name.clone(),
        description: def.description.clone(),
        from: location_id(&def.from),
        to: location_id(&def.to),
        identifiers: def.identifiers.clone(),
        move_action: move_action.id,
        move_successful_text: def.moving.successful_text.clone(),
        custom_move_commands: templates(&def.moving.custom_commands),
        move_actions: action_ids(&def.moving.actions),
        inspection: inspection_from_def(&def.inspect),
    };
    (way, move_action)
}

fn item_from_def(def: &ItemDef) -> (Item, Action) {
    let id = item_id(&def.id);
    let take_action = Action {
        id: owned_action_id(&def.id, "take"),
        symbol: owned_action_symbol(&def.id, "take"),
        name: format!("take {}", def.name),
        enabled: def.take.enabled,
        forbidden_text: def.take.forbidden_text.clone(),
        owner: Some(ObjectRef::Item(id)),
        kind: ActionKind::Take {
            item: id,
            remove_item: def.take.remove_item,
            add_inventory_items: def.take.add_inventory_items.iter().map(|s| inventory_item_id(s)).collect(),
        },
    };
    let item = Item {
        id,
        symbol: def.id.clone(),
        name: def.name.clone(),
        description: def.description.clone(),
        location: def.location.as_deref().map(location_id),
        identifiers: def.identifiers.clone(),
        take_action: take_action.id,
        take_successful_text: def.take.successful_text.clone(),
        custom_take_commands: templates(&def.take.custom_commands),
        take_actions: action_ids(&def.take.actions),
        usage: usage_from_def(&def.usage),
        inspection: inspection_from_def(&def.inspect),
    };
    (item, take_action)
}

fn partner_from_def(def: &PartnerDef) -> ObjectRef {
    match def {
        PartnerDef::InventoryItem(symbol) => ObjectRef::InventoryItem(inventory_item_id(symbol)),
        PartnerDef::Item(symbol) => ObjectRef::Item(item_id(symbol)),
        PartnerDef::Person(symbol) => ObjectRef::Person(person_id(symbol)),
    }
}

fn interaction_from_def(def: &InteractionDef) -> Interaction {
    Interaction {
        partner: partner_from_def(&def.partner),
        enabled: def.enabled,
        forbidden_text: def.forbidden_text.clone(),
        successful_text: def.successful_text.clone(),
        custom_commands: templates(&def.custom_commands),
        actions: action_ids(&def.actions),
    }
}

fn inventory_item_from_def(def: &InventoryItemDef) -> InventoryItem {
    InventoryItem {
        id: inventory_item_id(&def.id),
        symbol: def.id.clone(),
        name: def.name.clone(),
        description: def.description.clone(),
        identifiers: def.identifiers.clone(),
        usage: usage_from_def(&def.usage),
        inspection: inspection_from_def(&def.inspect),
        interactions: def.interactions.iter().map(interaction_from_def).collect(),
    }
}

fn person_from_def(def: &PersonDef) -> Person {
    Person {
        id: person_id(&def.id),
        symbol: def.id.clone(),
        name: def.name.clone(),
        description: def.description.clone(),
        location: def.location.as_deref().map(location_id),
        identifiers: def.identifiers.clone(),
        talk: Talk {
            enabled: def.talk.enabled,
            forbidden_text: def.talk.forbidden_text.clone(),
            conversation: def.talk.conversation.as_deref().map(conversation_id),
            custom_commands: templates(&def.talk.custom_commands),
            actions: action_ids(&def.talk.actions),
        },
        inspection: inspection_from_def(&def.inspect),
    }
}

fn add_conversation(world: &mut World, def: &ConversationDef) {
    let id = conversation_id(&def.id);
    for layer_def in &def.layers {
        add_layer(world, id, layer_def);
    }
    let conversation = Conversation {
        id,
        symbol: def.id.clone(),
        greeting: def.greeting.clone(),
        farewell: def.farewell.clone(),
        start_layer: def.start_layer.as_deref().map(layer_id),
        layers: def.layers.iter().map(|l| layer_id(&l.id)).collect(),
    };
    world.conversations.insert(id, conversation);
}

fn add_layer(world: &mut World, conversation: Uuid, def: &LayerDef) {
    let id = layer_id(&def.id);
    for option_def in &def.options {
        let option = option_from_def(option_def, conversation, id);
        world.options.insert(option.id, option);
    }
    let layer = ConversationLayer {
        id,
        symbol: def.id.clone(),
        conversation,
        options: def.options.iter().map(|o| option_id(&o.id)).collect(),
    };
    world.layers.insert(id, layer);
}

fn option_from_def(def: &OptionDef, conversation: Uuid, layer: Uuid) -> ConversationOption {
    ConversationOption {
        id: option_id(&def.id),
        symbol: def.id.clone(),
        conversation,
        layer,
        text: def.text.clone(),
        answer: def.answer.clone(),
        enabled: def.enabled,
        disable_after_chosen: def.disable_after_chosen,
        target: def.target.as_deref().map(layer_id),
        actions: action_ids(&def.actions),
    }
}

fn action_from_def(def: &ActionDef) -> Action {
    Action {
        id: action_id(&def.id),
        symbol: def.id.clone(),
        name: if def.name.is_empty() { def.id.clone() } else { def.name.clone() },
        enabled: def.enabled,
        forbidden_text: def.forbidden_text.clone(),
        owner: None,
        kind: action_kind_from_def(&def.kind),
    }
}

fn action_kind_from_def(def: &ActionKindDef) -> ActionKind {
    match def {
        ActionKindDef::AddInventoryItems { items } => ActionKind::AddInventoryItems {
            items: items.iter().map(|s| inventory_item_id(s)).collect(),
        },
        ActionKindDef::RemoveInventoryItem { item } => ActionKind::RemoveInventoryItem {
            item: inventory_item_id(item),
        },
        ActionKindDef::RemoveItem { item } => ActionKind::RemoveItem { item: item_id(item) },
        ActionKindDef::Move { way } => ActionKind::Move { way: way_id(way) },
        ActionKindDef::Take {
            item,
            remove_item,
            add_inventory_items,
        } => ActionKind::Take {
            item: item_id(item),
            remove_item: *remove_item,
            add_inventory_items: add_inventory_items.iter().map(|s| inventory_item_id(s)).collect(),
        },
        ActionKindDef::Multi { actions } => ActionKind::Multi {
            actions: action_ids(actions),
        },
        ActionKindDef::ChangeAction { action, enabling } => ActionKind::ChangeAction {
            action: action_id(action),
            enabling: *enabling,
        },
        ActionKindDef::ChangeItem { item, patch } => ActionKind::ChangeItem {
            item: item_id(item),
            patch: item_patch_from_def(patch),
        },
        ActionKindDef::ChangeInventoryItem { item, patch } => ActionKind::ChangeInventoryItem {
            item: inventory_item_id(item),
            patch: patch.clone(),
        },
        ActionKindDef::ChangePerson { person, patch } => ActionKind::ChangePerson {
            person: person_id(person),
            patch: person_patch_from_def(patch),
        },
        ActionKindDef::ChangeLocation { location, patch } => ActionKind::ChangeLocation {
            location: location_id(location),
            patch: patch.clone(),
        },
        ActionKindDef::ChangeWay { way, patch } => ActionKind::ChangeWay {
            way: way_id(way),
            patch: patch.clone(),
        },
        ActionKindDef::ChangeConversation { conversation, patch } => ActionKind::ChangeConversation {
            conversation: conversation_id(conversation),
            patch: conversation_patch_from_def(patch),
        },
        ActionKindDef::ChangeConversationOption { option, patch } => ActionKind::ChangeConversationOption {
            option: option_id(option),
            patch: option_patch_from_def(patch),
        },
        ActionKindDef::ChangeInteraction { item, partner, patch } => ActionKind::ChangeInteraction {
            item: inventory_item_id(item),
            partner: partner_from_def(partner),
            patch: patch.clone(),
        },
        ActionKindDef::EndGame { text } => ActionKind::EndGame { text: text.clone() },
    }
}

fn relocation_from_def(def: &RelocationDef) -> Relocation {
    match def {
        RelocationDef::To(symbol) => Relocation::To(location_id(symbol)),
        RelocationDef::Remove => Relocation::Remove,
    }
}

fn item_patch_from_def(def: &ItemPatchDef) -> ItemPatch {
    ItemPatch {
        name: def.name.clone(),
        description: def.description.clone(),
        taking: def.taking,
        take_forbidden_text: def.take_forbidden_text.clone(),
        take_successful_text: def.take_successful_text.clone(),
        using: def.using,
        use_forbidden_text: def.use_forbidden_text.clone(),
        use_successful_text: def.use_successful_text.clone(),
        inspection_text: def.inspection_text.clone(),
        relocation: def.relocation.as_ref().map(relocation_from_def),
    }
}

fn person_patch_from_def(def: &PersonPatchDef) -> PersonPatch {
    PersonPatch {
        name: def.name.clone(),
        description: def.description.clone(),
        talking: def.talking,
        talk_forbidden_text: def.talk_forbidden_text.clone(),
        conversation: def.conversation.as_deref().map(conversation_id),
        relocation: def.relocation.as_ref().map(relocation_from_def),
        inspection_text: def.inspection_text.clone(),
    }
}

fn conversation_patch_from_def(def: &ConversationPatchDef) -> ConversationPatch {
    ConversationPatch {
        greeting: def.greeting.clone(),
        farewell: def.farewell.clone(),
        start_layer: def.start_layer.as_deref().map(layer_id),
    }
}

fn option_patch_from_def(def: &OptionPatchDef) -> OptionPatch {
    OptionPatch {
        enabling: def.enabling,
        disable_after_chosen: def.disable_after_chosen,
        text: def.text.clone(),
        answer: def.answer.clone(),
        target: def.target.as_deref().map(layer_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::cellar_def;

    #[test]
    fn owned_actions_are_created_for_items_and_ways() {
        let world = build_world_from_def(&cellar_def()).unwrap();
        let lamp = world.item(item_id("lamp")).unwrap();
        let take = world.action(lamp.take_action).unwrap();
        assert_eq!(take.symbol, "lamp#take");
        assert_eq!(take.owner, Some(ObjectRef::Item(lamp.id)));
        assert!(take.enabled);

        let trapdoor = world.way(way_id("trapdoor")).unwrap();
        let mv = world.action(trapdoor.move_action).unwrap();
        assert!(!mv.enabled);
        assert_eq!(mv.forbidden_text.as_deref(), Some("The trapdoor is shut tight."));
    }

    #[test]
    fn membership_follows_authored_order() {
        let world = build_world_from_def(&cellar_def()).unwrap();
        let hall = world.location(location_id("hall")).unwrap();
        assert_eq!(hall.items.first(), Some(&item_id("lamp")));
        assert!(hall.ways_out.contains(&way_id("trapdoor")));
        assert!(hall.persons.contains(&person_id("guard")));
        assert_eq!(world.player.location, hall.id);
        assert_eq!(
            world.player.inventory,
            vec![inventory_item_id("key"), inventory_item_id("crowbar")]
        );
    }

    #[test]
    fn templates_are_lowercased_at_load() {
        let mut def = cellar_def();
        def.game.commands.take = vec!["Grab [The ]<a>".to_string()];
        def.items[0].take.custom_commands = vec!["SNATCH <A>".to_string()];
        let world = build_world_from_def(&def).unwrap();
        assert_eq!(world.game.commands.take, vec!["grab [the ]<A>".to_string()]);
        assert_eq!(
            world.item(item_id(&def.items[0].id)).unwrap().custom_take_commands,
            vec!["snatch <A>".to_string()]
        );
    }

    #[test]
    fn conversation_layers_and_options_are_linked() {
        let world = build_world_from_def(&cellar_def()).unwrap();
        let talk = world.conversation(conversation_id("guard_talk")).unwrap();
        let root = world.layer(talk.start_layer.unwrap()).unwrap();
        assert_eq!(root.conversation, talk.id);
        let first = world.option(root.options[0]).unwrap();
        assert_eq!(first.layer, root.id);
        assert_eq!(first.target, Some(root.id));
    }
}
