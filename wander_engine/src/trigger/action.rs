//! Actions and their handlers.
//!
//! Every effect the engine can have on the world is an [`ActionKind`]
//! variant. [`execute_action`] is the single place they are applied; the
//! surrounding cascade (enabled checks, `Multi` expansion, store flushes)
//! lives in the parent module.

use anyhow::{Result, bail};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wander_data::Enabling;

pub use wander_data::{
    InteractionPatchDef as InteractionPatch, InventoryItemPatchDef as InventoryItemPatch,
    LocationPatchDef as LocationPatch, WayPatchDef as WayPatch,
};

use crate::item::ItemHolder;
use crate::session::GameSession;
use crate::trigger::set_action_enabled;
use crate::view::{View, ViewItem};
use crate::world::{ObjectRef, World};

/// One node of the action graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub enabled: bool,
    pub forbidden_text: Option<String>,
    /// The object this action belongs to (take / move actions); `None` for shared actions.
    pub owner: Option<ObjectRef>,
    pub kind: ActionKind,
}

/// Where a change action puts an item or person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relocation {
    To(Uuid),
    Remove,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub taking: Enabling,
    pub take_forbidden_text: Option<String>,
    pub take_successful_text: Option<String>,
    pub using: Enabling,
    pub use_forbidden_text: Option<String>,
    pub use_successful_text: Option<String>,
    pub inspection_text: Option<String>,
    pub relocation: Option<Relocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub talking: Enabling,
    pub talk_forbidden_text: Option<String>,
    pub conversation: Option<Uuid>,
    pub relocation: Option<Relocation>,
    pub inspection_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationPatch {
    pub greeting: Option<String>,
    pub farewell: Option<String>,
    pub start_layer: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPatch {
    pub enabling: Enabling,
    pub disable_after_chosen: Enabling,
    pub text: Option<String>,
    pub answer: Option<String>,
    pub target: Option<Uuid>,
}

/// The closed set of things an action can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    AddInventoryItems { items: Vec<Uuid> },
    RemoveInventoryItem { item: Uuid },
    RemoveItem { item: Uuid },
    Move { way: Uuid },
    Take { item: Uuid, remove_item: bool, add_inventory_items: Vec<Uuid> },
    Multi { actions: Vec<Uuid> },
    ChangeAction { action: Uuid, enabling: Enabling },
    ChangeItem { item: Uuid, patch: ItemPatch },
    ChangeInventoryItem { item: Uuid, patch: InventoryItemPatch },
    ChangePerson { person: Uuid, patch: PersonPatch },
    ChangeLocation { location: Uuid, patch: LocationPatch },
    ChangeWay { way: Uuid, patch: WayPatch },
    ChangeConversation { conversation: Uuid, patch: ConversationPatch },
    ChangeConversationOption { option: Uuid, patch: OptionPatch },
    ChangeInteraction { item: Uuid, partner: ObjectRef, patch: InteractionPatch },
    EndGame { text: Option<String> },
}

/// How an [`Enabling`] applies to a boolean flag.
pub trait EnablingExt {
    /// The value the flag should get, or `None` to leave it alone.
    fn target_value(self) -> Option<bool>;
    /// Apply to `flag` in place.
    fn apply_to(self, flag: &mut bool);
}

impl EnablingExt for Enabling {
    fn target_value(self) -> Option<bool> {
        match self {
            Enabling::DoNotChange => None,
            Enabling::Enable => Some(true),
            Enabling::Disable => Some(false),
        }
    }

    fn apply_to(self, flag: &mut bool) {
        if let Some(value) = self.target_value() {
            *flag = value;
        }
    }
}

fn overwrite(target: &mut Option<String>, value: Option<&String>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

fn overwrite_string(target: &mut String, value: Option<&String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

/// Applies a single action to the world.
///
/// A `Multi` has no effect of its own; its children are run by the trigger walk.
///
/// # Errors
/// - on ids that do not resolve in the world
pub fn execute_action(session: &mut GameSession, view: &mut View, action: &Action) -> Result<()> {
    let world = &mut session.world;
    match &action.kind {
        ActionKind::AddInventoryItems { items } => add_inventory_items(world, items)?,
        ActionKind::RemoveInventoryItem { item } => remove_inventory_item(world, *item)?,
        ActionKind::RemoveItem { item } => remove_item(world, *item)?,
        ActionKind::Move { way } => move_player(world, *way)?,
        ActionKind::Take {
            item,
            remove_item,
            add_inventory_items,
        } => take_item(world, *item, *remove_item, add_inventory_items)?,
        ActionKind::Multi { .. } => {},
        ActionKind::ChangeAction { action: target, enabling } => change_action(world, *target, *enabling)?,
        ActionKind::ChangeItem { item, patch } => change_item(world, *item, patch)?,
        ActionKind::ChangeInventoryItem { item, patch } => change_inventory_item(world, *item, patch)?,
        ActionKind::ChangePerson { person, patch } => change_person(world, *person, patch)?,
        ActionKind::ChangeLocation { location, patch } => change_location(world, *location, patch)?,
        ActionKind::ChangeWay { way, patch } => change_way(world, *way, patch)?,
        ActionKind::ChangeConversation { conversation, patch } => change_conversation(world, *conversation, patch)?,
        ActionKind::ChangeConversationOption { option, patch } => change_option(world, *option, patch)?,
        ActionKind::ChangeInteraction { item, partner, patch } => change_interaction(world, *item, *partner, patch)?,
        ActionKind::EndGame { text } => end_game(session, view, text.as_deref()),
    }
    Ok(())
}

/*
 *
 * ACTION HANDLERS
 *
 */

/// Put inventory items into the player's inventory (once each).
pub fn add_inventory_items(world: &mut World, items: &[Uuid]) -> Result<()> {
    for item_id in items {
        let symbol = world.inventory_item(*item_id)?.symbol.clone();
        if world.player.contains_item(*item_id) {
            info!("└─ action: AddInventoryItem({symbol}) skipped, already carried");
            continue;
        }
        world.player.add_item(*item_id);
        info!("└─ action: AddInventoryItem({symbol})");
    }
    Ok(())
}

pub fn remove_inventory_item(world: &mut World, item_id: Uuid) -> Result<()> {
    let symbol = world.inventory_item(item_id)?.symbol.clone();
    world.player.remove_item(item_id);
    info!("└─ action: RemoveInventoryItem({symbol})");
    Ok(())
}

/// Detach an item from its location. The item stays in the arena.
pub fn remove_item(world: &mut World, item_id: Uuid) -> Result<()> {
    let item = world.item_mut(item_id)?;
    let previous = item.location.take();
    let symbol = item.symbol.clone();
    if let Some(location_id) = previous {
        world.location_mut(location_id)?.remove_item(item_id);
    }
    info!("└─ action: RemoveItem({symbol})");
    Ok(())
}

/// Move the player along a way.
pub fn move_player(world: &mut World, way_id: Uuid) -> Result<()> {
    let way = world.way(way_id)?;
    let (symbol, from, to) = (way.symbol.clone(), way.from, way.to);
    let destination = world.location(to)?.symbol.clone();
    if world.player.location != from {
        warn!("way '{symbol}' used while the player is not at its start location");
    }
    world.player.location = to;
    info!("└─ action: Move({symbol}) -> {destination}");
    Ok(())
}

pub fn take_item(world: &mut World, item_id: Uuid, remove: bool, add_items: &[Uuid]) -> Result<()> {
    let symbol = world.item(item_id)?.symbol.clone();
    info!("└─ action: Take({symbol}, remove_item: {remove})");
    if remove {
        remove_item(world, item_id)?;
    }
    add_inventory_items(world, add_items)
}

pub fn change_action(world: &mut World, target: Uuid, enabling: Enabling) -> Result<()> {
    let symbol = world.action(target)?.symbol.clone();
    info!("└─ action: ChangeAction({symbol}, {enabling:?})");
    if let Some(value) = enabling.target_value() {
        set_action_enabled(world, target, value)?;
    }
    Ok(())
}

/// Modifies multiple properties of an `Item` at once by applying an `ItemPatch`.
pub fn change_item(world: &mut World, item_id: Uuid, patch: &ItemPatch) -> Result<()> {
    let item = world.item_mut(item_id)?;
    info!("└─ action: ChangeItem({}) using patch: {patch:?}", item.symbol);
    overwrite_string(&mut item.name, patch.name.as_ref());
    overwrite_string(&mut item.description, patch.description.as_ref());
    overwrite(&mut item.take_successful_text, patch.take_successful_text.as_ref());
    patch.using.apply_to(&mut item.usage.enabled);
    overwrite(&mut item.usage.forbidden_text, patch.use_forbidden_text.as_ref());
    overwrite(&mut item.usage.successful_text, patch.use_successful_text.as_ref());
    overwrite(&mut item.inspection.text, patch.inspection_text.as_ref());
    let take_action = item.take_action;

    if let Some(value) = patch.taking.target_value() {
        set_action_enabled(world, take_action, value)?;
    }
    overwrite(
        &mut world.action_mut(take_action)?.forbidden_text,
        patch.take_forbidden_text.as_ref(),
    );
    if let Some(relocation) = patch.relocation {
        relocate_item(world, item_id, relocation)?;
    }
    Ok(())
}

fn relocate_item(world: &mut World, item_id: Uuid, relocation: Relocation) -> Result<()> {
    if let Relocation::To(location_id) = relocation {
        world.location(location_id)?;
    }
    let item = world.item_mut(item_id)?;
    let previous = item.location.take();
    if let Relocation::To(location_id) = relocation {
        item.location = Some(location_id);
    }
    if let Some(old) = previous {
        world.location_mut(old)?.remove_item(item_id);
    }
    if let Relocation::To(location_id) = relocation {
        world.location_mut(location_id)?.add_item(item_id);
    }
    Ok(())
}

pub fn change_inventory_item(world: &mut World, item_id: Uuid, patch: &InventoryItemPatch) -> Result<()> {
    let item = world.inventory_item_mut(item_id)?;
    info!("└─ action: ChangeInventoryItem({}) using patch: {patch:?}", item.symbol);
    overwrite_string(&mut item.name, patch.name.as_ref());
    overwrite_string(&mut item.description, patch.description.as_ref());
    patch.using.apply_to(&mut item.usage.enabled);
    overwrite(&mut item.usage.forbidden_text, patch.use_forbidden_text.as_ref());
    overwrite(&mut item.usage.successful_text, patch.use_successful_text.as_ref());
    overwrite(&mut item.inspection.text, patch.inspection_text.as_ref());
    Ok(())
}

pub fn change_person(world: &mut World, person_id: Uuid, patch: &PersonPatch) -> Result<()> {
    if let Some(conversation) = patch.conversation {
        world.conversation(conversation)?;
    }
    let person = world.person_mut(person_id)?;
    info!("└─ action: ChangePerson({}) using patch: {patch:?}", person.symbol);
    overwrite_string(&mut person.name, patch.name.as_ref());
    overwrite_string(&mut person.description, patch.description.as_ref());
    patch.talking.apply_to(&mut person.talk.enabled);
    overwrite(&mut person.talk.forbidden_text, patch.talk_forbidden_text.as_ref());
    overwrite(&mut person.inspection.text, patch.inspection_text.as_ref());
    if let Some(conversation) = patch.conversation {
        person.talk.conversation = Some(conversation);
    }

    if let Some(relocation) = patch.relocation {
        if let Relocation::To(location_id) = relocation {
            world.location(location_id)?;
        }
        let person = world.person_mut(person_id)?;
        let previous = person.location.take();
        if let Relocation::To(location_id) = relocation {
            person.location = Some(location_id);
        }
        if let Some(old) = previous {
            world.location_mut(old)?.remove_person(person_id);
        }
        if let Relocation::To(location_id) = relocation {
            world.location_mut(location_id)?.add_person(person_id);
        }
    }
    Ok(())
}

pub fn change_location(world: &mut World, location_id: Uuid, patch: &LocationPatch) -> Result<()> {
    let location = world.location_mut(location_id)?;
    info!("└─ action: ChangeLocation({}) using patch: {patch:?}", location.symbol);
    overwrite_string(&mut location.name, patch.name.as_ref());
    overwrite_string(&mut location.description, patch.description.as_ref());
    Ok(())
}

pub fn change_way(world: &mut World, way_id: Uuid, patch: &WayPatch) -> Result<()> {
    let way = world.way_mut(way_id)?;
    info!("└─ action: ChangeWay({}) using patch: {patch:?}", way.symbol);
    overwrite_string(&mut way.name, patch.name.as_ref());
    overwrite_string(&mut way.description, patch.description.as_ref());
    overwrite(&mut way.move_successful_text, patch.move_successful_text.as_ref());
    overwrite(&mut way.inspection.text, patch.inspection_text.as_ref());
    let move_action = way.move_action;

    if let Some(value) = patch.moving.target_value() {
        set_action_enabled(world, move_action, value)?;
    }
    overwrite(
        &mut world.action_mut(move_action)?.forbidden_text,
        patch.move_forbidden_text.as_ref(),
    );
    Ok(())
}

pub fn change_conversation(world: &mut World, conversation_id: Uuid, patch: &ConversationPatch) -> Result<()> {
    let conversation = world.conversation_mut(conversation_id)?;
    info!("└─ action: ChangeConversation({}) using patch: {patch:?}", conversation.symbol);
    overwrite(&mut conversation.greeting, patch.greeting.as_ref());
    overwrite(&mut conversation.farewell, patch.farewell.as_ref());
    if let Some(layer) = patch.start_layer {
        if !conversation.layers.contains(&layer) {
            bail!(
                "layer {layer} does not belong to conversation '{}'",
                conversation.symbol
            );
        }
        conversation.start_layer = Some(layer);
    }
    Ok(())
}

pub fn change_option(world: &mut World, option_id: Uuid, patch: &OptionPatch) -> Result<()> {
    if let Some(target) = patch.target {
        let option = world.option(option_id)?;
        let layer = world.layer(target)?;
        if layer.conversation != option.conversation {
            bail!(
                "layer '{}' does not belong to the conversation of option '{}'",
                layer.symbol,
                option.symbol
            );
        }
    }
    let option = world.option_mut(option_id)?;
    info!("└─ action: ChangeConversationOption({}) using patch: {patch:?}", option.symbol);
    patch.enabling.apply_to(&mut option.enabled);
    patch.disable_after_chosen.apply_to(&mut option.disable_after_chosen);
    overwrite_string(&mut option.text, patch.text.as_ref());
    overwrite_string(&mut option.answer, patch.answer.as_ref());
    if let Some(target) = patch.target {
        option.target = Some(target);
    }
    Ok(())
}

pub fn change_interaction(world: &mut World, item_id: Uuid, partner: ObjectRef, patch: &InteractionPatch) -> Result<()> {
    let partner_symbol = symbol_or_unknown(world, partner);
    let item = world.inventory_item_mut(item_id)?;
    let symbol = item.symbol.clone();
    let Some(interaction) = item.interaction_with_mut(partner) else {
        bail!("inventory item '{symbol}' has no interaction with '{partner_symbol}'");
    };
    info!("└─ action: ChangeInteraction({symbol}, {partner_symbol}) using patch: {patch:?}");
    patch.enabling.apply_to(&mut interaction.enabled);
    overwrite(&mut interaction.forbidden_text, patch.forbidden_text.as_ref());
    overwrite(&mut interaction.successful_text, patch.successful_text.as_ref());
    Ok(())
}

/// Mark the session as ended and show the closing text.
pub fn end_game(session: &mut GameSession, view: &mut View, text: Option<&str>) {
    let game = &session.world.game;
    let closing = text
        .map(str::to_string)
        .or_else(|| game.end_text.clone())
        .unwrap_or_else(|| game.texts.game_over.clone());
    info!("└─ action: EndGame(\"{closing}\")");
    view.push(ViewItem::GameEnded(closing));
    session.end_game();
}

/// Symbol of an object for log lines, or its id if it does not resolve.
fn symbol_or_unknown(world: &World, object: ObjectRef) -> String {
    world
        .object(object)
        .map_or_else(|_| object.id().to_string(), |o| o.symbol().to_string())
}
