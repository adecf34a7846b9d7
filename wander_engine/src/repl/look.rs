//! `repl::look` module
//!
//! Handlers for looking around and inspecting things.

use anyhow::Result;
use log::info;

use crate::command::ParsedCommand;
use crate::entity_search::{SearchScope, find_in_scopes};
use crate::message::{Subject, fill_placeholders};
use crate::parser::object_accepts;
use crate::repl::{capability_mismatch, entity_not_found, own_or_default};
use crate::session::GameSession;
use crate::trigger::trigger_actions;
use crate::view::{View, ViewItem};

/// Describe the player's location: name, description and what is in it.
///
/// # Errors
/// - on ids in the location that do not resolve
pub fn describe_location(session: &GameSession, view: &mut View) -> Result<()> {
    let world = &session.world;
    let texts = &world.game.texts;
    let location = world.player_location()?;
    view.push(ViewItem::LocationDescription {
        name: location.name.clone(),
        description: location.description.clone(),
    });

    let mut items = Vec::new();
    for id in &location.items {
        items.push(world.item(*id)?.name.clone());
    }
    let mut persons = Vec::new();
    for id in &location.persons {
        persons.push(world.person(*id)?.name.clone());
    }
    let mut ways = Vec::new();
    for id in &location.ways_out {
        ways.push(world.way(*id)?.name.clone());
    }

    for (header, entries) in [
        (&texts.items_here, items),
        (&texts.persons_here, persons),
        (&texts.ways_out, ways),
    ] {
        if !entries.is_empty() {
            view.push(ViewItem::Listing {
                header: header.clone(),
                entries,
            });
        }
    }
    Ok(())
}

/// Look around the current location.
///
/// # Errors
/// See [`describe_location`].
pub fn look_around_handler(session: &GameSession, view: &mut View) -> Result<()> {
    info!("player looks around '{}'", session.world.player_location()?.symbol);
    describe_location(session, view)
}

/// Inspect an item, inventory item, person or way.
///
/// # Errors
/// - on unresolved ids or failing inspection actions
pub fn inspect_handler(session: &mut GameSession, view: &mut View, command: &ParsedCommand) -> Result<()> {
    let token = command.first();
    let scopes = [
        SearchScope::LocationItems,
        SearchScope::Inventory,
        SearchScope::LocationPersons,
        SearchScope::WaysOut,
    ];
    let Some(object) = find_in_scopes(&session.world, &scopes, token)? else {
        entity_not_found(view, &session.world.game.texts.no_such_inspectable, token);
        return Ok(());
    };

    let world = &session.world;
    let target = world.object(object)?;
    let name = target.name().to_string();
    let description = target.description().to_string();
    let inspection = world.inspection(object)?.cloned().unwrap_or_default();
    let subject = Subject::new(token, &name);
    if !object_accepts(command, &inspection.custom_commands)? {
        capability_mismatch(session, view, subject);
        return Ok(());
    }

    info!("player inspects '{}'", target.symbol());
    if !description.is_empty() {
        view.push(ViewItem::ObjectDescription {
            name: name.clone(),
            text: description,
        });
    }
    let text = own_or_default(inspection.text.as_ref(), &world.game.texts.inspection);
    view.push(ViewItem::ObjectDescription {
        name: name.clone(),
        text: fill_placeholders(&text, Some(subject), None),
    });
    trigger_actions(session, view, &inspection.actions)
}
