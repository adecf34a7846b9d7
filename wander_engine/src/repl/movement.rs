//! `repl::movement` module
//!
//! Moving the player through ways out of the current location.

use anyhow::Result;
use log::info;

use crate::command::ParsedCommand;
use crate::entity_search::{SearchScope, find_in_scopes};
use crate::message::{Subject, fill_placeholders};
use crate::parser::object_accepts;
use crate::repl::{capability_mismatch, describe_location, entity_not_found, own_or_default, push_outcome};
use crate::session::GameSession;
use crate::trigger::{trigger_action, trigger_actions};
use crate::view::View;

/// Go through a way leading out of the current location.
///
/// The way's move action runs on every attempt; when it actually changed the
/// player's location the new location is described before the way's
/// additional actions run.
///
/// # Errors
/// - on unresolved ids or failing actions
pub fn move_handler(session: &mut GameSession, view: &mut View, command: &ParsedCommand) -> Result<()> {
    let token = command.first();
    let Some(object) = find_in_scopes(&session.world, &[SearchScope::WaysOut], token)? else {
        entity_not_found(view, &session.world.game.texts.no_such_way, token);
        return Ok(());
    };
    let way = session.world.way(object.id())?.clone();
    let subject = Subject::new(token, &way.name);
    if !object_accepts(command, &way.custom_move_commands)? {
        capability_mismatch(session, view, subject);
        return Ok(());
    }

    let texts = &session.world.game.texts;
    let move_action = session.world.action(way.move_action)?;
    let allowed = move_action.enabled;
    let text = if allowed {
        own_or_default(way.move_successful_text.as_ref(), &texts.moved)
    } else {
        own_or_default(move_action.forbidden_text.as_ref(), &texts.not_travelable)
    };
    info!(
        "player tries to go through '{}' ({})",
        way.symbol,
        if allowed { "allowed" } else { "forbidden" }
    );
    push_outcome(view, allowed, fill_placeholders(&text, Some(subject), None));

    let before = session.world.player.location;
    trigger_action(session, view, way.move_action)?;
    if session.world.player.location != before {
        describe_location(session, view)?;
    }
    trigger_actions(session, view, &way.move_actions)
}
