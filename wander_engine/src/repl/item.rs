//! `repl::item` module
//!
//! Handlers for taking and using things in the world.

use anyhow::Result;
use log::info;

use crate::command::ParsedCommand;
use crate::entity_search::{SearchScope, find_in_scopes};
use crate::item::Usage;
use crate::message::{Subject, fill_placeholders};
use crate::parser::object_accepts;
use crate::repl::{capability_mismatch, entity_not_found, own_or_default, push_outcome};
use crate::session::GameSession;
use crate::trigger::{trigger_action, trigger_actions};
use crate::view::View;
use crate::world::ObjectRef;

/// Take an item lying in the current location.
///
/// The item's own take action runs on every attempt and only mutates the
/// world when enabled; the additional take actions run regardless.
///
/// # Errors
/// - on unresolved ids or failing actions
pub fn take_handler(session: &mut GameSession, view: &mut View, command: &ParsedCommand) -> Result<()> {
    let token = command.first();
    let Some(object) = find_in_scopes(&session.world, &[SearchScope::LocationItems], token)? else {
        entity_not_found(view, &session.world.game.texts.no_such_item, token);
        return Ok(());
    };
    let item = session.world.item(object.id())?.clone();
    let subject = Subject::new(token, &item.name);
    if !object_accepts(command, &item.custom_take_commands)? {
        capability_mismatch(session, view, subject);
        return Ok(());
    }

    let texts = &session.world.game.texts;
    let take = session.world.action(item.take_action)?;
    let allowed = take.enabled;
    let text = if allowed {
        own_or_default(item.take_successful_text.as_ref(), &texts.taken)
    } else {
        own_or_default(take.forbidden_text.as_ref(), &texts.not_takeable)
    };
    info!(
        "player tries to take '{}' ({})",
        item.symbol,
        if allowed { "allowed" } else { "forbidden" }
    );
    push_outcome(view, allowed, fill_placeholders(&text, Some(subject), None));

    trigger_action(session, view, item.take_action)?;
    trigger_actions(session, view, &item.take_actions)
}

/// Use an item in the location or an inventory item on its own.
///
/// # Errors
/// - on unresolved ids or failing actions
pub fn use_handler(session: &mut GameSession, view: &mut View, command: &ParsedCommand) -> Result<()> {
    let token = command.first();
    let scopes = [SearchScope::LocationItems, SearchScope::Inventory];
    let Some(object) = find_in_scopes(&session.world, &scopes, token)? else {
        entity_not_found(view, &session.world.game.texts.no_such_usable, token);
        return Ok(());
    };

    let world = &session.world;
    let (symbol, name, usage): (String, String, Usage) = match object {
        ObjectRef::Item(id) => {
            let item = world.item(id)?;
            (item.symbol.clone(), item.name.clone(), item.usage.clone())
        },
        ObjectRef::InventoryItem(id) => {
            let item = world.inventory_item(id)?;
            (item.symbol.clone(), item.name.clone(), item.usage.clone())
        },
        other => {
            let target = world.object(other)?;
            (target.symbol().to_string(), target.name().to_string(), Usage::default())
        },
    };
    let subject = Subject::new(token, &name);
    if !object_accepts(command, &usage.custom_commands)? {
        capability_mismatch(session, view, subject);
        return Ok(());
    }

    let texts = &world.game.texts;
    let text = if usage.enabled {
        own_or_default(usage.successful_text.as_ref(), &texts.used)
    } else {
        own_or_default(usage.forbidden_text.as_ref(), &texts.not_usable)
    };
    info!(
        "player tries to use '{symbol}' ({})",
        if usage.enabled { "allowed" } else { "forbidden" }
    );
    push_outcome(view, usage.enabled, fill_placeholders(&text, Some(subject), None));
    trigger_actions(session, view, &usage.actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::{NAMESPACE_INVENTORY_ITEM, NAMESPACE_ITEM, NAMESPACE_WAY};
    use crate::item::ItemHolder;
    use crate::parser::parse_input;
    use crate::testutil::{cellar_session, id};

    fn run(session: &mut GameSession, line: &str) -> View {
        let mut view = View::new();
        let cmd = parse_input(session, line).unwrap().unwrap();
        match cmd.kind {
            crate::command::CommandKind::Take => take_handler(session, &mut view, &cmd).unwrap(),
            crate::command::CommandKind::Use => use_handler(session, &mut view, &cmd).unwrap(),
            other => panic!("unexpected kind {other}"),
        }
        view
    }

    #[test]
    fn take_with_article_moves_lamp_into_inventory() {
        let mut session = cellar_session();
        let view = run(&mut session, "take the lamp");
        assert!(view.contains_text("You take the brass lamp."));
        let lamp = id(&NAMESPACE_ITEM, "lamp");
        assert!(!session.world.player_location().unwrap().items.contains(&lamp));
        assert!(session.world.player.contains_item(id(&NAMESPACE_INVENTORY_ITEM, "lamp_lit")));
    }

    #[test]
    fn forbidden_take_uses_default_text_and_runs_additional_actions() {
        let mut session = cellar_session();
        let view = run(&mut session, "take statue");
        assert!(view.contains_text("You can't take the stone statue."));
        let statue = session.world.item(id(&NAMESPACE_ITEM, "statue")).unwrap();
        assert_eq!(statue.description, "It looks annoyed.");
        assert!(session.world.player_location().unwrap().items.contains(&statue.id));
    }

    #[test]
    fn custom_take_phrasing_is_owner_only() {
        let mut session = cellar_session();
        let view = run(&mut session, "snatch chest");
        assert!(view.contains_text("You can't do that with the oak chest."));
        assert!(session.world.player_location().unwrap().items.contains(&id(&NAMESPACE_ITEM, "chest")));

        let view = run(&mut session, "snatch lamp");
        assert!(view.contains_text("You take the brass lamp."));
    }

    #[test]
    fn take_of_missing_item_names_the_identifier() {
        let mut session = cellar_session();
        let view = run(&mut session, "take rope");
        assert!(view.contains_text("There is no rope here."));
    }

    #[test]
    fn use_triggers_actions_and_prefers_location_items() {
        let mut session = cellar_session();
        let view = run(&mut session, "press button");
        assert!(view.contains_text("You use the red button. Nothing happens."));
        let trapdoor = session.world.way(id(&NAMESPACE_WAY, "trapdoor")).unwrap();
        assert!(session.world.action(trapdoor.move_action).unwrap().enabled);

        let view = run(&mut session, "use crate");
        assert!(view.contains_text("You can't use the wooden crate."));
    }

    #[test]
    fn use_falls_back_to_inventory() {
        let mut session = cellar_session();
        run(&mut session, "take lamp");
        let view = run(&mut session, "use lamp");
        assert!(view.contains_text("The lamp glows."));
    }
}
