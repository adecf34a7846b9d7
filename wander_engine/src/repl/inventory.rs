//! `repl::inventory` module
//!
//! Handlers for the player's inventory: listing it, and using carried items
//! with something else.

use anyhow::Result;
use log::info;

use crate::command::ParsedCommand;
use crate::entity_search::{SearchScope, find_by_identifier, find_in_scopes, scope_refs};
use crate::item::Interaction;
use crate::message::{Subject, fill_placeholders};
use crate::parser::object_accepts;
use crate::repl::{entity_not_found, own_or_default, push_outcome};
use crate::session::GameSession;
use crate::trigger::trigger_actions;
use crate::view::{View, ViewItem};
use crate::world::{ObjectRef, World};

/// Show the contents of the player's inventory.
///
/// # Errors
/// - on inventory ids that do not resolve
pub fn inventory_handler(session: &GameSession, view: &mut View) -> Result<()> {
    let world = &session.world;
    let texts = &world.game.texts;
    info!("player checks inventory ({} items)", world.player.inventory.len());
    if world.player.inventory.is_empty() {
        view.push(ViewItem::EngineMessage(texts.inventory_empty.clone()));
        return Ok(());
    }
    let mut entries = Vec::with_capacity(world.player.inventory.len());
    for id in &world.player.inventory {
        entries.push(world.inventory_item(*id)?.name.clone());
    }
    view.push(ViewItem::Listing {
        header: texts.inventory_header.clone(),
        entries,
    });
    Ok(())
}

/// Find the interaction between `first` and `second` that accepts the command.
///
/// The first object's interaction is tried before the second's; the second
/// only has one when it is itself an inventory item. A custom phrasing picks
/// the interaction that declares it.
fn find_interaction(
    world: &World,
    command: &ParsedCommand,
    first: ObjectRef,
    second: ObjectRef,
) -> Result<Option<Interaction>> {
    let mut candidates = vec![world.inventory_item(first.id())?.interaction_with(second)];
    if let ObjectRef::InventoryItem(other) = second {
        candidates.push(world.inventory_item(other)?.interaction_with(first));
    }
    for interaction in candidates.into_iter().flatten() {
        if object_accepts(command, &interaction.custom_commands)? {
            return Ok(Some(interaction.clone()));
        }
    }
    Ok(None)
}

/// Use an inventory item with another object, or combine two inventory items.
///
/// `<A>` is always looked up in the inventory; `<B>` among the other
/// inventory items, then the location's items, then its persons.
///
/// # Errors
/// - on unresolved ids or failing actions
pub fn use_with_handler(session: &mut GameSession, view: &mut View, command: &ParsedCommand) -> Result<()> {
    let (first_token, second_token) = (command.first(), command.second());
    let texts = session.world.game.texts.clone();

    let Some(first) = find_in_scopes(&session.world, &[SearchScope::Inventory], first_token)? else {
        entity_not_found(view, &texts.no_such_inventory_item, first_token);
        return Ok(());
    };
    let mut candidates: Vec<ObjectRef> = scope_refs(&session.world, &[SearchScope::Inventory])?
        .into_iter()
        .filter(|candidate| *candidate != first)
        .collect();
    candidates.extend(scope_refs(
        &session.world,
        &[SearchScope::LocationItems, SearchScope::LocationPersons],
    )?);
    let Some(second) = find_by_identifier(&session.world, &candidates, second_token)? else {
        info!("no partner matches '{second_token}'");
        view.push(ViewItem::EntityNotFound(fill_placeholders(
            &texts.no_such_partner,
            Some(Subject::unresolved(first_token)),
            Some(Subject::unresolved(second_token)),
        )));
        return Ok(());
    };

    let first_name = session.world.object_name(first);
    let second_name = session.world.object_name(second);
    let subjects = (
        Some(Subject::new(first_token, &first_name)),
        Some(Subject::new(second_token, &second_name)),
    );

    let interaction = match find_interaction(&session.world, command, first, second)? {
        Some(interaction) => interaction,
        None => {
            info!("'{first_name}' cannot be used with '{second_name}' this way");
            view.push(ViewItem::ActionFailure(fill_placeholders(
                &texts.not_usable_with,
                subjects.0,
                subjects.1,
            )));
            return Ok(());
        },
    };

    let text = if interaction.enabled {
        own_or_default(interaction.successful_text.as_ref(), &texts.used_with)
    } else {
        own_or_default(interaction.forbidden_text.as_ref(), &texts.not_usable_with)
    };
    info!(
        "player uses '{first_name}' with '{second_name}' ({})",
        if interaction.enabled { "allowed" } else { "forbidden" }
    );
    push_outcome(view, interaction.enabled, fill_placeholders(&text, subjects.0, subjects.1));
    trigger_actions(session, view, &interaction.actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::{NAMESPACE_INVENTORY_ITEM, NAMESPACE_ITEM};
    use crate::item::ItemHolder;
    use crate::parser::parse_input;
    use crate::testutil::{cellar_session, id};

    fn use_with(session: &mut GameSession, line: &str) -> View {
        let mut view = View::new();
        let cmd = parse_input(session, line).unwrap().unwrap();
        use_with_handler(session, &mut view, &cmd).unwrap();
        view
    }

    #[test]
    fn inventory_lists_names_or_empty_text() {
        let mut session = cellar_session();
        let mut view = View::new();
        inventory_handler(&session, &mut view).unwrap();
        assert!(view.contains_text("  - iron key"));
        assert!(view.contains_text("  - crowbar"));

        session.world.player.inventory.clear();
        let mut view = View::new();
        inventory_handler(&session, &mut view).unwrap();
        assert!(view.contains_text("You are not carrying anything."));
    }

    #[test]
    fn parameters_keep_template_order() {
        let mut session = cellar_session();
        let view = use_with(&mut session, "unlock chest with key");
        assert!(view.contains_text("The chest clicks open."));
        assert!(session.world.player.contains_item(id(&NAMESPACE_INVENTORY_ITEM, "rope")));
        assert_eq!(
            session.world.item(id(&NAMESPACE_ITEM, "chest")).unwrap().name,
            "open oak chest"
        );
    }

    #[test]
    fn foreign_custom_phrasing_does_not_leak() {
        let mut session = cellar_session();
        let view = use_with(&mut session, "pry chest with key");
        assert!(view.contains_text("You can't use the iron key with the oak chest."));
        assert!(!session.world.player.contains_item(id(&NAMESPACE_INVENTORY_ITEM, "rope")));
    }

    #[test]
    fn builtin_phrasing_reaches_any_interaction() {
        let mut session = cellar_session();
        let view = use_with(&mut session, "use the crowbar on the crate");
        assert!(view.contains_text("The crate splinters."));
    }

    #[test]
    fn combination_is_found_on_either_item() {
        let mut session = cellar_session();
        let view = use_with(&mut session, "combine key and crowbar");
        assert!(view.contains_text("You scratch the key with the crowbar."));
    }

    #[test]
    fn custom_phrasing_selects_the_interaction_that_declares_it() {
        let mut session = cellar_session();
        let crowbar = id(&NAMESPACE_INVENTORY_ITEM, "crowbar");
        // The crowbar already has a plain interaction with the key.
        session
            .world
            .inventory_item_mut(id(&NAMESPACE_INVENTORY_ITEM, "key"))
            .unwrap()
            .interactions
            .push(Interaction {
                partner: ObjectRef::InventoryItem(crowbar),
                enabled: true,
                forbidden_text: None,
                successful_text: Some("You file the key's teeth sharp.".into()),
                custom_commands: vec!["file <B> with <A>".into()],
                actions: Vec::new(),
            });

        let view = use_with(&mut session, "file key with crowbar");
        assert!(view.contains_text("You file the key's teeth sharp."));

        let view = use_with(&mut session, "combine crowbar and key");
        assert!(view.contains_text("You scratch the key with the crowbar."));
    }

    #[test]
    fn missing_objects_and_interactions_are_reported() {
        let mut session = cellar_session();
        let view = use_with(&mut session, "use rope with chest");
        assert!(view.contains_text("You don't carry any rope."));

        let view = use_with(&mut session, "use key with unicorn");
        assert!(view.contains_text("There is no unicorn here."));

        let view = use_with(&mut session, "use key with guard");
        assert!(view.contains_text("You can't use the iron key with the Old Guard."));

        let view = use_with(&mut session, "use key with key");
        assert!(view.contains_text("There is no key here."));
    }
}
