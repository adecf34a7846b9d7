//! Trigger module --
//!
//! Walks the action graph. A non-container action mutates the world only
//! when it is enabled; a `Multi` always descends into its children, each of
//! which checks its own flag. Every mutation lands in the live world before
//! the next action runs, so later actions in a cascade see earlier effects.

pub mod action;

pub use action::*;

use std::collections::HashMap;

use anyhow::Result;
use log::info;
use uuid::Uuid;

use crate::error::EngineError;
use crate::session::GameSession;
use crate::view::View;
use crate::world::World;

fn cycle_error(world: &World, id: Uuid) -> EngineError {
    let action = world.actions.get(&id).map_or_else(|| id.to_string(), |a| a.symbol.clone());
    EngineError::CyclicActionGraph { action }
}

fn multi_children(world: &World, id: Uuid) -> Result<Option<Vec<Uuid>>, EngineError> {
    Ok(match &world.action(id)?.kind {
        ActionKind::Multi { actions } => Some(actions.clone()),
        _ => None,
    })
}

/// Trigger one action and everything it cascades into.
///
/// The store is flushed after each executed (enabled, non-container) action.
///
/// # Errors
/// - [`EngineError::CyclicActionGraph`] if a `Multi` contains itself
/// - on ids that do not resolve, or store failures
pub fn trigger_action(session: &mut GameSession, view: &mut View, action_id: Uuid) -> Result<()> {
    let mut path = Vec::new();
    trigger_nested(session, view, action_id, &mut path)
}

/// Trigger a list of actions in order.
///
/// # Errors
/// See [`trigger_action`].
pub fn trigger_actions(session: &mut GameSession, view: &mut View, action_ids: &[Uuid]) -> Result<()> {
    for action_id in action_ids {
        trigger_action(session, view, *action_id)?;
    }
    Ok(())
}

fn trigger_nested(session: &mut GameSession, view: &mut View, action_id: Uuid, path: &mut Vec<Uuid>) -> Result<()> {
    if path.contains(&action_id) {
        return Err(cycle_error(&session.world, action_id).into());
    }

    if let Some(children) = multi_children(&session.world, action_id)? {
        info!(
            "└─ action: Multi({}) with {} children",
            session.world.action(action_id)?.symbol,
            children.len()
        );
        path.push(action_id);
        for child in children {
            trigger_nested(session, view, child, path)?;
        }
        path.pop();
        return Ok(());
    }

    let action = session.world.action(action_id)?.clone();
    if !action.enabled {
        info!("└─ action: {} ({}) skipped, disabled", action.symbol, action.name);
        return Ok(());
    }
    execute_action(session, view, &action)?;
    session.flush()
}

/// Set an action's enabled flag. For a `Multi` the value is written to every
/// descendant as well.
///
/// # Errors
/// - [`EngineError::CyclicActionGraph`] on a self-containing `Multi`
/// - [`EngineError::UnknownEntity`] on dangling ids
pub fn set_action_enabled(world: &mut World, action_id: Uuid, enabled: bool) -> Result<(), EngineError> {
    let mut path = Vec::new();
    propagate_enabled(world, action_id, enabled, &mut path)
}

fn propagate_enabled(world: &mut World, action_id: Uuid, enabled: bool, path: &mut Vec<Uuid>) -> Result<(), EngineError> {
    if path.contains(&action_id) {
        return Err(cycle_error(world, action_id));
    }
    world.action_mut(action_id)?.enabled = enabled;
    if let Some(children) = multi_children(world, action_id)? {
        path.push(action_id);
        for child in children {
            propagate_enabled(world, child, enabled, path)?;
        }
        path.pop();
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Verify that no `Multi` action contains itself, directly or indirectly.
///
/// # Errors
/// [`EngineError::CyclicActionGraph`] naming an action on the cycle, or
/// [`EngineError::UnknownEntity`] for a child id that does not exist.
pub fn check_action_graph(world: &World) -> Result<(), EngineError> {
    let mut visits: HashMap<Uuid, Visit> = HashMap::new();
    let mut roots: Vec<&Uuid> = world.actions.keys().collect();
    roots.sort();
    for root in roots {
        visit(world, *root, &mut visits)?;
    }
    Ok(())
}

fn visit(world: &World, action_id: Uuid, visits: &mut HashMap<Uuid, Visit>) -> Result<(), EngineError> {
    match visits.get(&action_id) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => return Err(cycle_error(world, action_id)),
        None => {},
    }
    visits.insert(action_id, Visit::InProgress);
    if let Some(children) = multi_children(world, action_id)? {
        for child in children {
            visit(world, child, visits)?;
        }
    }
    visits.insert(action_id, Visit::Done);
    Ok(())
}

/// Push the disabled state of every authored disabled `Multi` down to its descendants.
///
/// # Errors
/// See [`set_action_enabled`].
pub fn propagate_disabled_multis(world: &mut World) -> Result<(), EngineError> {
    let mut disabled: Vec<Uuid> = world
        .actions
        .values()
        .filter(|a| !a.enabled && matches!(a.kind, ActionKind::Multi { .. }))
        .map(|a| a.id)
        .collect();
    disabled.sort();
    for id in disabled {
        set_action_enabled(world, id, false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ConversationLayer;
    use crate::idgen::{
        NAMESPACE_ACTION, NAMESPACE_CONVERSATION, NAMESPACE_INVENTORY_ITEM, NAMESPACE_ITEM, NAMESPACE_LAYER,
        NAMESPACE_LOCATION, NAMESPACE_OPTION, NAMESPACE_WAY,
    };
    use crate::item::ItemHolder;
    use crate::store::MemoryStore;
    use crate::testutil::{add_action, cellar_session, id};
    use wander_data::Enabling;

    fn action_id(symbol: &str) -> Uuid {
        id(&NAMESPACE_ACTION, symbol)
    }

    #[test]
    fn disabled_action_does_not_mutate() {
        let mut session = cellar_session();
        let mut view = View::new();
        let rope = id(&NAMESPACE_INVENTORY_ITEM, "rope");
        let grant = add_action(&mut session.world, "grant_rope", false, ActionKind::AddInventoryItems { items: vec![rope] });

        trigger_action(&mut session, &mut view, grant).unwrap();
        assert!(!session.world.player.contains_item(rope));

        set_action_enabled(&mut session.world, grant, true).unwrap();
        trigger_action(&mut session, &mut view, grant).unwrap();
        assert!(session.world.player.contains_item(rope));
    }

    #[test]
    fn later_actions_see_earlier_mutations() {
        let mut session = cellar_session();
        let mut view = View::new();
        let rope = id(&NAMESPACE_INVENTORY_ITEM, "rope");
        let grant = add_action(&mut session.world, "grant", true, ActionKind::AddInventoryItems { items: vec![rope] });
        let disable = add_action(
            &mut session.world,
            "disable_grant",
            true,
            ActionKind::ChangeAction {
                action: grant,
                enabling: Enabling::Disable,
            },
        );
        let multi = add_action(
            &mut session.world,
            "sequence",
            true,
            ActionKind::Multi {
                actions: vec![disable, grant],
            },
        );

        trigger_action(&mut session, &mut view, multi).unwrap();
        assert!(!session.world.action(grant).unwrap().enabled);
        assert!(!session.world.player.contains_item(rope));
    }

    #[test]
    fn disabled_multi_skips_children_after_load() {
        // The fixture's "stir_statue" Multi is authored disabled with an enabled child.
        let mut session = cellar_session();
        let mut view = View::new();
        let child = action_id("statue_speaks");
        assert!(!session.world.action(child).unwrap().enabled);

        trigger_action(&mut session, &mut view, action_id("stir_statue")).unwrap();
        let hall = session.world.location(id(&NAMESPACE_LOCATION, "hall")).unwrap();
        assert_eq!(hall.description, "A draughty hall.");
    }

    #[test]
    fn enabling_a_multi_enables_descendants() {
        let mut session = cellar_session();
        let mut view = View::new();
        set_action_enabled(&mut session.world, action_id("stir_statue"), true).unwrap();
        assert!(session.world.action(action_id("statue_speaks")).unwrap().enabled);

        trigger_action(&mut session, &mut view, action_id("stir_statue")).unwrap();
        let hall = session.world.location(id(&NAMESPACE_LOCATION, "hall")).unwrap();
        assert_eq!(hall.description, "The statue hums quietly.");
    }

    #[test]
    fn multi_itself_does_not_check_its_flag() {
        let mut session = cellar_session();
        let mut view = View::new();
        let multi = action_id("stir_statue");
        // Flag on the container only; the child stays enabled.
        session.world.action_mut(multi).unwrap().enabled = false;
        session.world.action_mut(action_id("statue_speaks")).unwrap().enabled = true;

        trigger_action(&mut session, &mut view, multi).unwrap();
        let hall = session.world.location(id(&NAMESPACE_LOCATION, "hall")).unwrap();
        assert_eq!(hall.description, "The statue hums quietly.");
    }

    #[test]
    fn cycles_are_reported_at_trigger_time() {
        let mut session = cellar_session();
        let mut view = View::new();
        let a = action_id("loop_a");
        let b = add_action(&mut session.world, "loop_b", true, ActionKind::Multi { actions: vec![a] });
        add_action(&mut session.world, "loop_a", true, ActionKind::Multi { actions: vec![b] });

        let err = trigger_action(&mut session, &mut view, a).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::CyclicActionGraph { .. })
        ));
        assert!(check_action_graph(&session.world).is_err());
        assert!(set_action_enabled(&mut session.world, a, false).is_err());
    }

    #[test]
    fn shared_children_are_not_cycles() {
        let mut session = cellar_session();
        let shared = action_id("open_trapdoor");
        let left = add_action(&mut session.world, "left", true, ActionKind::Multi { actions: vec![shared] });
        add_action(&mut session.world, "both", true, ActionKind::Multi { actions: vec![left, shared] });
        assert!(check_action_graph(&session.world).is_ok());
    }

    #[test]
    fn store_is_flushed_once_per_executed_action() {
        let store = MemoryStore::new();
        let mut session = cellar_session();
        session.store = Box::new(store.clone());
        let mut view = View::new();
        let rope = id(&NAMESPACE_INVENTORY_ITEM, "rope");
        let grant = add_action(&mut session.world, "grant", true, ActionKind::AddInventoryItems { items: vec![rope] });
        let off = add_action(&mut session.world, "off", false, ActionKind::RemoveInventoryItem { item: rope });
        let multi = add_action(&mut session.world, "pair", true, ActionKind::Multi { actions: vec![grant, off] });

        trigger_action(&mut session, &mut view, multi).unwrap();
        assert_eq!(store.flushes(), 1);
        assert_eq!(store.commits(), 0);
    }

    #[test]
    fn take_detaches_item_and_grants_inventory() {
        let mut session = cellar_session();
        let mut view = View::new();
        let lamp = id(&NAMESPACE_ITEM, "lamp");
        let take = session.world.item(lamp).unwrap().take_action;

        trigger_action(&mut session, &mut view, take).unwrap();
        assert!(session.world.item(lamp).unwrap().location.is_none());
        assert!(!session.world.player_location().unwrap().items.contains(&lamp));
        assert!(
            session
                .world
                .player
                .contains_item(id(&NAMESPACE_INVENTORY_ITEM, "lamp_lit"))
        );
    }

    #[test]
    fn change_way_toggles_its_move_action() {
        let mut session = cellar_session();
        let mut view = View::new();
        let trapdoor = id(&NAMESPACE_WAY, "trapdoor");
        let move_action = session.world.way(trapdoor).unwrap().move_action;
        assert!(!session.world.action(move_action).unwrap().enabled);

        trigger_action(&mut session, &mut view, action_id("open_trapdoor")).unwrap();
        assert!(session.world.action(move_action).unwrap().enabled);
    }

    #[test]
    fn end_game_marks_session_and_keeps_cascading() {
        let mut session = cellar_session();
        let mut view = View::new();
        let rope = id(&NAMESPACE_INVENTORY_ITEM, "rope");
        let end = add_action(&mut session.world, "finale", true, ActionKind::EndGame { text: None });
        let grant = add_action(&mut session.world, "grant", true, ActionKind::AddInventoryItems { items: vec![rope] });
        let multi = add_action(&mut session.world, "ending", true, ActionKind::Multi { actions: vec![end, grant] });

        trigger_action(&mut session, &mut view, multi).unwrap();
        assert!(session.is_over());
        assert!(session.world.player.contains_item(rope));
        assert!(view.contains_text("The garden gate closes behind you. The end."));
    }

    #[test]
    fn option_cannot_be_pointed_at_another_conversation() {
        let mut session = cellar_session();
        let mut view = View::new();
        let foreign = id(&NAMESPACE_LAYER, "other_root");
        session.world.layers.insert(
            foreign,
            ConversationLayer {
                id: foreign,
                symbol: "other_root".into(),
                conversation: id(&NAMESPACE_CONVERSATION, "other_talk"),
                options: Vec::new(),
            },
        );
        let ask_open = id(&NAMESPACE_OPTION, "ask_open");
        let redirect = add_action(
            &mut session.world,
            "redirect",
            true,
            ActionKind::ChangeConversationOption {
                option: ask_open,
                patch: OptionPatch {
                    target: Some(foreign),
                    text: Some("Somewhere else?".into()),
                    ..OptionPatch::default()
                },
            },
        );

        assert!(trigger_action(&mut session, &mut view, redirect).is_err());
        let option = session.world.option(ask_open).unwrap();
        assert_eq!(option.target, Some(id(&NAMESPACE_LAYER, "root")));
        assert_eq!(option.text, "Please open the trapdoor.");
    }
}
