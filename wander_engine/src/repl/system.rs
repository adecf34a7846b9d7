//! `repl::system` module
//!
//! Contains repl loop handlers for commands that are about the game itself.

use log::info;

use crate::command::DISPATCH_ORDER;
use crate::parser::dispatch::kind_available;
use crate::session::GameSession;
use crate::view::{View, ViewItem};

/// Leave the game.
pub fn exit_handler(session: &mut GameSession, view: &mut View) {
    let world = &session.world;
    info!("{} quit the game", world.player.name);
    info!("ending inventory:");
    world
        .player
        .inventory
        .iter()
        .filter_map(|id| world.inventory_items.get(id))
        .for_each(|i| info!("- {} ({})", i.name, i.symbol));

    view.push(ViewItem::EngineMessage(world.game.texts.exit.clone()));
    session.quit();
}

/// List every command kind that can currently be used, with its built-in phrasings.
pub fn help_handler(session: &GameSession, view: &mut View) {
    let commands = &session.world.game.commands;
    let listed = DISPATCH_ORDER
        .into_iter()
        .filter(|kind| kind_available(session, *kind))
        .map(|kind| (kind.label().to_string(), kind.builtin_templates(commands).to_vec()))
        .collect();
    view.push(ViewItem::Help {
        header: session.world.game.texts.help_header.clone(),
        commands: listed,
    });
}
