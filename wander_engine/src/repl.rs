//! REPL and command handling utilities.
//!
//! The game runs in a read-eval-print loop. Each input line is matched to a
//! command kind and handed to one of the handlers in the submodules; the
//! messages they produce are written out once the command's whole action
//! cascade has run, and the store is told the command is complete.

pub mod input;
pub mod inventory;
pub mod item;
pub mod look;
pub mod movement;
pub mod person;
pub mod system;

pub use input::{InputEvent, InputManager, LineInput, ScriptedInput, command_terms};
pub use inventory::*;
pub use item::*;
pub use look::*;
pub use movement::*;
pub use person::*;
pub use system::*;

use anyhow::{Context, Result};
use log::info;

use crate::command::CommandKind;
use crate::message::{Subject, fill_placeholders};
use crate::parser::parse_input;
use crate::session::GameSession;
use crate::style::GameStyle;
use crate::view::{LineOutput, View, ViewItem};

/// The player's end of the game: where lines come from and where they go.
pub struct Terminal {
    pub input: Box<dyn LineInput>,
    pub output: Box<dyn LineOutput>,
}

impl Terminal {
    pub fn new(input: Box<dyn LineInput>, output: Box<dyn LineOutput>) -> Self {
        Self { input, output }
    }
}

/// Run the main read–eval–print loop until the player quits or the game ends.
///
/// End of input is treated like the exit command.
///
/// # Errors
/// - structural defects surfaced by parsing, handlers or actions
/// - input or store failures
pub fn run_repl(session: &mut GameSession, terminal: &mut Terminal) -> Result<()> {
    let mut view = View::new();
    if !session.world.game.start_text.is_empty() {
        view.push(ViewItem::EngineMessage(session.world.game.start_text.clone()));
    }
    describe_location(session, &mut view)?;
    view.flush(terminal.output.as_mut());

    let mut turn = 0_usize;
    while !session.is_over() {
        let prompt = "\n> ".prompt_style().to_string();
        let event = terminal.input.read_line(&prompt).context("while reading player input")?;
        let line = match event {
            InputEvent::Line(line) => line,
            InputEvent::Eof => {
                info!("end of input, leaving the game");
                exit_handler(session, &mut view);
                view.flush(terminal.output.as_mut());
                session.commit()?;
                break;
            },
            InputEvent::Interrupted => {
                view.push(ViewItem::EngineMessage("Command canceled.".to_string()));
                view.flush(terminal.output.as_mut());
                continue;
            },
        };
        if line.trim().is_empty() {
            continue;
        }

        turn += 1;
        info!("================> COMMAND {turn}: \"{}\" <================", line.trim());
        execute_command(session, &mut view, terminal, &line)?;
        view.flush(terminal.output.as_mut());
        session.commit()?;
    }
    Ok(())
}

/// Parse one input line and run the matching handler.
///
/// # Errors
/// See [`run_repl`].
pub fn execute_command(session: &mut GameSession, view: &mut View, terminal: &mut Terminal, line: &str) -> Result<()> {
    let Some(command) = parse_input(session, line)? else {
        view.push(ViewItem::UnknownCommand(session.world.game.texts.no_valid_command.clone()));
        return Ok(());
    };

    match command.kind {
        CommandKind::Exit => exit_handler(session, view),
        CommandKind::Help => help_handler(session, view),
        CommandKind::LookAround => look_around_handler(session, view)?,
        CommandKind::Inventory => inventory_handler(session, view)?,
        CommandKind::Inspect => inspect_handler(session, view, &command)?,
        CommandKind::Take => take_handler(session, view, &command)?,
        CommandKind::TalkTo => talk_to_handler(session, view, terminal, &command)?,
        CommandKind::Move => move_handler(session, view, &command)?,
        CommandKind::UseWithCombine => use_with_handler(session, view, &command)?,
        CommandKind::Use => use_handler(session, view, &command)?,
    }
    Ok(())
}

/// Feedback to player if a name does not resolve in the searched scope.
pub fn entity_not_found(view: &mut View, text: &str, identifier: &str) {
    info!("nothing in scope matches '{identifier}'");
    view.push(ViewItem::EntityNotFound(fill_placeholders(
        text,
        Some(Subject::unresolved(identifier)),
        None,
    )));
}

/// The object's own text if it has one, otherwise the game default.
pub(crate) fn own_or_default(own: Option<&String>, default: &str) -> String {
    own.map_or_else(|| default.to_string(), Clone::clone)
}

/// Push the success or failure message of an attempted verb.
pub(crate) fn push_outcome(view: &mut View, allowed: bool, text: String) {
    if allowed {
        view.push(ViewItem::ActionSuccess(text));
    } else {
        view.push(ViewItem::ActionFailure(text));
    }
}

/// A custom phrasing matched, but not one the resolved object owns.
pub(crate) fn capability_mismatch(session: &GameSession, view: &mut View, subject: Subject<'_>) {
    info!("custom phrasing does not belong to '{}'", subject.name);
    view.push(ViewItem::ActionFailure(fill_placeholders(
        &session.world.game.texts.invalid_command,
        Some(subject),
        None,
    )));
}
