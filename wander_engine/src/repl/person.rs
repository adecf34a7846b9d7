//! `repl::person` module
//!
//! Talking to persons in the current location.

use anyhow::Result;
use log::info;

use crate::command::ParsedCommand;
use crate::conversation::run_conversation;
use crate::entity_search::{SearchScope, find_in_scopes};
use crate::message::{Subject, fill_placeholders};
use crate::parser::object_accepts;
use crate::repl::{Terminal, capability_mismatch, entity_not_found, own_or_default};
use crate::session::GameSession;
use crate::trigger::trigger_actions;
use crate::view::{View, ViewItem};

/// Talk to a person: hold their conversation if they are willing and have one.
///
/// The person's talk actions run after the conversation (or the refusal).
///
/// # Errors
/// - on unresolved ids, failing actions or input errors during the conversation
pub fn talk_to_handler(
    session: &mut GameSession,
    view: &mut View,
    terminal: &mut Terminal,
    command: &ParsedCommand,
) -> Result<()> {
    let token = command.first();
    let Some(object) = find_in_scopes(&session.world, &[SearchScope::LocationPersons], token)? else {
        entity_not_found(view, &session.world.game.texts.no_such_person, token);
        return Ok(());
    };
    let person = session.world.person(object.id())?.clone();
    let subject = Subject::new(token, &person.name);
    if !object_accepts(command, &person.talk.custom_commands)? {
        capability_mismatch(session, view, subject);
        return Ok(());
    }

    let texts = &session.world.game.texts;
    if !person.talk.enabled {
        info!("'{}' refuses to talk", person.symbol);
        let text = own_or_default(person.talk.forbidden_text.as_ref(), &texts.not_talking);
        view.push(ViewItem::ActionFailure(fill_placeholders(&text, Some(subject), None)));
    } else if let Some(conversation) = person.talk.conversation {
        info!("player talks to '{}'", person.symbol);
        run_conversation(session, view, terminal, conversation, &person.name)?;
    } else {
        info!("'{}' has no conversation", person.symbol);
        view.push(ViewItem::EngineMessage(fill_placeholders(
            &texts.no_conversation,
            Some(subject),
            None,
        )));
    }
    trigger_actions(session, view, &person.talk.actions)
}
