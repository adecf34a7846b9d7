//! ViewItem module
//!
//! A `ViewItem` is one message produced while handling a command. The [`View`](super::View)
//! collects them and writes them out, in order, once the command is done.

use variantly::Variantly;

use super::MessageKind;

/// The kinds of information that may be displayed to the player.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum ViewItem {
    ActionSuccess(String),
    ActionFailure(String),
    /// A name the player typed did not resolve to anything in scope.
    EntityNotFound(String),
    UnknownCommand(String),
    LocationDescription {
        name: String,
        description: String,
    },
    ObjectDescription {
        name: String,
        text: String,
    },
    Listing {
        header: String,
        entries: Vec<String>,
    },
    Help {
        header: String,
        commands: Vec<(String, Vec<String>)>,
    },
    Speech {
        speaker: String,
        text: String,
    },
    ConversationOptions {
        prompt: String,
        options: Vec<String>,
    },
    EngineMessage(String),
    GameEnded(String),
    Error(String),
}

impl ViewItem {
    /// Category used to color the item's lines.
    pub fn kind(&self) -> MessageKind {
        match self {
            ViewItem::ActionSuccess(_) => MessageKind::Success,
            ViewItem::ActionFailure(_) | ViewItem::EntityNotFound(_) | ViewItem::UnknownCommand(_) | ViewItem::Error(_) => {
                MessageKind::Failure
            },
            ViewItem::LocationDescription { .. }
            | ViewItem::ObjectDescription { .. }
            | ViewItem::Listing { .. }
            | ViewItem::Help { .. }
            | ViewItem::Speech { .. }
            | ViewItem::ConversationOptions { .. }
            | ViewItem::EngineMessage(_)
            | ViewItem::GameEnded(_) => MessageKind::Neutral,
        }
    }

    /// Plain text lines of this item.
    pub fn lines(&self) -> Vec<String> {
        match self {
            ViewItem::ActionSuccess(text)
            | ViewItem::ActionFailure(text)
            | ViewItem::EntityNotFound(text)
            | ViewItem::UnknownCommand(text)
            | ViewItem::EngineMessage(text)
            | ViewItem::GameEnded(text)
            | ViewItem::Error(text) => vec![text.clone()],
            ViewItem::LocationDescription { name, description } => {
                let mut lines = vec![format!("[{name}]")];
                if !description.is_empty() {
                    lines.push(description.clone());
                }
                lines
            },
            ViewItem::ObjectDescription { name: _, text } => vec![text.clone()],
            ViewItem::Listing { header, entries } => std::iter::once(header.clone())
                .chain(entries.iter().map(|entry| format!("  - {entry}")))
                .collect(),
            ViewItem::Help { header, commands } => std::iter::once(header.clone())
                .chain(
                    commands
                        .iter()
                        .map(|(label, templates)| format!("  {label}: {}", templates.join(" | "))),
                )
                .collect(),
            ViewItem::Speech { speaker, text } => vec![format!("{speaker}: {text}")],
            ViewItem::ConversationOptions { prompt, options } => std::iter::once(prompt.clone())
                .chain(
                    options
                        .iter()
                        .enumerate()
                        .map(|(index, option)| format!("  {}. {option}", index + 1)),
                )
                .collect(),
        }
    }
}
