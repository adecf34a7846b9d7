//! Conversations.
//!
//! A conversation is a small graph: layers hold options, and choosing an
//! option answers, runs the option's actions and moves to its target layer
//! (or ends the conversation when it has none). The [`ConversationPlayer`]
//! walks that graph; [`run_conversation`] drives it from the terminal.

use anyhow::{Result, bail};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repl::{InputEvent, Terminal};
use crate::session::GameSession;
use crate::trigger::trigger_actions;
use crate::view::{View, ViewItem};
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub symbol: String,
    pub greeting: Option<String>,
    pub farewell: Option<String>,
    /// `None` ends every conversation right after the greeting.
    pub start_layer: Option<Uuid>,
    pub layers: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLayer {
    pub id: Uuid,
    pub symbol: String,
    pub conversation: Uuid,
    pub options: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationOption {
    pub id: Uuid,
    pub symbol: String,
    pub conversation: Uuid,
    pub layer: Uuid,
    pub text: String,
    pub answer: String,
    pub enabled: bool,
    pub disable_after_chosen: bool,
    /// Layer to continue in; `None` ends the conversation.
    pub target: Option<Uuid>,
    pub actions: Vec<Uuid>,
}

/// Position of the player inside one running conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPlayer {
    conversation: Uuid,
    current_layer: Option<Uuid>,
}

impl ConversationPlayer {
    /// Begin at the conversation's start layer.
    ///
    /// # Errors
    /// - if the conversation does not exist
    pub fn start(world: &World, conversation: Uuid) -> Result<Self> {
        let current_layer = world.conversation(conversation)?.start_layer;
        Ok(Self {
            conversation,
            current_layer,
        })
    }

    pub fn conversation(&self) -> Uuid {
        self.conversation
    }

    pub fn current_layer(&self) -> Option<Uuid> {
        self.current_layer
    }

    pub fn is_over(&self) -> bool {
        self.current_layer.is_none()
    }

    /// Enabled options of the current layer, in authored order.
    ///
    /// # Errors
    /// - on layer or option ids that do not resolve
    pub fn offered_options(&self, world: &World) -> Result<Vec<Uuid>> {
        let Some(layer_id) = self.current_layer else {
            return Ok(Vec::new());
        };
        let mut offered = Vec::new();
        for option_id in &world.layer(layer_id)?.options {
            if world.option(*option_id)?.enabled {
                offered.push(*option_id);
            }
        }
        Ok(offered)
    }

    /// Choose an option of the current layer.
    ///
    /// # Errors
    /// - if the option is not offered in the current layer
    /// - on failures of the option's actions
    pub fn choose(&mut self, session: &mut GameSession, view: &mut View, speaker: &str, option_id: Uuid) -> Result<()> {
        let option = session.world.option(option_id)?.clone();
        if Some(option.layer) != self.current_layer || !option.enabled {
            bail!("option '{}' is not offered right now", option.symbol);
        }
        info!("player chose conversation option '{}'", option.symbol);

        view.push(ViewItem::Speech {
            speaker: session.world.player.name.clone(),
            text: option.text.clone(),
        });
        if !option.answer.is_empty() {
            view.push(ViewItem::Speech {
                speaker: speaker.to_string(),
                text: option.answer.clone(),
            });
        }
        trigger_actions(session, view, &option.actions)?;
        if option.disable_after_chosen {
            session.world.option_mut(option_id)?.enabled = false;
        }
        self.current_layer = option.target;
        Ok(())
    }

    pub fn end(&mut self) {
        self.current_layer = None;
    }
}

/// Hold a conversation with the player through the terminal.
///
/// Each call starts from the conversation's start layer; options disabled by
/// earlier conversations stay hidden.
///
/// # Errors
/// - on unresolved ids, action failures or input errors
pub fn run_conversation(
    session: &mut GameSession,
    view: &mut View,
    terminal: &mut Terminal,
    conversation_id: Uuid,
    speaker: &str,
) -> Result<()> {
    let conversation = session.world.conversation(conversation_id)?.clone();
    info!("conversation '{}' with {speaker} started", conversation.symbol);
    if let Some(greeting) = &conversation.greeting {
        view.push(ViewItem::Speech {
            speaker: speaker.to_string(),
            text: greeting.clone(),
        });
    }

    let mut player = ConversationPlayer::start(&session.world, conversation_id)?;
    while !player.is_over() && !session.is_over() {
        let offered = player.offered_options(&session.world)?;
        if offered.is_empty() {
            player.end();
            break;
        }
        let mut texts = Vec::with_capacity(offered.len());
        for option_id in &offered {
            texts.push(session.world.option(*option_id)?.text.clone());
        }
        view.push(ViewItem::ConversationOptions {
            prompt: session.world.game.texts.choose_option.clone(),
            options: texts,
        });
        view.flush(terminal.output.as_mut());

        let line = match terminal.input.read_line("> ")? {
            InputEvent::Line(line) => line,
            InputEvent::Eof | InputEvent::Interrupted => {
                player.end();
                break;
            },
        };
        match pick_option(&offered, &line) {
            Some(option_id) => player.choose(session, view, speaker, option_id)?,
            None => view.push(ViewItem::ActionFailure(session.world.game.texts.invalid_choice.clone())),
        }
    }

    if let Some(farewell) = &conversation.farewell {
        view.push(ViewItem::Speech {
            speaker: speaker.to_string(),
            text: farewell.clone(),
        });
    }
    info!("conversation '{}' ended", conversation.symbol);
    Ok(())
}

/// Map a typed number (1-based) to an offered option.
fn pick_option(offered: &[Uuid], line: &str) -> Option<Uuid> {
    let index = line.trim().parse::<usize>().ok()?;
    offered.get(index.checked_sub(1)?).copied()
}
