//! Command kinds and parsed player commands.
//!
//! A [`CommandKind`] is one verb of the game (take, move, ...). Every kind has a
//! fixed arity and a list of author-supplied templates in the world's
//! [`CommandsDef`]. The dispatcher turns player input into a [`ParsedCommand`].

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use variantly::Variantly;
use wander_data::CommandsDef;

/// The verbs known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Variantly)]
pub enum CommandKind {
    Exit,
    Help,
    LookAround,
    Inventory,
    Inspect,
    Take,
    TalkTo,
    Move,
    Use,
    UseWithCombine,
}

/// Order in which command kinds are tried against player input.
///
/// `UseWithCombine` comes before `Use` so "use key with door" is never read as
/// using an item called "key with door".
pub const DISPATCH_ORDER: [CommandKind; 10] = [
    CommandKind::Exit,
    CommandKind::Help,
    CommandKind::LookAround,
    CommandKind::Inventory,
    CommandKind::Inspect,
    CommandKind::Take,
    CommandKind::TalkTo,
    CommandKind::Move,
    CommandKind::UseWithCombine,
    CommandKind::Use,
];

impl CommandKind {
    /// Number of object parameters (`<A>`, `<B>`) every template of this kind carries.
    pub fn arity(self) -> usize {
        match self {
            CommandKind::Exit | CommandKind::Help | CommandKind::LookAround | CommandKind::Inventory => 0,
            CommandKind::Inspect | CommandKind::Take | CommandKind::TalkTo | CommandKind::Move | CommandKind::Use => 1,
            CommandKind::UseWithCombine => 2,
        }
    }

    /// Human readable label used in help output and logs.
    pub fn label(self) -> &'static str {
        match self {
            CommandKind::Exit => "exit",
            CommandKind::Help => "help",
            CommandKind::LookAround => "look around",
            CommandKind::Inventory => "inventory",
            CommandKind::Inspect => "inspect",
            CommandKind::Take => "take",
            CommandKind::TalkTo => "talk to",
            CommandKind::Move => "move",
            CommandKind::Use => "use",
            CommandKind::UseWithCombine => "use with / combine",
        }
    }

    /// The game's built-in templates for this kind.
    pub fn builtin_templates(self, commands: &CommandsDef) -> &[String] {
        match self {
            CommandKind::Exit => &commands.exit,
            CommandKind::Help => &commands.help,
            CommandKind::LookAround => &commands.look_around,
            CommandKind::Inventory => &commands.inventory,
            CommandKind::Inspect => &commands.inspect,
            CommandKind::Take => &commands.take,
            CommandKind::TalkTo => &commands.talk_to,
            CommandKind::Move => &commands.move_to,
            CommandKind::Use => &commands.use_item,
            CommandKind::UseWithCombine => &commands.use_with_combine,
        }
    }

    /// Mutable access to the built-in templates, used while loading.
    pub fn builtin_templates_mut(self, commands: &mut CommandsDef) -> &mut Vec<String> {
        match self {
            CommandKind::Exit => &mut commands.exit,
            CommandKind::Help => &mut commands.help,
            CommandKind::LookAround => &mut commands.look_around,
            CommandKind::Inventory => &mut commands.inventory,
            CommandKind::Inspect => &mut commands.inspect,
            CommandKind::Take => &mut commands.take,
            CommandKind::TalkTo => &mut commands.talk_to,
            CommandKind::Move => &mut commands.move_to,
            CommandKind::Use => &mut commands.use_item,
            CommandKind::UseWithCombine => &mut commands.use_with_combine,
        }
    }
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One extracted object parameter with the capture group it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub group: String,
    pub value: String,
}

/// Result of matching player input against the compiled command patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    /// True when a built-in template matched, false for an object's custom phrasing.
    pub original_command: bool,
    /// The normalized input line.
    pub input: String,
    pub parameters: Vec<Parameter>,
}

impl ParsedCommand {
    pub fn parameter(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(|p| p.value.as_str())
    }

    /// The `<A>` object of the command (empty for arity 0).
    pub fn first(&self) -> &str {
        self.parameter(0).unwrap_or_default()
    }

    /// The `<B>` object of the command (empty below arity 2).
    pub fn second(&self) -> &str {
        self.parameter(1).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_matches_verbs() {
        assert_eq!(CommandKind::Exit.arity(), 0);
        assert_eq!(CommandKind::Take.arity(), 1);
        assert_eq!(CommandKind::UseWithCombine.arity(), 2);
    }

    #[test]
    fn use_with_is_tried_before_use() {
        let with = DISPATCH_ORDER.iter().position(|k| *k == CommandKind::UseWithCombine);
        let plain = DISPATCH_ORDER.iter().position(|k| *k == CommandKind::Use);
        assert!(with < plain);
        assert_eq!(DISPATCH_ORDER.len(), 10);
    }

    #[test]
    fn builtin_templates_come_from_commands_def() {
        let commands = CommandsDef::default();
        assert!(
            CommandKind::Take
                .builtin_templates(&commands)
                .contains(&"take [the ]<A>".to_string())
        );
    }

    #[test]
    fn missing_parameters_read_as_empty() {
        let cmd = ParsedCommand {
            kind: CommandKind::Take,
            original_command: true,
            input: "take lamp".into(),
            parameters: vec![Parameter {
                group: "o0".into(),
                value: "lamp".into(),
            }],
        };
        assert_eq!(cmd.first(), "lamp");
        assert_eq!(cmd.second(), "");
    }
}
