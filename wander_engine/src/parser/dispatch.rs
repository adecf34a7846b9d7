//! Matching player input to command kinds.

use log::{debug, info};

use crate::command::{CommandKind, DISPATCH_ORDER, ParsedCommand};
use crate::error::EngineError;
use crate::parser::pattern::build_pattern;
use crate::session::GameSession;

/// Trim, lowercase and collapse runs of whitespace.
pub fn normalize_input(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Match a raw input line against every command kind in dispatch order.
///
/// For each kind the built-in pattern is tried before the custom one; the first
/// full match wins. Returns `Ok(None)` if nothing matched.
///
/// # Errors
/// Returns an error if a pattern cannot be built or a matched pattern lacks a
/// capture group.
pub fn parse_input(session: &mut GameSession, raw: &str) -> Result<Option<ParsedCommand>, EngineError> {
    let input = normalize_input(raw);
    if input.is_empty() {
        return Ok(None);
    }

    for kind in DISPATCH_ORDER {
        let builtin = kind.builtin_templates(&session.world.game.commands);
        let custom = session.world.custom_commands(kind);
        let set = session.patterns.patterns(kind, builtin, custom)?;

        for (pattern, original_command) in [(&set.builtin, true), (&set.custom, false)] {
            let Some(pattern) = pattern else {
                continue;
            };
            if let Some(parameters) = pattern.match_input(&input)? {
                debug!(
                    "input '{input}' matched {kind} ({}) with {parameters:?}",
                    if original_command { "built-in" } else { "custom" }
                );
                return Ok(Some(ParsedCommand {
                    kind,
                    original_command,
                    input,
                    parameters,
                }));
            }
        }
    }

    info!("no command matched input '{input}'");
    Ok(None)
}

/// Whether the resolved object accepts the command.
///
/// Built-in commands are accepted by every object. A custom phrasing is only
/// accepted if one of the object's own templates for this verb matches the
/// input; otherwise a phrasing registered on some other object would leak.
///
/// # Errors
/// Returns an error if the object's templates cannot be compiled.
pub fn object_accepts(command: &ParsedCommand, object_templates: &[String]) -> Result<bool, EngineError> {
    if command.original_command {
        return Ok(true);
    }
    Ok(build_pattern(command.kind, object_templates)?.is_some_and(|pattern| pattern.is_match(&command.input)))
}

/// Whether `kind` could ever match, i.e. has at least one template anywhere.
pub fn kind_available(session: &GameSession, kind: CommandKind) -> bool {
    !kind.builtin_templates(&session.world.game.commands).is_empty() || !session.world.custom_commands(kind).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::cellar_session;

    #[test]
    fn normalizes_case_and_spacing() {
        assert_eq!(normalize_input("  Take   THE\tLamp \n"), "take the lamp");
        assert_eq!(normalize_input("   "), "");
    }

    #[test]
    fn builtin_take_matches_with_article() {
        let mut session = cellar_session();
        let cmd = parse_input(&mut session, "take the lamp").unwrap().unwrap();
        assert_eq!(cmd.kind, CommandKind::Take);
        assert!(cmd.original_command);
        assert_eq!(cmd.first(), "lamp");
    }

    #[test]
    fn custom_phrasing_is_flagged() {
        let mut session = cellar_session();
        let cmd = parse_input(&mut session, "unlock chest with key").unwrap().unwrap();
        assert_eq!(cmd.kind, CommandKind::UseWithCombine);
        assert!(!cmd.original_command);
        assert_eq!(cmd.first(), "key");
        assert_eq!(cmd.second(), "chest");
    }

    #[test]
    fn builtin_wins_over_custom_for_same_input() {
        let mut session = cellar_session();
        // "snatch <A>" is a custom take command on the lamp; "take <A>" is built in.
        let cmd = parse_input(&mut session, "take lamp").unwrap().unwrap();
        assert!(cmd.original_command);
        let cmd = parse_input(&mut session, "snatch lamp").unwrap().unwrap();
        assert!(!cmd.original_command);
        assert_eq!(cmd.kind, CommandKind::Take);
    }

    #[test]
    fn use_with_is_preferred_over_use() {
        let mut session = cellar_session();
        let cmd = parse_input(&mut session, "use key with chest").unwrap().unwrap();
        assert_eq!(cmd.kind, CommandKind::UseWithCombine);
        assert_eq!(cmd.first(), "key");
        assert_eq!(cmd.second(), "chest");
    }

    #[test]
    fn unknown_input_matches_nothing() {
        let mut session = cellar_session();
        assert!(parse_input(&mut session, "dance wildly").unwrap().is_none());
        assert!(parse_input(&mut session, "").unwrap().is_none());
    }

    #[test]
    fn object_accepts_checks_own_templates() {
        let cmd = ParsedCommand {
            kind: CommandKind::UseWithCombine,
            original_command: false,
            input: "pry door with key".into(),
            parameters: Vec::new(),
        };
        assert!(!object_accepts(&cmd, &["unlock <B> with <A>".to_string()]).unwrap());
        assert!(object_accepts(&cmd, &["pry <B> with <A>".to_string()]).unwrap());
        assert!(!object_accepts(&cmd, &[]).unwrap());

        let builtin = ParsedCommand {
            original_command: true,
            ..cmd
        };
        assert!(object_accepts(&builtin, &[]).unwrap());
    }

    #[test]
    fn kinds_without_templates_are_unavailable() {
        let mut session = cellar_session();
        session.world.game.commands.help.clear();
        assert!(!kind_available(&session, CommandKind::Help));
        assert!(kind_available(&session, CommandKind::Take));
    }
}
