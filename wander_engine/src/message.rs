//! Placeholder substitution for player-facing texts.
//!
//! Default texts and authored texts may mention the objects a command is
//! about. `<identifier>` is what the player typed, `<name>` the object's
//! display name; the `2` variants refer to the second object of a use-with
//! command. A leading capital (`<Name>`) capitalizes the inserted value.

/// The values one object contributes to a message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Subject<'a> {
    pub identifier: &'a str,
    pub name: &'a str,
}

impl<'a> Subject<'a> {
    pub fn new(identifier: &'a str, name: &'a str) -> Self {
        Self { identifier, name }
    }

    /// A subject the player named but that did not resolve.
    pub fn unresolved(identifier: &'a str) -> Self {
        Self { identifier, name: identifier }
    }
}

/// Uppercase the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace the placeholders of both subjects in `text`.
///
/// Placeholders of a missing subject are left as they are.
pub fn fill_placeholders(text: &str, first: Option<Subject<'_>>, second: Option<Subject<'_>>) -> String {
    let mut filled = text.to_string();
    if let Some(subject) = second {
        filled = substitute(&filled, "2", subject);
    }
    if let Some(subject) = first {
        filled = substitute(&filled, "", subject);
    }
    filled
}

fn substitute(text: &str, suffix: &str, subject: Subject<'_>) -> String {
    text.replace(&format!("<identifier{suffix}>"), subject.identifier)
        .replace(&format!("<Identifier{suffix}>"), &capitalize(subject.identifier))
        .replace(&format!("<name{suffix}>"), subject.name)
        .replace(&format!("<Name{suffix}>"), &capitalize(subject.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_both_subjects_independently() {
        let text = "You can't use the <name> with the <name2>.";
        let filled = fill_placeholders(
            text,
            Some(Subject::new("key", "iron key")),
            Some(Subject::new("crate", "wooden crate")),
        );
        assert_eq!(filled, "You can't use the iron key with the wooden crate.");
    }

    #[test]
    fn capitalized_markers_capitalize() {
        let filled = fill_placeholders(
            "<Name> nods. <Identifier2>?",
            Some(Subject::new("guard", "old guard")),
            Some(Subject::unresolved("ghost")),
        );
        assert_eq!(filled, "Old guard nods. Ghost?");
    }

    #[test]
    fn missing_subject_leaves_markers() {
        assert_eq!(
            fill_placeholders("There is no <identifier> here.", None, None),
            "There is no <identifier> here."
        );
        assert_eq!(capitalize(""), "");
    }
}
