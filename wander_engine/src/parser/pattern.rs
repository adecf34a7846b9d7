//! Compiled command patterns and the per-kind pattern cache.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use log::debug;
use regex::Regex;

use crate::command::{CommandKind, Parameter};
use crate::error::EngineError;
use crate::parser::template::compile_template;

/// One template inside a compiled alternation.
#[derive(Debug, Clone)]
struct Alternative {
    template: String,
    groups: Vec<String>,
}

/// An anchored alternation built from all templates of one command kind.
///
/// Immutable once built; the [`PatternCache`] replaces it when its source changes.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    kind: CommandKind,
    regex: Regex,
    alternatives: Vec<Alternative>,
}

impl CompiledPattern {
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Match normalized input and extract the parameters of the alternative that matched.
    ///
    /// Returns `Ok(None)` if the input does not match.
    ///
    /// # Errors
    /// [`EngineError::MissingCaptureGroup`] if the regex matched but a group the
    /// alternative declares did not participate. That can only happen if the
    /// pattern was built incorrectly.
    pub fn match_input(&self, input: &str) -> Result<Option<Vec<Parameter>>, EngineError> {
        let Some(caps) = self.regex.captures(input) else {
            return Ok(None);
        };
        if self.kind.arity() == 0 {
            return Ok(Some(Vec::new()));
        }

        // Exactly one alternative participates; its first group tells us which.
        let alternative = self
            .alternatives
            .iter()
            .find(|alt| alt.groups.first().is_some_and(|group| caps.name(group).is_some()))
            .ok_or_else(|| EngineError::MissingCaptureGroup {
                kind: self.kind,
                input: input.to_string(),
                group: "o?".to_string(),
            })?;
        debug!("'{input}' matched {} template '{}'", self.kind, alternative.template);

        let mut params = Vec::with_capacity(alternative.groups.len());
        for group in &alternative.groups {
            let value = caps.name(group).ok_or_else(|| EngineError::MissingCaptureGroup {
                kind: self.kind,
                input: input.to_string(),
                group: group.clone(),
            })?;
            params.push(Parameter {
                group: group.clone(),
                value: value.as_str().to_string(),
            });
        }
        Ok(Some(params))
    }
}

/// Build one anchored pattern `^(?:t0|t1|...)$` from a list of templates.
///
/// Returns `Ok(None)` for an empty list.
///
/// # Errors
/// Returns an error if a template is invalid for the kind's arity or the
/// resulting regex is rejected.
pub fn build_pattern<S: AsRef<str>>(
    kind: CommandKind,
    templates: impl IntoIterator<Item = S>,
) -> Result<Option<CompiledPattern>, EngineError> {
    let arity = kind.arity();
    let mut bodies = Vec::new();
    let mut alternatives = Vec::new();

    for (index, template) in templates.into_iter().enumerate() {
        let template = template.as_ref();
        let (body, groups) =
            compile_template(template, arity, index * arity).map_err(|source| EngineError::Template {
                kind,
                template: template.to_string(),
                source,
            })?;
        bodies.push(body);
        alternatives.push(Alternative {
            template: template.to_string(),
            groups,
        });
    }

    if bodies.is_empty() {
        return Ok(None);
    }

    let regex = Regex::new(&format!("^(?:{})$", bodies.join("|"))).map_err(|source| EngineError::Pattern { kind, source })?;
    Ok(Some(CompiledPattern {
        kind,
        regex,
        alternatives,
    }))
}

/// Built-in and custom patterns of one command kind.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub builtin: Option<CompiledPattern>,
    pub custom: Option<CompiledPattern>,
}

#[derive(Debug, Clone)]
struct CachedPatterns {
    builtin_source: Vec<String>,
    custom_source: BTreeSet<String>,
    set: PatternSet,
}

impl CachedPatterns {
    fn build(kind: CommandKind, builtin: &[String], custom: BTreeSet<String>) -> Result<Self, EngineError> {
        debug!("building {kind} patterns ({} built-in, {} custom)", builtin.len(), custom.len());
        let set = PatternSet {
            builtin: build_pattern(kind, builtin)?,
            custom: build_pattern(kind, &custom)?,
        };
        Ok(Self {
            builtin_source: builtin.to_vec(),
            custom_source: custom,
            set,
        })
    }

    fn is_built_from(&self, builtin: &[String], custom: &BTreeSet<String>) -> bool {
        self.builtin_source == builtin && &self.custom_source == custom
    }
}

/// Memoizes compiled patterns per command kind.
///
/// An entry is rebuilt whenever the built-in list or the custom command
/// snapshot differs from the one it was built from.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    entries: HashMap<CommandKind, CachedPatterns>,
    builds: usize,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns for `kind`, rebuilt if the sources changed since the last call.
    ///
    /// # Errors
    /// Returns an error if a template cannot be compiled.
    pub fn patterns(
        &mut self,
        kind: CommandKind,
        builtin: &[String],
        custom: BTreeSet<String>,
    ) -> Result<&PatternSet, EngineError> {
        let cached = match self.entries.entry(kind) {
            Entry::Occupied(entry) => {
                let cached = entry.into_mut();
                if !cached.is_built_from(builtin, &custom) {
                    *cached = CachedPatterns::build(kind, builtin, custom)?;
                    self.builds += 1;
                }
                cached
            },
            Entry::Vacant(entry) => {
                self.builds += 1;
                entry.insert(CachedPatterns::build(kind, builtin, custom)?)
            },
        };
        Ok(&cached.set)
    }

    /// Number of pattern sets compiled so far.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn empty_template_list_builds_nothing() {
        let none: [&str; 0] = [];
        assert!(build_pattern(CommandKind::Take, none).unwrap().is_none());
    }

    #[test]
    fn alternation_is_anchored_and_indexed() {
        let pattern = build_pattern(CommandKind::UseWithCombine, ["use <A> with <B>", "combine <A> and <B>"])
            .unwrap()
            .unwrap();
        assert_eq!(
            pattern.as_str(),
            r"^(?:use (?<o0>\w+) with (?<o1>\w+)|combine (?<o2>\w+) and (?<o3>\w+))$"
        );
        assert!(!pattern.is_match("please use key with door"));
    }

    #[test]
    fn take_with_and_without_article() {
        let pattern = build_pattern(CommandKind::Take, ["take [the ]<A>"]).unwrap().unwrap();
        for input in ["take the lamp", "take lamp"] {
            let params = pattern.match_input(input).unwrap().unwrap();
            assert_eq!(params.len(), 1);
            assert_eq!(params[0].value, "lamp");
            assert_eq!(params[0].group, "o0");
        }
        assert!(pattern.match_input("take the").unwrap().is_some_and(|p| p[0].value == "the"));
    }

    #[test]
    fn parameters_follow_marker_identity_not_position() {
        let pattern = build_pattern(CommandKind::UseWithCombine, ["use <A> with <B>", "unlock <B> with <A>"])
            .unwrap()
            .unwrap();
        let params = pattern.match_input("unlock door with key").unwrap().unwrap();
        assert_eq!(params[0].value, "key");
        assert_eq!(params[0].group, "o2");
        assert_eq!(params[1].value, "door");
        assert_eq!(params[1].group, "o3");
    }

    #[test]
    fn first_alternative_wins() {
        let pattern = build_pattern(CommandKind::Move, ["go <A>", "go to <A>"]).unwrap().unwrap();
        let params = pattern.match_input("go north").unwrap().unwrap();
        assert_eq!(params[0].value, "north");
        let params = pattern.match_input("go to north").unwrap().unwrap();
        assert_eq!(params[0].group, "o1");
    }

    #[test]
    fn zero_arity_yields_no_parameters() {
        let pattern = build_pattern(CommandKind::Exit, ["exit", "quit"]).unwrap().unwrap();
        assert_eq!(pattern.match_input("quit").unwrap(), Some(Vec::new()));
        assert_eq!(pattern.match_input("quit now").unwrap(), None);
    }

    #[test]
    fn invalid_template_names_kind_and_template() {
        let err = build_pattern(CommandKind::Take, ["take"]).unwrap_err();
        assert!(err.to_string().contains("'take'"));
    }

    #[test]
    fn cache_rebuilds_only_when_sources_change() {
        let mut cache = PatternCache::new();
        let builtin = templates(&["use [the ]<A>"]);
        let mut custom = BTreeSet::new();
        custom.insert("press <A>".to_string());

        cache.patterns(CommandKind::Use, &builtin, custom.clone()).unwrap();
        cache.patterns(CommandKind::Use, &builtin, custom.clone()).unwrap();
        assert_eq!(cache.builds(), 1);

        custom.insert("push <A>".to_string());
        let set = cache.patterns(CommandKind::Use, &builtin, custom).unwrap();
        assert!(set.custom.as_ref().is_some_and(|p| p.is_match("push button")));
        assert_eq!(cache.builds(), 2);
    }
}
