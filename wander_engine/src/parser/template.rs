//! Template <-> regex conversion.
//!
//! A template is a lowercase phrase made of literal words, optional groups in
//! square brackets and the parameter markers `<A>` and `<B>`:
//!
//! ```text
//! take [the ]<A>        ->  take (?:the )?(?<o0>\w+)
//! use <A> with <B>      ->  use (?<o0>\w+) with (?<o1>\w+)
//! ```
//!
//! Capture groups are named positionally. When several templates are joined
//! into one alternation each template gets its own base index, so `<A>` of the
//! second arity-2 template becomes `o2` and its `<B>` becomes `o3`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use thiserror::Error;

lazy_static! {
    static ref CAPTURE_GROUP: Regex = Regex::new(r"\(\?<o(\d+)>\\w\+\)").expect("capture group pattern is valid");
}

/// Authoring errors in a command template. Each variant names the rule that was broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,
    #[error("template starts or ends with a space")]
    OuterSpace,
    #[error("template contains two consecutive spaces at position {0}")]
    DoubleSpace(usize),
    #[error("character '{ch}' at position {position} is not allowed (use a-z, space, [ ], <A> or <B>)")]
    InvalidCharacter { ch: char, position: usize },
    #[error("bracket at position {0} is not balanced")]
    UnbalancedBracket(usize),
    #[error("optional groups may not be nested (position {0})")]
    NestedBracket(usize),
    #[error("optional group at position {0} contains no letters")]
    EmptyBracket(usize),
    #[error("parameter marker inside optional group at position {0}")]
    MarkerInBracket(usize),
    #[error("template needs at least one literal word outside of optional groups")]
    NoLiteralWord,
    #[error("expected {expected} occurrence(s) of <{marker}>, found {found}")]
    MarkerCount { marker: char, expected: usize, found: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    Open,
    Close,
    Param(Marker),
}

/// Lowercase a raw template while keeping the parameter markers uppercase.
pub fn normalize_template(raw: &str) -> String {
    raw.to_lowercase().replace("<a>", "<A>").replace("<b>", "<B>")
}

/// Check a template against the authoring rules for a command of the given arity.
///
/// # Errors
/// Returns the first rule the template breaks.
pub fn validate_template(template: &str, arity: usize) -> Result<(), TemplateError> {
    tokenize_checked(template, arity).map(|_| ())
}

/// Convert a template into a regex fragment (not anchored) with group base 0.
///
/// # Errors
/// Returns a [`TemplateError`] if the template is not valid for `arity`.
pub fn to_regex(template: &str, arity: usize) -> Result<String, TemplateError> {
    compile_template(template, arity, 0).map(|(body, _)| body)
}

/// Convert a template into a regex fragment whose capture groups start at `base`.
///
/// Returns the fragment and the group names in `<A>`, `<B>` order.
///
/// # Errors
/// Returns a [`TemplateError`] if the template is not valid for `arity`.
pub fn compile_template(template: &str, arity: usize, base: usize) -> Result<(String, Vec<String>), TemplateError> {
    let tokens = tokenize_checked(template, arity)?;
    let mut body = String::with_capacity(template.len() * 2);
    for (_, token) in tokens {
        match token {
            Token::Literal(ch) => body.push(ch),
            Token::Open => body.push_str("(?:"),
            Token::Close => body.push_str(")?"),
            Token::Param(Marker::A) => body.push_str(&format!(r"(?<o{base}>\w+)")),
            Token::Param(Marker::B) => body.push_str(&format!(r"(?<o{}>\w+)", base + 1)),
        }
    }
    let groups = (0..arity).map(|offset| format!("o{}", base + offset)).collect();
    Ok((body, groups))
}

/// Convert a regex fragment produced by [`to_regex`] or [`compile_template`] back into its template.
///
/// The lowest group index in the fragment is read as `<A>`, the next one as `<B>`.
pub fn to_template(pattern: &str) -> String {
    let base = CAPTURE_GROUP
        .captures_iter(pattern)
        .filter_map(|caps| caps[1].parse::<usize>().ok())
        .min()
        .unwrap_or(0);
    let with_markers = CAPTURE_GROUP.replace_all(pattern, |caps: &Captures| {
        let index = caps[1].parse::<usize>().unwrap_or(base);
        if index == base { "<A>" } else { "<B>" }
    });
    with_markers.replace("(?:", "[").replace(")?", "]")
}

/// Tokens paired with the character position they start at.
type Tokens = Vec<(usize, Token)>;

fn tokenize_checked(template: &str, arity: usize) -> Result<Tokens, TemplateError> {
    if template.is_empty() {
        return Err(TemplateError::Empty);
    }
    if template.starts_with(' ') || template.ends_with(' ') {
        return Err(TemplateError::OuterSpace);
    }
    if let Some(position) = template.find("  ") {
        return Err(TemplateError::DoubleSpace(position));
    }

    let tokens = tokenize(template)?;
    check_brackets(&tokens)?;
    check_markers(&tokens, arity)?;
    Ok(tokens)
}

fn tokenize(template: &str) -> Result<Tokens, TemplateError> {
    let chars: Vec<char> = template.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let token = match chars[i] {
            '<' => {
                let marker = match (chars.get(i + 1), chars.get(i + 2)) {
                    (Some('A'), Some('>')) => Marker::A,
                    (Some('B'), Some('>')) => Marker::B,
                    _ => return Err(TemplateError::InvalidCharacter { ch: '<', position: i }),
                };
                tokens.push((i, Token::Param(marker)));
                i += 3;
                continue;
            },
            '[' => Token::Open,
            ']' => Token::Close,
            ch if ch == ' ' || ch.is_ascii_lowercase() => Token::Literal(ch),
            ch => return Err(TemplateError::InvalidCharacter { ch, position: i }),
        };
        tokens.push((i, token));
        i += 1;
    }
    Ok(tokens)
}

fn check_brackets(tokens: &[(usize, Token)]) -> Result<(), TemplateError> {
    let mut open_at: Option<usize> = None;
    let mut letters_inside = false;
    let mut literal_outside = false;

    for &(position, token) in tokens {
        match (token, open_at) {
            (Token::Open, Some(_)) => return Err(TemplateError::NestedBracket(position)),
            (Token::Open, None) => {
                open_at = Some(position);
                letters_inside = false;
            },
            (Token::Close, None) => return Err(TemplateError::UnbalancedBracket(position)),
            (Token::Close, Some(start)) => {
                if !letters_inside {
                    return Err(TemplateError::EmptyBracket(start));
                }
                open_at = None;
            },
            (Token::Param(_), Some(_)) => return Err(TemplateError::MarkerInBracket(position)),
            (Token::Param(_), None) => {},
            (Token::Literal(ch), inside) => {
                if ch.is_ascii_lowercase() {
                    if inside.is_some() {
                        letters_inside = true;
                    } else {
                        literal_outside = true;
                    }
                }
            },
        }
    }

    if let Some(start) = open_at {
        return Err(TemplateError::UnbalancedBracket(start));
    }
    if !literal_outside {
        return Err(TemplateError::NoLiteralWord);
    }
    Ok(())
}

fn check_markers(tokens: &[(usize, Token)], arity: usize) -> Result<(), TemplateError> {
    let count = |marker: Marker| tokens.iter().filter(|(_, t)| *t == Token::Param(marker)).count();
    for (marker, symbol, expected) in [
        (Marker::A, 'A', usize::from(arity >= 1)),
        (Marker::B, 'B', usize::from(arity >= 2)),
    ] {
        let found = count(marker);
        if found != expected {
            return Err(TemplateError::MarkerCount {
                marker: symbol,
                expected,
                found,
            });
        }
    }
    Ok(())
}
