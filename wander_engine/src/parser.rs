//! Command parsing.
//!
//! Player input is matched against regular expressions generated from the
//! author's command templates:
//!
//! - [`template`] converts a single template to a regex fragment and back.
//! - [`pattern`] joins templates of one command kind into an anchored
//!   alternation and caches the result per kind.
//! - [`dispatch`] runs the input through every kind in a fixed order and
//!   extracts the object parameters.

pub mod dispatch;
pub mod pattern;
pub mod template;

pub use dispatch::{normalize_input, object_accepts, parse_input};
pub use pattern::{CompiledPattern, PatternCache, PatternSet, build_pattern};
pub use template::{TemplateError, normalize_template, to_regex, to_template, validate_template};
