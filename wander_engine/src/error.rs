//! Structural engine errors.
//!
//! These indicate defects in the loaded world or in the engine itself, not
//! ordinary player mistakes (those are reported through the view).

use thiserror::Error;
use uuid::Uuid;

use crate::command::CommandKind;
use crate::parser::template::TemplateError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no {kind} with id {id} exists in the world")]
    UnknownEntity { kind: &'static str, id: Uuid },

    #[error("action graph contains a cycle through '{action}'")]
    CyclicActionGraph { action: String },

    #[error("{kind} pattern matched '{input}' but capture group '{group}' is missing")]
    MissingCaptureGroup {
        kind: CommandKind,
        input: String,
        group: String,
    },

    #[error("{kind} template '{template}' is invalid: {source}")]
    Template {
        kind: CommandKind,
        template: String,
        #[source]
        source: TemplateError,
    },

    #[error("compiled {kind} pattern was rejected by the regex engine: {source}")]
    Pattern {
        kind: CommandKind,
        #[source]
        source: regex::Error,
    },

    #[error("identifier '{identifier}' is not a valid pattern: {source}")]
    InvalidIdentifier {
        identifier: String,
        #[source]
        source: regex::Error,
    },
}
