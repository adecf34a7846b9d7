//! Terminal input handling for the Wander REPL.
//!
//! Wraps rustyline configuration and completion tailored to the command
//! phrasings of the loaded world, with a plain stdin fallback and a scripted
//! source for tests and piped play.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::command::DISPATCH_ORDER;
use crate::world::World;

/// Outcome of reading a line from the REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

/// Source of player input lines.
pub trait LineInput {
    /// Show `prompt` and wait for the next line.
    ///
    /// # Errors
    /// Unrecoverable input failures.
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent>;
}

lazy_static! {
    static ref EXCLUDED_TERMS: Vec<&'static str> = vec!["", "a", "an", "and", "at", "on", "the", "to", "with"];
}

type ReplEditor = rustyline::Editor<WanderHelper, DefaultHistory>;

#[derive(Default)]
struct WanderHelper {
    terms: Vec<String>,
}

impl Helper for WanderHelper {}

impl Completer for WanderHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, prefix) = current_prefix(line, pos);
        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }
        let lower = prefix.to_lowercase();
        let pairs = self
            .terms
            .iter()
            .filter(|term| term.starts_with(&lower))
            .map(|term| Pair {
                display: term.clone(),
                replacement: term.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for WanderHelper {
    type Hint = String;
}

impl Highlighter for WanderHelper {}

impl Validator for WanderHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}

fn current_prefix(line: &str, pos: usize) -> (usize, String) {
    let slice = &line[..pos];
    let trimmed = slice.trim_start_matches(char::is_whitespace);
    let start = pos - trimmed.len();
    (start, trimmed.to_string())
}

/// Completion terms: the literal lead-in of every built-in and custom template.
///
/// `"look at [the ]<A>"` contributes `"look at"`.
pub fn command_terms(world: &World) -> Vec<String> {
    let mut terms = Vec::new();
    for kind in DISPATCH_ORDER {
        let custom = world.custom_commands(kind);
        let templates = kind.builtin_templates(&world.game.commands).iter().chain(custom.iter());
        for template in templates {
            if let Some(term) = lead_in(template)
                && should_include(&term)
            {
                terms.push(term);
            }
        }
    }
    terms.sort_unstable();
    terms.dedup();
    terms
}

fn lead_in(template: &str) -> Option<String> {
    let end = template.find(['[', '<']).unwrap_or(template.len());
    let term = template[..end].trim();
    if term.is_empty() { None } else { Some(term.to_string()) }
}

fn should_include(term: &str) -> bool {
    !EXCLUDED_TERMS.contains(&term.trim())
}

/// Helper responsible for managing the interactive input backend.
///
/// Prefers `rustyline` when an interactive terminal is available, falling back to
/// a basic stdin reader otherwise.
pub struct InputManager {
    backend: Backend,
}

impl InputManager {
    pub fn new(terms: Vec<String>) -> Self {
        let backend = if io::stdin().is_terminal() {
            match RustylineInput::new(terms) {
                Ok(editor) => {
                    info!("using rustyline-backed REPL input");
                    Backend::Rustyline(Box::new(editor))
                },
                Err(err) => {
                    warn!("failed to initialize rustyline ({err}), falling back to basic stdin");
                    Backend::plain()
                },
            }
        } else {
            info!("stdin is not a TTY; using basic input mode");
            Backend::plain()
        };

        Self { backend }
    }
}

impl LineInput for InputManager {
    /// Read a line from the current backend. If the interactive backend reports an
    /// unrecoverable error, switch to the plain stdin backend and retry once.
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.backend.read_line(prompt) {
            Ok(event) => Ok(event),
            Err(err) => {
                if self.backend.is_rustyline() {
                    warn!("rustyline input failed: {err} -- switching to basic stdin");
                    self.backend = Backend::plain();
                    self.backend.read_line(prompt)
                } else {
                    Err(err)
                }
            },
        }
    }
}

enum Backend {
    Rustyline(Box<RustylineInput>),
    Plain(StdinInput),
}

impl Backend {
    fn plain() -> Self {
        Backend::Plain(StdinInput::default())
    }

    fn is_rustyline(&self) -> bool {
        matches!(self, Backend::Rustyline(_))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self {
            Backend::Rustyline(editor) => editor.read_line(prompt),
            Backend::Plain(stdin) => stdin.read_line(prompt),
        }
    }
}

struct RustylineInput {
    editor: ReplEditor,
    history_path: Option<PathBuf>,
}

impl RustylineInput {
    fn new(terms: Vec<String>) -> io::Result<Self> {
        let mut editor = rustyline::Editor::<WanderHelper, _>::new().map_err(map_io_err)?;
        editor.set_helper(Some(WanderHelper { terms }));
        let history_path = history_file_path();

        if let Some(path) = history_path.as_ref() {
            if let Some(dir) = path.parent()
                && let Err(err) = fs::create_dir_all(dir)
            {
                warn!("failed to create history directory {}: {err}", dir.display());
            }

            if let Err(err) = editor.load_history(path) {
                match err {
                    ReadlineError::Io(ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                        info!("no prior history found at {}, starting fresh", path.display());
                    },
                    other => {
                        warn!("failed to load history from {}: {other}", path.display());
                    },
                }
            }
        }

        Ok(Self { editor, history_path })
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        warn!("failed to append to history: {err}");
                    }
                    if let Some(path) = self.history_path.as_ref()
                        && let Err(err) = self.editor.save_history(path)
                    {
                        warn!("failed to persist history to {}: {err}", path.display());
                    }
                }
                Ok(InputEvent::Line(line))
            },
            Err(err) => convert_readline_error(err),
        }
    }
}

#[derive(Default)]
struct StdinInput {
    buffer: String,
}

impl StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        print!("{prompt}");
        io::stdout().flush()?;

        self.buffer.clear();
        let bytes = io::stdin().read_line(&mut self.buffer)?;
        if bytes == 0 {
            return Ok(InputEvent::Eof);
        }

        if self.buffer.ends_with('\n') {
            self.buffer.pop();
            if self.buffer.ends_with('\r') {
                self.buffer.pop();
            }
        }

        Ok(InputEvent::Line(self.buffer.clone()))
    }
}

/// Replays a fixed list of lines, then reports end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineInput for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front().map_or(InputEvent::Eof, InputEvent::Line))
    }
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        ReadlineError::Io(io_err) => Err(io_err),
        other => Err(io::Error::other(other)),
    }
}

fn map_io_err(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(io_err) => io_err,
        other => io::Error::other(other),
    }
}

fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| build_history_path(&base))
}

fn build_history_path(base: &Path) -> PathBuf {
    let mut path = base.to_path_buf();
    path.push("wander_engine");
    path.push("history.txt");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::cellar_world;

    #[test]
    fn converts_readline_ctrl_c_to_interrupt() {
        let result = convert_readline_error(ReadlineError::Interrupted).unwrap();
        assert_eq!(result, InputEvent::Interrupted);
    }

    #[test]
    fn history_path_appends_components() {
        let base = PathBuf::from("/tmp/wander-test");
        let path = build_history_path(&base);
        assert!(path.ends_with(Path::new("wander_engine/history.txt")));
    }

    #[test]
    fn terms_come_from_builtin_and_custom_templates() {
        let terms = command_terms(&cellar_world());
        assert!(terms.iter().any(|t| t == "look at"));
        assert!(terms.iter().any(|t| t == "inventory"));
        assert!(terms.iter().any(|t| t == "snatch"));
        assert!(terms.iter().any(|t| t == "stroll through"));
        // "unlock <B> with <A>" has "unlock" as lead-in
        assert!(terms.iter().any(|t| t == "unlock"));
        assert!(!terms.iter().any(|t| t == "the"));
    }

    #[test]
    fn scripted_input_ends_with_eof() {
        let mut input = ScriptedInput::new(["look"]);
        assert_eq!(input.read_line("> ").unwrap(), InputEvent::Line("look".into()));
        assert_eq!(input.read_line("> ").unwrap(), InputEvent::Eof);
        assert_eq!(input.prompts().len(), 2);
    }
}
