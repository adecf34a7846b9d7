//! View module.
//!
//! Handlers never print directly. They push [`ViewItem`]s onto the [`View`],
//! which writes them to a [`LineOutput`] at the end of the command (or before
//! the engine waits for input inside a conversation).

pub mod view_item;

pub use view_item::ViewItem;

use std::cell::RefCell;
use std::rc::Rc;

use colored::Colorize;
use textwrap::{fill, termwidth};

use crate::style::{GameStyle, Palette};

/// Message categories, each with its own color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Success,
    Neutral,
    Failure,
}

/// Destination for rendered lines.
pub trait LineOutput {
    fn print_line(&mut self, kind: MessageKind, text: &str);
}

/// Writes colored, wrapped lines to stdout.
pub struct ConsoleOutput {
    palette: Palette,
}

impl ConsoleOutput {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl LineOutput for ConsoleOutput {
    fn print_line(&mut self, kind: MessageKind, text: &str) {
        // re-check terminal width in case it's been resized
        let wrapped = fill(text, termwidth());
        for line in wrapped.lines() {
            println!("{}", line.paint(self.palette.pair(kind)));
        }
    }
}

/// Collects lines in memory. Used by tests and scripted sessions.
///
/// Clones share the collected lines, so a handle kept outside a terminal
/// sees everything written through it.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    lines: Rc<RefCell<Vec<(MessageKind, String)>>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(MessageKind, String)> {
        self.lines.borrow().clone()
    }

    /// All collected text joined by newlines.
    pub fn text(&self) -> String {
        self.lines
            .borrow()
            .iter()
            .map(|(_, line)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|(_, line)| line.contains(needle))
    }

    /// Kind of the first line containing `needle`.
    pub fn kind_of(&self, needle: &str) -> Option<MessageKind> {
        self.lines
            .borrow()
            .iter()
            .find(|(_, line)| line.contains(needle))
            .map(|(kind, _)| *kind)
    }
}

impl LineOutput for MemoryOutput {
    fn print_line(&mut self, kind: MessageKind, text: &str) {
        self.lines.borrow_mut().push((kind, text.to_string()));
    }
}

/// View aggregates the messages of one command and writes them out in order.
#[derive(Debug, Clone, Default)]
pub struct View {
    pub items: Vec<ViewItem>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if any pending item renders a line containing `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.items.iter().any(|item| item.lines().iter().any(|line| line.contains(needle)))
    }

    /// Write all pending items to `output` and clear the view.
    pub fn flush(&mut self, output: &mut dyn LineOutput) {
        for item in self.items.drain(..) {
            let kind = item.kind();
            for line in item.lines() {
                output.print_line(kind, &line);
            }
        }
    }
}

/// Banner printed once when the game starts.
pub fn title_banner(title: &str, author: &str) -> String {
    let mut banner = title.title_style().to_string();
    if !author.is_empty() {
        banner.push_str(&format!("\n{}", format!("by {author}").italic()));
    }
    banner
}
