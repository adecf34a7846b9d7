//! Styling helpers for terminal output.
//!
//! The world file assigns a foreground/background pair to each
//! [`MessageKind`]; [`Palette`] holds those pairs and [`GameStyle`] applies
//! them (and a few fixed styles) via the `colored` crate.

use colored::{Color, ColoredString, Colorize};
use wander_data::{ColorPairDef, ColorsDef, TerminalColor};

use crate::view::MessageKind;

/// Map a configured color onto a terminal color. `Plain` leaves the terminal default.
pub fn terminal_color(color: TerminalColor) -> Option<Color> {
    match color {
        TerminalColor::Plain => None,
        TerminalColor::Black => Some(Color::Black),
        TerminalColor::Red => Some(Color::Red),
        TerminalColor::Green => Some(Color::Green),
        TerminalColor::Yellow => Some(Color::Yellow),
        TerminalColor::Blue => Some(Color::Blue),
        TerminalColor::Magenta => Some(Color::Magenta),
        TerminalColor::Cyan => Some(Color::Cyan),
        TerminalColor::White => Some(Color::White),
        TerminalColor::BrightBlack => Some(Color::BrightBlack),
        TerminalColor::BrightRed => Some(Color::BrightRed),
        TerminalColor::BrightGreen => Some(Color::BrightGreen),
        TerminalColor::BrightYellow => Some(Color::BrightYellow),
        TerminalColor::BrightBlue => Some(Color::BrightBlue),
        TerminalColor::BrightMagenta => Some(Color::BrightMagenta),
        TerminalColor::BrightCyan => Some(Color::BrightCyan),
        TerminalColor::BrightWhite => Some(Color::BrightWhite),
    }
}

/// Color pairs for the three message kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    colors: ColorsDef,
}

impl Palette {
    pub fn new(colors: ColorsDef) -> Self {
        Self { colors }
    }

    pub fn pair(&self, kind: MessageKind) -> ColorPairDef {
        match kind {
            MessageKind::Success => self.colors.success,
            MessageKind::Neutral => self.colors.neutral,
            MessageKind::Failure => self.colors.failure,
        }
    }
}

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn paint(&self, pair: ColorPairDef) -> ColoredString;
    fn title_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn paint(&self, pair: ColorPairDef) -> ColoredString {
        let mut styled = self.normal();
        if let Some(fg) = terminal_color(pair.foreground) {
            styled = styled.color(fg);
        }
        if let Some(bg) = terminal_color(pair.background) {
            styled = styled.on_color(bg);
        }
        styled
    }
    fn title_style(&self) -> ColoredString {
        self.bright_yellow().bold().underline()
    }
    fn prompt_style(&self) -> ColoredString {
        self.bright_white().bold()
    }
}

impl GameStyle for String {
    fn paint(&self, pair: ColorPairDef) -> ColoredString {
        self.as_str().paint(pair)
    }
    fn title_style(&self) -> ColoredString {
        self.as_str().title_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_maps_to_terminal_default() {
        assert_eq!(terminal_color(TerminalColor::Plain), None);
        assert_eq!(terminal_color(TerminalColor::BrightRed), Some(Color::BrightRed));
    }

    #[test]
    fn palette_selects_pair_per_kind() {
        let palette = Palette::new(ColorsDef::default());
        assert_eq!(palette.pair(MessageKind::Success).foreground, TerminalColor::BrightGreen);
        assert_eq!(palette.pair(MessageKind::Failure).foreground, TerminalColor::BrightRed);
    }

    #[test]
    fn paint_keeps_text() {
        colored::control::set_override(false);
        assert_eq!("hello".paint(ColorPairDef::default()).to_string(), "hello");
    }
}
