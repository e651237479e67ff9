//! src/view/theme.rs
//! ============================================================================
//! # Catppuccin Palettes
//!
//! Dark maps to Catppuccin Mocha, light to Catppuccin Latte. Colors are from
//! the official Catppuccin theme specification:
//! https://github.com/catppuccin/catppuccin

use ratatui::style::{Color, Modifier, Style};

use crate::model::preferences::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub current_line: Color,
    pub foreground: Color,
    pub comment: Color,
    pub cyan: Color,
    pub green: Color,
    pub orange: Color,
    pub pink: Color,
    pub purple: Color,
    pub red: Color,
    pub yellow: Color,
}

pub const DARK: Palette = Palette {
    background: Color::Rgb(30, 30, 46),    // Base
    current_line: Color::Rgb(69, 71, 90),  // Surface1
    foreground: Color::Rgb(205, 214, 244), // Text
    comment: Color::Rgb(127, 132, 156),    // Overlay1
    cyan: Color::Rgb(137, 220, 235),       // Sky
    green: Color::Rgb(166, 227, 161),
    orange: Color::Rgb(250, 179, 135), // Peach
    pink: Color::Rgb(245, 194, 231),
    purple: Color::Rgb(203, 166, 247), // Mauve
    red: Color::Rgb(243, 139, 168),
    yellow: Color::Rgb(249, 226, 175),
};

pub const LIGHT: Palette = Palette {
    background: Color::Rgb(239, 241, 245),  // Base
    current_line: Color::Rgb(188, 192, 204), // Surface1
    foreground: Color::Rgb(76, 79, 105),    // Text
    comment: Color::Rgb(140, 143, 161),     // Overlay1
    cyan: Color::Rgb(4, 165, 229),          // Sky
    green: Color::Rgb(64, 160, 43),
    orange: Color::Rgb(254, 100, 11), // Peach
    pink: Color::Rgb(234, 118, 203),
    purple: Color::Rgb(136, 57, 239), // Mauve
    red: Color::Rgb(210, 15, 57),
    yellow: Color::Rgb(223, 142, 29),
};

pub const fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    }
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.foreground)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.comment)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.purple).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.comment)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.current_line)
            .add_modifier(Modifier::BOLD)
    }

    /// Badge color per resource type; unknown kinds share one color.
    pub fn badge(&self, kind: &str) -> Color {
        match kind.to_ascii_lowercase().as_str() {
            "notes" => self.green,
            "pyq" => self.orange,
            "video" => self.red,
            "book" => self.cyan,
            _ => self.purple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_have_distinct_backgrounds() {
        assert_ne!(palette(Theme::Light).background, palette(Theme::Dark).background);
    }

    #[test]
    fn badge_colors_ignore_case() {
        assert_eq!(DARK.badge("PYQ"), DARK.badge("pyq"));
        assert_eq!(DARK.badge("Lab"), DARK.purple);
    }
}
