//! Named color palettes
//!
//! Every piece of drawing code takes its colors from a `Theme` instead of
//! hard-coding them.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Palette selection stored in the config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

/// Named colors used across the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub background: Color,
}

impl Theme {
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self {
                primary: Color::Cyan,
                accent: Color::Magenta,
                text: Color::White,
                muted: Color::DarkGray,
                border: Color::Gray,
                success: Color::Green,
                warning: Color::Yellow,
                danger: Color::Red,
                background: Color::Reset,
            },
            ThemeName::Light => Self {
                primary: Color::Blue,
                accent: Color::Magenta,
                text: Color::Black,
                muted: Color::Gray,
                border: Color::DarkGray,
                success: Color::Green,
                warning: Color::Rgb(180, 120, 0),
                danger: Color::Red,
                background: Color::Reset,
            },
        }
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_text(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::named(ThemeName::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_name_round_trips_lowercase() {
        let name: ThemeName = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(name, ThemeName::Light);
        assert_eq!(serde_json::to_string(&ThemeName::Dark).unwrap(), "\"dark\"");
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Theme::named(ThemeName::Dark), Theme::named(ThemeName::Light));
        assert_eq!(Theme::default(), Theme::named(ThemeName::Dark));
    }
}
