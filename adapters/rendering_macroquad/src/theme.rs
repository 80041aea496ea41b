//! Optional TOML palette and artwork configuration.
//!
//! Every field is optional: an absent file or an empty table falls back to
//! the built-in night palette. `sprite_count` reports how many obstacle
//! artwork slots the installation provides; zero keeps every obstacle on
//! the procedural orb.

use std::{io, path::Path};

use serde::Deserialize;
use spellrun_rendering::Color;
use thiserror::Error;

/// Failure modes when loading a theme file.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The file could not be read.
    #[error("failed to read theme file: {0}")]
    Io(#[from] io::Error),
    /// The file was read but is not a valid theme description.
    #[error("failed to parse theme file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Palette and artwork configuration for the backend.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    background: [u8; 3],
    ground: [u8; 3],
    player: [u8; 3],
    obstacle: [u8; 3],
    letter: [u8; 3],
    accent: [u8; 3],
    text: [u8; 3],
    muted: [u8; 3],
    danger: [u8; 3],
    success: [u8; 3],
    sprite_count: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: [15, 23, 42],
            ground: [22, 101, 52],
            player: [88, 28, 135],
            obstacle: [147, 51, 234],
            letter: [251, 191, 36],
            accent: [249, 115, 22],
            text: [248, 250, 252],
            muted: [156, 163, 175],
            danger: [220, 38, 38],
            success: [16, 185, 129],
            sprite_count: 0,
        }
    }
}

fn color(channels: [u8; 3]) -> Color {
    Color::from_rgb_u8(channels[0], channels[1], channels[2])
}

impl Theme {
    /// Loads a theme description from the provided TOML file.
    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Color the window clears to each frame.
    #[must_use]
    pub fn background(&self) -> Color {
        color(self.background)
    }

    /// Color of the ground strip.
    #[must_use]
    pub fn ground(&self) -> Color {
        color(self.ground)
    }

    /// Color of the player figure.
    #[must_use]
    pub fn player(&self) -> Color {
        color(self.player)
    }

    /// Color of procedural obstacles.
    #[must_use]
    pub fn obstacle(&self) -> Color {
        color(self.obstacle)
    }

    /// Color of letter tokens.
    #[must_use]
    pub fn letter(&self) -> Color {
        color(self.letter)
    }

    /// Highlight color for titles and prompts.
    #[must_use]
    pub fn accent(&self) -> Color {
        color(self.accent)
    }

    /// Primary text color.
    #[must_use]
    pub fn text(&self) -> Color {
        color(self.text)
    }

    /// Secondary text color.
    #[must_use]
    pub fn muted(&self) -> Color {
        color(self.muted)
    }

    /// Color of failure screens and warnings.
    #[must_use]
    pub fn danger(&self) -> Color {
        color(self.danger)
    }

    /// Color of success screens and progress fills.
    #[must_use]
    pub fn success(&self) -> Color {
        color(self.success)
    }

    /// Number of obstacle artwork slots the installation provides.
    #[must_use]
    pub const fn sprite_count(&self) -> u32 {
        self.sprite_count
    }
}

#[cfg(test)]
mod tests {
    use super::{Theme, ThemeError};
    use spellrun_rendering::Color;

    #[test]
    fn an_empty_table_is_the_default_theme() {
        let theme: Theme = toml::from_str("").expect("empty theme should parse");
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn partial_overrides_keep_the_remaining_defaults() {
        let theme: Theme = toml::from_str(
            r#"
            background = [0, 0, 0]
            sprite_count = 4
            "#,
        )
        .expect("partial theme should parse");

        assert_eq!(theme.background(), Color::from_rgb_u8(0, 0, 0));
        assert_eq!(theme.sprite_count(), 4);
        assert_eq!(theme.ground(), Theme::default().ground());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed: Result<Theme, _> = toml::from_str("glitter = true");
        assert!(parsed.is_err());
    }

    #[test]
    fn a_missing_file_surfaces_as_an_io_error() {
        let error = Theme::load(std::path::Path::new("does/not/exist.toml"))
            .expect_err("missing file should fail");
        assert!(matches!(error, ThemeError::Io(_)));
    }
}
