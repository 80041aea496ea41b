#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Spellrun adapters.
//!
//! Backends present the [`Scene`] populated each frame from world queries
//! and hand raw input edges back through [`FrameInput`]. Everything here is
//! expressed in the fixed 800x600 virtual playfield; scaling to an actual
//! window is a backend concern.

use anyhow::Result as AnyResult;
use glam::Vec2;
use spellrun_core::{ControlMode, GameState, ObstacleVisual, Rect, PLAY_WIDTH};
use std::time::Duration;

/// Story screen copy, one entry per rendered line.
pub const STORY_LINES: [&str; 15] = [
    "In the depths of the Forbidden Forest,",
    "dark curses have been unleashed...",
    "",
    "As a young wizard at Hogwarts,",
    "you must master powerful spells",
    "to survive the enchanted trials.",
    "",
    "Collect magical letters to complete",
    "ancient incantations while dodging",
    "the cursed obstacles in your path.",
    "",
    "Only the bravest can master",
    "the art of spell-casting!",
    "",
    "Will you rise to the challenge?",
];

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by the backend once per frame.
///
/// Every field is an edge: pressed this frame, not held. The cursor is
/// reported in virtual playfield coordinates when it falls inside the
/// letterboxed viewport.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Primary action key edge (space).
    pub confirm: bool,
    /// Dedicated jump key edge (up arrow).
    pub jump: bool,
    /// Switch-to-gesture key edge.
    pub gesture_mode: bool,
    /// Switch-to-keyboard key edge.
    pub keyboard_mode: bool,
    /// Back/escape key edge.
    pub escape: bool,
    /// Cursor position in virtual playfield coordinates.
    pub cursor: Option<Vec2>,
    /// Primary mouse button edge.
    pub clicked: bool,
}

/// A clickable menu region expressed in virtual playfield coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuButton {
    origin: Vec2,
    size: Vec2,
    label: &'static str,
}

impl MenuButton {
    /// Creates a new button from its upper-left corner, size and label.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2, label: &'static str) -> Self {
        Self {
            origin,
            size,
            label,
        }
    }

    /// Upper-left corner of the button.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the button.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Caption drawn on the button.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Reports whether the provided point falls inside the button.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.size.x
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.size.y
    }
}

/// The story button shown on the title screen.
#[must_use]
pub fn story_button() -> MenuButton {
    MenuButton::new(
        Vec2::new(PLAY_WIDTH / 2.0 - 120.0, 480.0),
        Vec2::new(240.0, 55.0),
        "THE PROPHECY",
    )
}

/// The leave-run button shown during play.
#[must_use]
pub fn home_button() -> MenuButton {
    MenuButton::new(
        Vec2::new(PLAY_WIDTH - 180.0, 15.0),
        Vec2::new(165.0, 45.0),
        "GREAT HALL",
    )
}

/// HUD values presented alongside the playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct HudView {
    /// Display name of the active level.
    pub level_name: &'static str,
    /// Flavour line of the active level.
    pub level_description: &'static str,
    /// Score accumulated so far this run.
    pub score: u32,
    /// Letters collected so far, in order.
    pub collected: String,
    /// Target phrase of the active level.
    pub phrase: &'static str,
    /// Input source currently producing jumps.
    pub control_mode: ControlMode,
    /// Zero-based index of the active level.
    pub level_index: u32,
    /// Total number of levels in the run.
    pub level_count: u32,
}

impl Default for HudView {
    fn default() -> Self {
        Self {
            level_name: "",
            level_description: "",
            score: 0,
            collected: String::new(),
            phrase: "",
            control_mode: ControlMode::Gesture,
            level_index: 0,
            level_count: 0,
        }
    }
}

/// Player bounds and airborne flag as the backend should draw them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePlayer {
    /// Player bounds in virtual playfield coordinates.
    pub rect: Rect,
    /// Whether the player is airborne this frame.
    pub jumping: bool,
}

impl Default for ScenePlayer {
    fn default() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            jumping: false,
        }
    }
}

/// A single obstacle as the backend should draw it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObstacle {
    /// Obstacle bounds in virtual playfield coordinates.
    pub rect: Rect,
    /// Artwork slot or procedural fallback.
    pub visual: ObstacleVisual,
}

/// A single letter token as the backend should draw it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLetter {
    /// Letter bounds in virtual playfield coordinates.
    pub rect: Rect,
    /// Character shown on the token.
    pub character: char,
}

/// Complete description of one presentable frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Session screen the backend should present.
    pub state: GameState,
    /// HUD values for the active screen.
    pub hud: HudView,
    /// Player presentation, meaningful during play.
    pub player: ScenePlayer,
    /// Live obstacles in spawn order.
    pub obstacles: Vec<SceneObstacle>,
    /// Live letters in spawn order.
    pub letters: Vec<SceneLetter>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            state: GameState::Welcome,
            hud: HudView::default(),
            player: ScenePlayer::default(),
            obstacles: Vec::new(),
            letters: Vec::new(),
        }
    }
}

/// Caller decision returned from the per-frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameDisposition {
    /// Present the scene and keep looping.
    Continue,
    /// Tear the window down and return from the backend.
    Quit,
}

/// Boot description handed to a backend before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title applied to the backend window.
    pub window_title: String,
    /// Color the backend clears to before drawing the scene.
    pub clear_color: Color,
    /// Scene presented on the first frame.
    pub scene: Scene,
}

/// Rendering backends drive the frame loop and own the window.
pub trait RenderingBackend {
    /// Runs the frame loop until the callback quits or the window closes.
    ///
    /// The callback receives the wall-clock time since the previous frame
    /// and the input edges gathered for this frame, and mutates the scene
    /// in place before it is drawn.
    fn run<F>(self, presentation: Presentation, frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameDisposition + 'static;
}

#[cfg(test)]
mod tests {
    use super::{home_button, story_button, Color, GameState, Scene};
    use glam::Vec2;

    #[test]
    fn buttons_use_half_open_bounds() {
        let button = story_button();
        let origin = button.origin();
        assert!(button.contains(origin));
        assert!(button.contains(origin + Vec2::new(1.0, 1.0)));
        assert!(!button.contains(origin + button.size()));
        assert!(!button.contains(origin + Vec2::new(-1.0, 0.0)));
    }

    #[test]
    fn menu_buttons_do_not_overlap_the_hud_corner() {
        let home = home_button();
        assert!(home.origin().x > 400.0, "home button sits right of centre");
        assert!(!home.contains(Vec2::new(20.0, 20.0)));
    }

    #[test]
    fn default_scene_rests_on_the_title_screen() {
        let scene = Scene::default();
        assert_eq!(scene.state, GameState::Welcome);
        assert!(scene.obstacles.is_empty());
        assert!(scene.letters.is_empty());
    }

    #[test]
    fn lighten_saturates_at_white() {
        let color = Color::from_rgb_u8(10, 20, 30).lighten(1.0);
        assert!((color.red - 1.0).abs() < f32::EPSILON);
        assert!((color.green - 1.0).abs() < f32::EPSILON);
        assert!((color.blue - 1.0).abs() < f32::EPSILON);
    }
}
