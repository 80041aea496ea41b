#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Spellrun.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.
//!
//! The backend letterboxes the fixed 800x600 virtual playfield into the
//! window and draws everything procedurally; obstacle artwork slots render
//! as tinted polygon markers keyed by slot index.

mod theme;

pub use theme::{Theme, ThemeError};

use anyhow::Result as AnyResult;
use glam::Vec2;
use macroquad::{
    color::Color as MacroquadColor,
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
};
use spellrun_core::{ControlMode, GameState, ObstacleVisual, Rect, PLAY_HEIGHT, PLAY_WIDTH};
use spellrun_rendering::{
    home_button, story_button, Color, FrameDisposition, FrameInput, MenuButton, Presentation,
    RenderingBackend, Scene, STORY_LINES,
};
use std::time::Duration;

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    theme: Theme,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            theme: Theme::default(),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the
    /// platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the
    /// display refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame rate metrics once per
    /// second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Applies a palette and artwork configuration.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// Letterboxed mapping between the virtual playfield and the window.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    scale: f32,
    offset: Vec2,
}

impl Viewport {
    fn new(screen_width: f32, screen_height: f32) -> Self {
        let scale = (screen_width / PLAY_WIDTH)
            .min(screen_height / PLAY_HEIGHT)
            .max(0.0);
        let offset = Vec2::new(
            (screen_width - PLAY_WIDTH * scale) * 0.5,
            (screen_height - PLAY_HEIGHT * scale) * 0.5,
        );
        Self { scale, offset }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    fn to_virtual(&self, point: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let virtual_point = (point - self.offset) / self.scale;
        let inside = virtual_point.x >= 0.0
            && virtual_point.x < PLAY_WIDTH
            && virtual_point.y >= 0.0
            && virtual_point.y < PLAY_HEIGHT;
        inside.then_some(virtual_point)
    }

    fn length(&self, length: f32) -> f32 {
        length * self.scale
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once one
    /// second has elapsed.
    fn record(&mut self, dt: Duration) -> Option<f32> {
        self.elapsed += dt;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }
        let seconds = self.elapsed.as_secs_f32();
        if seconds <= f32::EPSILON {
            self.elapsed = Duration::ZERO;
            self.frames = 0;
            return None;
        }
        let per_second = self.frames as f32 / seconds;
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

fn to_macroquad_color(color: Color) -> MacroquadColor {
    MacroquadColor::new(color.red, color.green, color.blue, color.alpha)
}

fn gather_frame_input(viewport: &Viewport) -> FrameInput {
    let (mouse_x, mouse_y) = mouse_position();
    FrameInput {
        confirm: is_key_pressed(KeyCode::Space),
        jump: is_key_pressed(KeyCode::Up),
        gesture_mode: is_key_pressed(KeyCode::H),
        keyboard_mode: is_key_pressed(KeyCode::K),
        escape: is_key_pressed(KeyCode::Escape),
        cursor: viewport.to_virtual(Vec2::new(mouse_x, mouse_y)),
        clicked: is_mouse_button_pressed(MouseButton::Left),
    }
}

fn fill_rect(viewport: &Viewport, x: f32, y: f32, width: f32, height: f32, color: Color) {
    let origin = viewport.to_screen(Vec2::new(x, y));
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        viewport.length(width),
        viewport.length(height),
        to_macroquad_color(color),
    );
}

fn stroke_rect(viewport: &Viewport, x: f32, y: f32, width: f32, height: f32, color: Color) {
    let origin = viewport.to_screen(Vec2::new(x, y));
    macroquad::shapes::draw_rectangle_lines(
        origin.x,
        origin.y,
        viewport.length(width),
        viewport.length(height),
        viewport.length(3.0).max(1.0),
        to_macroquad_color(color),
    );
}

fn fill_circle(viewport: &Viewport, x: f32, y: f32, radius: f32, color: Color) {
    let centre = viewport.to_screen(Vec2::new(x, y));
    macroquad::shapes::draw_circle(
        centre.x,
        centre.y,
        viewport.length(radius),
        to_macroquad_color(color),
    );
}

fn fill_poly(viewport: &Viewport, x: f32, y: f32, sides: u8, radius: f32, color: Color) {
    let centre = viewport.to_screen(Vec2::new(x, y));
    macroquad::shapes::draw_poly(
        centre.x,
        centre.y,
        sides,
        viewport.length(radius),
        0.0,
        to_macroquad_color(color),
    );
}

fn text_at(viewport: &Viewport, text: &str, x: f32, baseline: f32, size: f32, color: Color) {
    let origin = viewport.to_screen(Vec2::new(x, baseline));
    macroquad::text::draw_text(
        text,
        origin.x,
        origin.y,
        viewport.length(size),
        to_macroquad_color(color),
    );
}

fn text_centered(viewport: &Viewport, text: &str, centre_x: f32, baseline: f32, size: f32, color: Color) {
    let font_size = viewport.length(size);
    let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
    let origin = viewport.to_screen(Vec2::new(centre_x, baseline));
    macroquad::text::draw_text(
        text,
        origin.x - dimensions.width * 0.5,
        origin.y,
        font_size,
        to_macroquad_color(color),
    );
}

fn draw_button(viewport: &Viewport, button: &MenuButton, cursor: Option<Vec2>, theme: &Theme) {
    let hovered = cursor.map_or(false, |point| button.contains(point));
    let fill = if hovered {
        theme.player().lighten(0.25)
    } else {
        theme.player()
    };
    let origin = button.origin();
    let size = button.size();
    fill_rect(viewport, origin.x, origin.y, size.x, size.y, fill);
    stroke_rect(viewport, origin.x, origin.y, size.x, size.y, theme.letter());
    text_centered(
        viewport,
        button.label(),
        origin.x + size.x * 0.5,
        origin.y + size.y * 0.65,
        24.0,
        theme.text(),
    );
}

fn draw_ground(viewport: &Viewport, theme: &Theme) {
    fill_rect(
        viewport,
        0.0,
        PLAY_HEIGHT - 120.0,
        PLAY_WIDTH,
        120.0,
        theme.ground(),
    );
}

fn draw_player(viewport: &Viewport, scene: &Scene, theme: &Theme) {
    let rect = scene.player.rect;
    fill_rect(
        viewport,
        rect.x(),
        rect.y() + 18.0,
        rect.width(),
        rect.height() - 18.0,
        theme.player(),
    );
    // Head and hat above the robe.
    fill_circle(
        viewport,
        rect.x() + rect.width() * 0.5,
        rect.y() + 14.0,
        11.0,
        theme.text(),
    );
    fill_poly(
        viewport,
        rect.x() + rect.width() * 0.5,
        rect.y() + 2.0,
        3,
        12.0,
        theme.player().lighten(0.2),
    );
}

fn draw_obstacle(viewport: &Viewport, rect: Rect, visual: ObstacleVisual, theme: &Theme) {
    let centre_x = rect.x() + rect.width() * 0.5;
    let centre_y = rect.y() + rect.height() * 0.5;
    match visual {
        ObstacleVisual::Orb => {
            fill_circle(viewport, centre_x, centre_y, rect.width() * 0.5, theme.obstacle());
            fill_circle(
                viewport,
                centre_x,
                centre_y,
                rect.width() * 0.3,
                theme.background(),
            );
            fill_circle(viewport, centre_x, centre_y, rect.width() * 0.12, theme.danger());
        }
        ObstacleVisual::Sprite { index } => {
            let sides = 3 + (index % 4) as u8;
            let tint = theme.obstacle().lighten((index % 4) as f32 * 0.12);
            fill_poly(viewport, centre_x, centre_y, sides, rect.width() * 0.5, tint);
        }
    }
}

fn draw_letter(viewport: &Viewport, rect: Rect, character: char, theme: &Theme) {
    let centre_x = rect.x() + rect.width() * 0.5;
    let centre_y = rect.y() + rect.height() * 0.5;
    fill_circle(viewport, centre_x, centre_y, rect.width() * 0.55, theme.letter());
    text_centered(
        viewport,
        &character.to_string(),
        centre_x,
        centre_y + 9.0,
        30.0,
        theme.background(),
    );
}

fn draw_hud(viewport: &Viewport, scene: &Scene, theme: &Theme) {
    let hud = &scene.hud;
    fill_rect(
        viewport,
        10.0,
        10.0,
        300.0,
        200.0,
        theme.background().lighten(0.08).with_alpha(0.85),
    );
    stroke_rect(viewport, 10.0, 10.0, 300.0, 200.0, theme.letter().with_alpha(0.5));

    text_at(viewport, hud.level_name, 20.0, 45.0, 36.0, theme.letter());
    text_at(
        viewport,
        hud.level_description,
        20.0,
        78.0,
        24.0,
        theme.obstacle().lighten(0.3),
    );
    text_at(
        viewport,
        &format!("House Points: {}", hud.score),
        20.0,
        110.0,
        24.0,
        theme.text(),
    );

    // Spell progress bar.
    fill_rect(viewport, 20.0, 125.0, 260.0, 30.0, theme.background().lighten(0.02));
    if !hud.phrase.is_empty() {
        let progress = hud.collected.len() as f32 / hud.phrase.len() as f32;
        if progress > 0.0 {
            fill_rect(viewport, 20.0, 125.0, 260.0 * progress, 30.0, theme.success());
        }
    }
    text_at(
        viewport,
        &format!("Spell: {}", hud.collected),
        25.0,
        147.0,
        24.0,
        theme.letter(),
    );
    text_at(
        viewport,
        &format!("Target: {}", hud.phrase),
        20.0,
        175.0,
        18.0,
        theme.muted(),
    );

    let mode_label = match hud.control_mode {
        ControlMode::Gesture => "HAND: GESTURE",
        ControlMode::Keyboard => "KEYS: KEYBOARD",
    };
    fill_rect(
        viewport,
        PLAY_WIDTH - 190.0,
        PLAY_HEIGHT - 40.0,
        180.0,
        30.0,
        theme.player().with_alpha(0.7),
    );
    text_at(
        viewport,
        mode_label,
        PLAY_WIDTH - 180.0,
        PLAY_HEIGHT - 18.0,
        18.0,
        theme.text(),
    );
}

fn draw_welcome(viewport: &Viewport, scene: &Scene, cursor: Option<Vec2>, theme: &Theme) {
    text_centered(viewport, "SPELLRUN", PLAY_WIDTH / 2.0, 90.0, 72.0, theme.letter());
    text_centered(
        viewport,
        "The Forbidden Run",
        PLAY_WIDTH / 2.0,
        150.0,
        48.0,
        theme.obstacle().lighten(0.2),
    );

    let (title, first, second) = match scene.hud.control_mode {
        ControlMode::Gesture => (
            "HAND MAGIC",
            "Open your hand (4+ fingers) - Levitate!",
            "Press K to switch to Keyboard",
        ),
        ControlMode::Keyboard => (
            "WAND CONTROLS",
            "ARROW UP or SPACE - Cast Wingardium Leviosa",
            "Press H to switch to Hand Magic",
        ),
    };
    text_centered(viewport, title, PLAY_WIDTH / 2.0, 235.0, 36.0, theme.accent());
    text_centered(viewport, first, PLAY_WIDTH / 2.0, 275.0, 24.0, theme.text());
    text_centered(viewport, second, PLAY_WIDTH / 2.0, 308.0, 24.0, theme.muted());

    text_centered(
        viewport,
        "Press SPACE to Begin",
        PLAY_WIDTH / 2.0,
        400.0,
        44.0,
        theme.success(),
    );

    draw_button(viewport, &story_button(), cursor, theme);
}

fn draw_story(viewport: &Viewport, theme: &Theme) {
    text_centered(viewport, "THE PROPHECY", PLAY_WIDTH / 2.0, 70.0, 56.0, theme.letter());

    let mut baseline = 140.0;
    for line in STORY_LINES {
        text_centered(viewport, line, PLAY_WIDTH / 2.0, baseline, 24.0, theme.text());
        baseline += 28.0;
    }

    text_centered(
        viewport,
        "Press SPACE to return",
        PLAY_WIDTH / 2.0,
        575.0,
        24.0,
        theme.letter(),
    );
}

fn draw_playing(viewport: &Viewport, scene: &Scene, cursor: Option<Vec2>, theme: &Theme) {
    draw_ground(viewport, theme);
    for obstacle in &scene.obstacles {
        draw_obstacle(viewport, obstacle.rect, obstacle.visual, theme);
    }
    for letter in &scene.letters {
        draw_letter(viewport, letter.rect, letter.character, theme);
    }
    draw_player(viewport, scene, theme);
    draw_hud(viewport, scene, theme);
    draw_button(viewport, &home_button(), cursor, theme);
}

fn draw_level_complete(viewport: &Viewport, scene: &Scene, theme: &Theme) {
    text_centered(viewport, "SPELL MASTERED!", PLAY_WIDTH / 2.0, 150.0, 64.0, theme.letter());
    text_centered(
        viewport,
        &format!("\"{}\"", scene.hud.phrase),
        PLAY_WIDTH / 2.0,
        230.0,
        40.0,
        theme.success(),
    );
    text_centered(
        viewport,
        &format!("{} House Points", scene.hud.score),
        PLAY_WIDTH / 2.0,
        300.0,
        44.0,
        theme.text(),
    );
    text_centered(
        viewport,
        "Press SPACE for Next Challenge",
        PLAY_WIDTH / 2.0,
        390.0,
        36.0,
        theme.accent(),
    );
}

fn draw_all_complete(viewport: &Viewport, scene: &Scene, theme: &Theme) {
    text_centered(viewport, "GRAND WIZARD", PLAY_WIDTH / 2.0, 130.0, 72.0, theme.letter());
    text_centered(
        viewport,
        "You've Mastered All Spells!",
        PLAY_WIDTH / 2.0,
        210.0,
        44.0,
        theme.obstacle().lighten(0.2),
    );
    text_centered(
        viewport,
        &format!("Total: {} House Points", scene.hud.score),
        PLAY_WIDTH / 2.0,
        280.0,
        44.0,
        theme.text(),
    );
    text_centered(
        viewport,
        "Press SPACE to Train Again",
        PLAY_WIDTH / 2.0,
        370.0,
        36.0,
        theme.accent(),
    );
}

fn draw_lost(viewport: &Viewport, scene: &Scene, theme: &Theme) {
    text_centered(viewport, "CURSE HIT!", PLAY_WIDTH / 2.0, 150.0, 72.0, theme.danger());
    text_centered(
        viewport,
        "Even great wizards fail sometimes...",
        PLAY_WIDTH / 2.0,
        230.0,
        36.0,
        theme.text(),
    );
    text_centered(
        viewport,
        &format!("House Points: {}", scene.hud.score),
        PLAY_WIDTH / 2.0,
        300.0,
        44.0,
        theme.letter(),
    );
    text_centered(
        viewport,
        "Press SPACE to Try Again",
        PLAY_WIDTH / 2.0,
        380.0,
        36.0,
        theme.success(),
    );
}

fn draw_scene(viewport: &Viewport, scene: &Scene, cursor: Option<Vec2>, theme: &Theme) {
    match scene.state {
        GameState::Welcome => draw_welcome(viewport, scene, cursor, theme),
        GameState::Story => draw_story(viewport, theme),
        GameState::Playing => draw_playing(viewport, scene, cursor, theme),
        GameState::LevelComplete => draw_level_complete(viewport, scene, theme),
        GameState::AllComplete => draw_all_complete(viewport, scene, theme),
        GameState::Lost => draw_lost(viewport, scene, theme),
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameDisposition + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            theme,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 720,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();

            loop {
                let viewport = Viewport::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let input = gather_frame_input(&viewport);
                let cursor = input.cursor;
                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));

                macroquad::window::clear_background(to_macroquad_color(clear_color));

                if frame(frame_dt, input, &mut scene) == FrameDisposition::Quit {
                    break;
                }

                draw_scene(&viewport, &scene, cursor, &theme);

                if show_fps {
                    if let Some(per_second) = fps_counter.record(frame_dt) {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}
