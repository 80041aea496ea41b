#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Spellrun engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! to react to deterministically. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Spellrun.";

/// Width of the playfield measured in world units.
pub const PLAY_WIDTH: f32 = 800.0;

/// Height of the playfield measured in world units.
pub const PLAY_HEIGHT: f32 = 600.0;

/// Vertical coordinate of the ground line the player rests on.
pub const GROUND_Y: f32 = 430.0;

/// Greatest distance above the base drop line a spawned letter may sit.
///
/// Part of the [`Command::SpawnLetter`] contract: producers draw lifts from
/// `0..=MAX_LETTER_LIFT` and the world clamps anything larger.
pub const MAX_LETTER_LIFT: u32 = 100;

/// Describes the active screen of the session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen shown before a run begins.
    Welcome,
    /// Story screen reached from the title screen.
    Story,
    /// A run is in progress and the simulation is advancing.
    Playing,
    /// The active spell phrase was completed and more levels remain.
    LevelComplete,
    /// The final spell phrase was completed; the run is over.
    AllComplete,
    /// The player collided with an obstacle; the run is over.
    Lost,
}

/// Selects which input source produces jump intents during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlMode {
    /// Jumps come from the webcam open-hand gesture signal.
    Gesture,
    /// Jumps come from edge-triggered keyboard events.
    Keyboard,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by a single fixed-rate tick.
    Tick,
    /// Requests that the player begin a jump.
    Jump,
    /// Starts a run from the title screen, keeping the current level index.
    StartRun,
    /// Continues into the next level after completing a spell phrase.
    ContinueRun,
    /// Restarts the run from the first level after a win or a loss.
    RetryRun,
    /// Abandons the active run and returns to the title screen.
    ExitToMenu,
    /// Opens the story screen from the title screen.
    ViewStory,
    /// Returns from the story screen to the title screen.
    DismissStory,
    /// Switches the active input source for jump intents.
    SetControlMode {
        /// Input source that should become active.
        mode: ControlMode,
    },
    /// Requests that one obstacle enter the playfield at the right edge.
    SpawnObstacle {
        /// Appearance tag assigned to the spawned obstacle.
        visual: ObstacleVisual,
    },
    /// Requests that the next uncollected phrase letter enter the playfield.
    SpawnLetter {
        /// Distance above the base drop line, in world units (0..=100).
        lift: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced {
        /// Monotonically increasing session tick index.
        tick: u64,
    },
    /// Confirms that the player left the ground.
    PlayerJumped,
    /// Confirms that the player returned to the ground.
    PlayerLanded,
    /// Announces that the session entered a new state.
    StateChanged {
        /// State that became active after processing commands.
        state: GameState,
    },
    /// Announces that a new input source became active.
    ControlModeChanged {
        /// Input source that became active.
        mode: ControlMode,
    },
    /// Confirms that an obstacle entered the playfield.
    ObstacleSpawned {
        /// Identifier assigned to the obstacle by the world.
        id: ObstacleId,
        /// Appearance tag carried by the obstacle.
        visual: ObstacleVisual,
    },
    /// Confirms that a phrase letter entered the playfield.
    LetterSpawned {
        /// Identifier assigned to the letter by the world.
        id: LetterId,
        /// Character the letter contributes to the spell phrase.
        character: char,
    },
    /// Reports that an obstacle left the playfield without a collision.
    ObstacleDodged {
        /// Identifier of the obstacle that was dodged.
        id: ObstacleId,
        /// Score awarded for the dodge.
        bonus: u32,
    },
    /// Reports that a letter was collected in correct phrase order.
    LetterCollected {
        /// Identifier of the collected letter.
        id: LetterId,
        /// Character appended to the collected prefix.
        character: char,
        /// Score awarded for the collection.
        award: u32,
    },
    /// Reports that a letter drifted off-screen without being collected.
    LetterMissed {
        /// Identifier of the discarded letter.
        id: LetterId,
    },
    /// Reports that the run ended in an obstacle collision.
    RunLost {
        /// Identifier of the obstacle the player struck.
        obstacle: ObstacleId,
    },
    /// Reports that the active spell phrase was fully collected.
    SpellCompleted {
        /// Zero-based index of the level whose phrase was completed.
        level_index: u32,
    },
    /// Reports that the final spell phrase was completed.
    RunCompleted {
        /// Score accumulated over the whole run.
        score: u32,
    },
}

/// Unique identifier assigned to an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a phrase letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LetterId(u32);

impl LetterId {
    /// Creates a new letter identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Appearance tag carried by an obstacle.
///
/// The collision and spawn logic is indifferent to presentation; the tag only
/// records which artwork slot an adapter should use, or that the adapter
/// should fall back to its procedural orb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleVisual {
    /// Obstacle presented from a numbered artwork slot.
    Sprite {
        /// Zero-based artwork slot index.
        index: u32,
    },
    /// Obstacle presented procedurally by the adapter.
    Orb,
}

/// Axis-aligned rectangle expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a new rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal coordinate of the upper-left corner.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the upper-left corner.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Width of the rectangle in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether two rectangles overlap.
    ///
    /// Half-open interval semantics: rectangles that touch along an edge do
    /// not overlap. All four comparisons are strict.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Immutable configuration describing a single difficulty level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelConfig {
    name: &'static str,
    description: &'static str,
    phrase: &'static str,
    scroll_speed: f32,
    obstacle_period: u32,
    letter_period: u32,
}

impl LevelConfig {
    /// Creates a new level configuration.
    #[must_use]
    pub const fn new(
        name: &'static str,
        description: &'static str,
        phrase: &'static str,
        scroll_speed: f32,
        obstacle_period: u32,
        letter_period: u32,
    ) -> Self {
        Self {
            name,
            description,
            phrase,
            scroll_speed,
            obstacle_period,
            letter_period,
        }
    }

    /// Display name of the level.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Flavour line shown alongside the level name.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Target spell phrase collected over the course of the level.
    #[must_use]
    pub const fn phrase(&self) -> &'static str {
        self.phrase
    }

    /// Horizontal speed of obstacles and letters, in world units per tick.
    #[must_use]
    pub const fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    /// Number of ticks between successive obstacle spawns.
    #[must_use]
    pub const fn obstacle_period(&self) -> u32 {
        self.obstacle_period
    }

    /// Number of ticks between successive letter spawns.
    #[must_use]
    pub const fn letter_period(&self) -> u32 {
        self.letter_period
    }
}
