#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Spellrun.
//!
//! The world owns the player kinematics, the live obstacle and letter lists,
//! the spell progress, the score, and the session state machine. All
//! mutation flows through [`apply`]; adapters and systems observe the world
//! exclusively through the broadcast [`Event`] stream and the read-only
//! [`query`] module.

use spellrun_core::{
    Command, ControlMode, Event, GameState, LetterId, LevelConfig, ObstacleId, ObstacleVisual,
    Rect, GROUND_Y, MAX_LETTER_LIFT, PLAY_WIDTH, WELCOME_BANNER,
};

const PLAYER_WIDTH: f32 = 50.0;
const PLAYER_HEIGHT: f32 = 70.0;
const PLAYER_START_X: f32 = PLAY_WIDTH / 2.0 - PLAYER_WIDTH / 2.0;
const PLAYER_MIN_X: f32 = 50.0;
const PLAYER_MAX_X: f32 = PLAY_WIDTH - 100.0;

// Kinematic constants are tuned for 60 Hz logical ticks and must not be
// reinterpreted as per-second values.
const JUMP_VELOCITY: f32 = -20.0;
const GRAVITY_PER_TICK: f32 = 1.0;

const OBSTACLE_SIZE: f32 = 60.0;
const LETTER_SIZE: f32 = 35.0;
const LETTER_BASE_Y: f32 = 380.0;

const DODGE_BONUS: u32 = 15;
const LETTER_AWARD: u32 = 75;

static LEVELS: [LevelConfig; 3] = [
    LevelConfig::new(
        "First Year",
        "Light in the Darkness",
        "LUMOS",
        5.0,
        100,
        110,
    ),
    LevelConfig::new(
        "Second Year",
        "The Disarming Charm",
        "EXPELLIARMUS",
        6.5,
        80,
        95,
    ),
    LevelConfig::new(
        "Third Year",
        "Summon Your Guardian",
        "EXPECTOPATRONUM",
        8.0,
        65,
        85,
    ),
];

#[derive(Debug)]
struct Player {
    x: f32,
    y: f32,
    velocity_y: f32,
    jumping: bool,
}

impl Player {
    fn new() -> Self {
        Self {
            x: PLAYER_START_X,
            y: GROUND_Y,
            velocity_y: 0.0,
            jumping: false,
        }
    }

    /// Begins a jump. Idempotent while airborne.
    fn jump(&mut self) -> bool {
        if self.jumping {
            return false;
        }
        self.jumping = true;
        self.velocity_y = JUMP_VELOCITY;
        true
    }

    /// Advances the jump kinematics by one tick, returning `true` on the
    /// tick the player lands.
    fn step(&mut self) -> bool {
        let mut landed = false;
        if self.jumping {
            self.velocity_y += GRAVITY_PER_TICK;
            self.y += self.velocity_y;
            if self.y >= GROUND_Y {
                self.y = GROUND_Y;
                self.velocity_y = 0.0;
                self.jumping = false;
                landed = true;
            }
        }
        self.x = self.x.clamp(PLAYER_MIN_X, PLAYER_MAX_X);
        landed
    }

    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

#[derive(Debug)]
struct Obstacle {
    id: ObstacleId,
    x: f32,
    speed: f32,
    visual: ObstacleVisual,
}

impl Obstacle {
    fn rect(&self) -> Rect {
        Rect::new(self.x, GROUND_Y, OBSTACLE_SIZE, OBSTACLE_SIZE)
    }

    fn off_screen(&self) -> bool {
        self.x <= -OBSTACLE_SIZE
    }
}

#[derive(Debug)]
struct Letter {
    id: LetterId,
    x: f32,
    y: f32,
    character: char,
    speed: f32,
}

impl Letter {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, LETTER_SIZE, LETTER_SIZE)
    }

    fn off_screen(&self) -> bool {
        self.x <= -LETTER_SIZE
    }
}

/// Ordered record of the phrase letters collected so far.
///
/// The collected text is a prefix of the target phrase by construction: a
/// character is only appended when it equals the next expected one.
#[derive(Debug)]
struct SpellProgress {
    phrase: &'static str,
    collected: String,
}

impl SpellProgress {
    fn new(phrase: &'static str) -> Self {
        Self {
            phrase,
            collected: String::new(),
        }
    }

    fn next_expected(&self) -> Option<char> {
        self.phrase[self.collected.len()..].chars().next()
    }

    fn accept(&mut self, character: char) -> bool {
        if self.next_expected() == Some(character) {
            self.collected.push(character);
            true
        } else {
            false
        }
    }

    fn is_complete(&self) -> bool {
        self.collected.len() == self.phrase.len()
    }
}

/// Represents the authoritative Spellrun session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    state: GameState,
    control_mode: ControlMode,
    level_index: usize,
    progress: SpellProgress,
    score: u32,
    tick_index: u64,
    player: Player,
    obstacles: Vec<Obstacle>,
    letters: Vec<Letter>,
    next_obstacle_id: u32,
    next_letter_id: u32,
}

impl World {
    /// Creates a new session resting on the title screen of the first level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            state: GameState::Welcome,
            control_mode: ControlMode::Gesture,
            level_index: 0,
            progress: SpellProgress::new(LEVELS[0].phrase()),
            score: 0,
            tick_index: 0,
            player: Player::new(),
            obstacles: Vec::new(),
            letters: Vec::new(),
            next_obstacle_id: 0,
            next_letter_id: 0,
        }
    }

    fn level(&self) -> &'static LevelConfig {
        &LEVELS[self.level_index]
    }

    /// Replaces the player and clears the live entities and spell progress
    /// for the active level. The score survives only when `keep_score` is
    /// set: level-to-level continuation keeps it, every other entry into
    /// `Playing` starts from zero.
    fn reset_run(&mut self, keep_score: bool) {
        self.player = Player::new();
        self.obstacles.clear();
        self.letters.clear();
        self.progress = SpellProgress::new(self.level().phrase());
        if !keep_score {
            self.score = 0;
        }
    }

    fn enter(&mut self, state: GameState, out_events: &mut Vec<Event>) {
        self.state = state;
        out_events.push(Event::StateChanged { state });
    }

    fn allocate_obstacle_id(&mut self) -> ObstacleId {
        let id = ObstacleId::new(self.next_obstacle_id);
        self.next_obstacle_id = self.next_obstacle_id.wrapping_add(1);
        id
    }

    fn allocate_letter_id(&mut self) -> LetterId {
        let id = LetterId::new(self.next_letter_id);
        self.next_letter_id = self.next_letter_id.wrapping_add(1);
        id
    }

    /// Moves every obstacle one tick, awarding dodge bonuses for clean
    /// exits. Returns the first obstacle the player struck, if any.
    fn advance_obstacles(&mut self, out_events: &mut Vec<Event>) -> Option<ObstacleId> {
        let player_rect = self.player.rect();
        let mut struck = None;
        let mut index = 0;
        while index < self.obstacles.len() {
            let speed = self.obstacles[index].speed;
            self.obstacles[index].x -= speed;
            if self.obstacles[index].off_screen() {
                let removed = self.obstacles.remove(index);
                self.score = self.score.saturating_add(DODGE_BONUS);
                out_events.push(Event::ObstacleDodged {
                    id: removed.id,
                    bonus: DODGE_BONUS,
                });
                continue;
            }
            if struck.is_none() && player_rect.overlaps(&self.obstacles[index].rect()) {
                struck = Some(self.obstacles[index].id);
            }
            index += 1;
        }
        struck
    }

    /// Moves every letter one tick, collecting the next expected phrase
    /// character on contact and discarding letters that drift off-screen.
    /// A touch on any other character is deliberately ignored: the letter
    /// is simply not collectible yet and keeps scrolling. Returns `true`
    /// when the collection completed the phrase.
    fn advance_letters(&mut self, out_events: &mut Vec<Event>) -> bool {
        let player_rect = self.player.rect();
        let mut index = 0;
        while index < self.letters.len() {
            let speed = self.letters[index].speed;
            self.letters[index].x -= speed;
            if self.letters[index].off_screen() {
                let removed = self.letters.remove(index);
                out_events.push(Event::LetterMissed { id: removed.id });
                continue;
            }
            if player_rect.overlaps(&self.letters[index].rect())
                && self.progress.accept(self.letters[index].character)
            {
                let removed = self.letters.remove(index);
                self.score = self.score.saturating_add(LETTER_AWARD);
                out_events.push(Event::LetterCollected {
                    id: removed.id,
                    character: removed.character,
                    award: LETTER_AWARD,
                });
                if self.progress.is_complete() {
                    return true;
                }
                continue;
            }
            index += 1;
        }
        false
    }

    fn complete_spell(&mut self, out_events: &mut Vec<Event>) {
        out_events.push(Event::SpellCompleted {
            level_index: self.level_index as u32,
        });
        if self.level_index + 1 < LEVELS.len() {
            self.level_index += 1;
            self.enter(GameState::LevelComplete, out_events);
        } else {
            out_events.push(Event::RunCompleted { score: self.score });
            self.enter(GameState::AllComplete, out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that are not meaningful in the current state are ignored; the
/// state machine only moves along the transitions it defines.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });

            if world.state != GameState::Playing {
                return;
            }

            if world.player.step() {
                out_events.push(Event::PlayerLanded);
            }

            if let Some(obstacle) = world.advance_obstacles(out_events) {
                // Terminal: letters are not processed on the losing tick.
                out_events.push(Event::RunLost { obstacle });
                world.enter(GameState::Lost, out_events);
                return;
            }

            if world.advance_letters(out_events) {
                world.complete_spell(out_events);
            }
        }
        Command::Jump => {
            if world.state == GameState::Playing && world.player.jump() {
                out_events.push(Event::PlayerJumped);
            }
        }
        Command::SpawnObstacle { visual } => {
            if world.state == GameState::Playing {
                let id = world.allocate_obstacle_id();
                let speed = world.level().scroll_speed();
                world.obstacles.push(Obstacle {
                    id,
                    x: PLAY_WIDTH,
                    speed,
                    visual,
                });
                out_events.push(Event::ObstacleSpawned { id, visual });
            }
        }
        Command::SpawnLetter { lift } => {
            if world.state == GameState::Playing {
                if let Some(character) = world.progress.next_expected() {
                    let id = world.allocate_letter_id();
                    let lift = lift.min(MAX_LETTER_LIFT);
                    let speed = world.level().scroll_speed();
                    world.letters.push(Letter {
                        id,
                        x: PLAY_WIDTH,
                        y: LETTER_BASE_Y - lift as f32,
                        character,
                        speed,
                    });
                    out_events.push(Event::LetterSpawned { id, character });
                }
            }
        }
        Command::SetControlMode { mode } => {
            if world.control_mode != mode {
                world.control_mode = mode;
                out_events.push(Event::ControlModeChanged { mode });
            }
        }
        Command::StartRun => {
            if world.state == GameState::Welcome {
                world.reset_run(false);
                world.enter(GameState::Playing, out_events);
            }
        }
        Command::ContinueRun => {
            if world.state == GameState::LevelComplete {
                world.reset_run(true);
                world.enter(GameState::Playing, out_events);
            }
        }
        Command::RetryRun => {
            if matches!(world.state, GameState::Lost | GameState::AllComplete) {
                world.level_index = 0;
                world.reset_run(false);
                world.enter(GameState::Playing, out_events);
            }
        }
        Command::ExitToMenu => {
            if world.state == GameState::Playing {
                world.level_index = 0;
                world.reset_run(false);
                world.enter(GameState::Welcome, out_events);
            }
        }
        Command::ViewStory => {
            if world.state == GameState::Welcome {
                world.enter(GameState::Story, out_events);
            }
        }
        Command::DismissStory => {
            if world.state == GameState::Story {
                world.enter(GameState::Welcome, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{World, LEVELS};
    use spellrun_core::{
        ControlMode, GameState, LetterId, LevelConfig, ObstacleId, ObstacleVisual, Rect,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports the active session state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Reports the active input source for jump intents.
    #[must_use]
    pub fn control_mode(world: &World) -> ControlMode {
        world.control_mode
    }

    /// Reports the score accumulated so far this run.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Zero-based index of the active level.
    #[must_use]
    pub fn level_index(world: &World) -> u32 {
        world.level_index as u32
    }

    /// Configuration of the active level.
    #[must_use]
    pub fn level(world: &World) -> &'static LevelConfig {
        world.level()
    }

    /// The full ordered level table.
    #[must_use]
    pub fn levels() -> &'static [LevelConfig] {
        &LEVELS
    }

    /// Captures the collected prefix and target phrase of the active spell.
    #[must_use]
    pub fn spell_view(world: &World) -> SpellView {
        SpellView {
            collected: world.progress.collected.clone(),
            phrase: world.progress.phrase,
        }
    }

    /// Captures the player's bounds and airborne flag.
    #[must_use]
    pub fn player_snapshot(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            rect: world.player.rect(),
            jumping: world.player.jumping,
            velocity_y: world.player.velocity_y,
        }
    }

    /// Captures a read-only view of the live obstacles in spawn order.
    #[must_use]
    pub fn obstacle_view(world: &World) -> Vec<ObstacleSnapshot> {
        world
            .obstacles
            .iter()
            .map(|obstacle| ObstacleSnapshot {
                id: obstacle.id,
                rect: obstacle.rect(),
                visual: obstacle.visual,
            })
            .collect()
    }

    /// Captures a read-only view of the live letters in spawn order.
    #[must_use]
    pub fn letter_view(world: &World) -> Vec<LetterSnapshot> {
        world
            .letters
            .iter()
            .map(|letter| LetterSnapshot {
                id: letter.id,
                rect: letter.rect(),
                character: letter.character,
            })
            .collect()
    }

    /// Read-only view of the active spell phrase and its collected prefix.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct SpellView {
        /// Letters collected so far, always a prefix of `phrase`.
        pub collected: String,
        /// Target phrase of the active level.
        pub phrase: &'static str,
    }

    /// Immutable representation of the player state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Player bounds in world units.
        pub rect: Rect,
        /// Whether the player is currently airborne.
        pub jumping: bool,
        /// Vertical velocity in world units per tick.
        pub velocity_y: f32,
    }

    /// Immutable representation of a single obstacle used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ObstacleSnapshot {
        /// Identifier allocated to the obstacle by the world.
        pub id: ObstacleId,
        /// Obstacle bounds in world units.
        pub rect: Rect,
        /// Appearance tag carried by the obstacle.
        pub visual: ObstacleVisual,
    }

    /// Immutable representation of a single letter used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct LetterSnapshot {
        /// Identifier allocated to the letter by the world.
        pub id: LetterId,
        /// Letter bounds in world units.
        pub rect: Rect,
        /// Character the letter contributes to the spell phrase.
        pub character: char,
    }
}
