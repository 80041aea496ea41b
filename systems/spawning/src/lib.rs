#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn scheduling for obstacles and phrase letters.
//!
//! The scheduler counts ticks while a run is playing and emits spawn
//! commands on the period boundaries of the active level. Letter drop
//! heights and obstacle artwork slots come from a seeded linear congruential
//! generator so that identical seeds replay identical sessions.

use spellrun_core::{Command, Event, GameState, LevelConfig, ObstacleVisual, MAX_LETTER_LIFT};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Configuration parameters required to construct the spawn scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    sprite_count: u32,
}

impl Config {
    /// Creates a new configuration from an RNG seed and the number of
    /// obstacle artwork slots the presentation layer offers. A count of
    /// zero routes every obstacle to the procedural orb.
    #[must_use]
    pub const fn new(rng_seed: u64, sprite_count: u32) -> Self {
        Self {
            rng_seed,
            sprite_count,
        }
    }
}

/// Pure system that deterministically emits spawn commands during a run.
#[derive(Debug)]
pub struct Spawning {
    counter: u64,
    rng_state: u64,
    sprite_count: u32,
}

impl Spawning {
    /// Creates a new spawn scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            counter: 0,
            rng_state: config.rng_seed,
            sprite_count: config.sprite_count,
        }
    }

    /// Consumes events and the active level configuration to emit spawn
    /// commands. The tick counter restarts on every entry into the playing
    /// state, so spawn cadence is a per-run property.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: GameState,
        level: &LevelConfig,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::StateChanged {
                    state: GameState::Playing,
                } => {
                    self.counter = 0;
                }
                Event::TimeAdvanced { .. } => {
                    if state != GameState::Playing {
                        continue;
                    }
                    self.counter = self.counter.saturating_add(1);
                    if self.counter % u64::from(level.obstacle_period()) == 0 {
                        out.push(Command::SpawnObstacle {
                            visual: self.next_visual(),
                        });
                    }
                    if self.counter % u64::from(level.letter_period()) == 0 {
                        out.push(Command::SpawnLetter {
                            lift: self.next_lift(),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }

    fn next_visual(&mut self) -> ObstacleVisual {
        if self.sprite_count == 0 {
            return ObstacleVisual::Orb;
        }
        let value = self.advance_rng();
        ObstacleVisual::Sprite {
            index: (value % u64::from(self.sprite_count)) as u32,
        }
    }

    fn next_lift(&mut self) -> u32 {
        let value = self.advance_rng();
        (value % u64::from(MAX_LETTER_LIFT + 1)) as u32
    }
}
