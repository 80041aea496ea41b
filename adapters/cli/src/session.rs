//! Fixed-step session driver.
//!
//! One rendered frame performs three stages: route the frame's input edges
//! into commands, advance the simulation by however many whole 60 Hz ticks
//! of wall-clock time have accumulated, and repopulate the scene from world
//! queries. Events produced while routing are carried into the next tick's
//! batch so the spawn scheduler observes state changes in order.

use std::{sync::Arc, time::Duration};

use spellrun_core::{Command, ControlMode, Event, GameState};
use spellrun_rendering::{
    home_button, story_button, FrameDisposition, FrameInput, HudView, Scene, SceneLetter,
    SceneObstacle, ScenePlayer,
};
use spellrun_system_gesture::GestureSignal;
use spellrun_system_input::{InputRouter, KeyIntents};
use spellrun_system_spawning::{Config as SpawnConfig, Spawning};
use spellrun_world::{self as world, query, World};

const TICK: Duration = Duration::from_nanos(16_666_667);

// Cap the tick backlog so a stalled frame cannot trigger a catch-up spiral.
const MAX_FRAME_BACKLOG: Duration = Duration::from_millis(250);

/// Accumulates wall-clock frame time into whole simulation ticks.
#[derive(Debug, Default)]
struct TickClock {
    accumulator: Duration,
}

impl TickClock {
    fn advance(&mut self, dt: Duration) -> u32 {
        self.accumulator = (self.accumulator + dt).min(MAX_FRAME_BACKLOG);
        let mut ticks = 0;
        while self.accumulator >= TICK {
            self.accumulator -= TICK;
            ticks += 1;
        }
        ticks
    }
}

/// Owns the world and systems and advances them once per rendered frame.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    spawning: Spawning,
    router: InputRouter,
    signal: Arc<GestureSignal>,
    clock: TickClock,
    pending_events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(spawn_seed: u64, sprite_count: u32, signal: Arc<GestureSignal>) -> Self {
        let world = World::new();
        log::info!("{}", query::welcome_banner(&world));
        Self {
            world,
            spawning: Spawning::new(SpawnConfig::new(spawn_seed, sprite_count)),
            router: InputRouter::default(),
            signal,
            clock: TickClock::default(),
            pending_events: Vec::new(),
        }
    }

    /// Switches the session to keyboard-only input. Used when no camera
    /// collaborator is available at startup.
    pub(crate) fn force_keyboard(&mut self) {
        world::apply(
            &mut self.world,
            Command::SetControlMode {
                mode: ControlMode::Keyboard,
            },
            &mut self.pending_events,
        );
    }

    /// Advances the session by one rendered frame and refreshes the scene.
    pub(crate) fn frame(
        &mut self,
        dt: Duration,
        input: FrameInput,
        scene: &mut Scene,
    ) -> FrameDisposition {
        let state = query::game_state(&self.world);

        // Escape backs out of a run; anywhere else it quits the program.
        if input.escape && state != GameState::Playing {
            return FrameDisposition::Quit;
        }

        let intents = self.intents(input, state);
        let mode = query::control_mode(&self.world);
        let mut commands = Vec::new();
        self.router
            .route(&intents, &self.signal, state, mode, &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut self.pending_events);
        }

        for _ in 0..self.clock.advance(dt) {
            world::apply(&mut self.world, Command::Tick, &mut self.pending_events);
            let mut spawn_commands = Vec::new();
            self.spawning.handle(
                &self.pending_events,
                query::game_state(&self.world),
                query::level(&self.world),
                &mut spawn_commands,
            );
            self.pending_events.clear();
            for command in spawn_commands {
                world::apply(&mut self.world, command, &mut self.pending_events);
            }
        }

        self.populate(scene);
        FrameDisposition::Continue
    }

    fn intents(&self, input: FrameInput, state: GameState) -> KeyIntents {
        let over_story = input
            .cursor
            .map_or(false, |cursor| story_button().contains(cursor));
        let over_home = input
            .cursor
            .map_or(false, |cursor| home_button().contains(cursor));
        KeyIntents {
            confirm: input.confirm,
            jump: input.jump,
            gesture_mode: input.gesture_mode,
            keyboard_mode: input.keyboard_mode,
            exit: input.escape,
            view_story: input.clicked && state == GameState::Welcome && over_story,
            leave_run: input.clicked && state == GameState::Playing && over_home,
        }
    }

    fn populate(&self, scene: &mut Scene) {
        let level = query::level(&self.world);
        let spell = query::spell_view(&self.world);
        scene.state = query::game_state(&self.world);
        scene.hud = HudView {
            level_name: level.name(),
            level_description: level.description(),
            score: query::score(&self.world),
            collected: spell.collected,
            phrase: spell.phrase,
            control_mode: query::control_mode(&self.world),
            level_index: query::level_index(&self.world),
            level_count: query::levels().len() as u32,
        };
        let player = query::player_snapshot(&self.world);
        scene.player = ScenePlayer {
            rect: player.rect,
            jumping: player.jumping,
        };
        scene.obstacles.clear();
        scene.obstacles.extend(
            query::obstacle_view(&self.world)
                .into_iter()
                .map(|obstacle| SceneObstacle {
                    rect: obstacle.rect,
                    visual: obstacle.visual,
                }),
        );
        scene.letters.clear();
        scene.letters.extend(
            query::letter_view(&self.world)
                .into_iter()
                .map(|letter| SceneLetter {
                    rect: letter.rect,
                    character: letter.character,
                }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, TickClock, TICK};
    use glam::Vec2;
    use spellrun_core::{ControlMode, GameState};
    use spellrun_rendering::{story_button, FrameDisposition, FrameInput, Scene};
    use spellrun_system_gesture::GestureSignal;
    use std::{sync::Arc, time::Duration};

    fn session() -> (Session, Arc<GestureSignal>) {
        let signal = Arc::new(GestureSignal::new());
        (Session::new(0x5eed, 0, Arc::clone(&signal)), signal)
    }

    fn frame(session: &mut Session, scene: &mut Scene, input: FrameInput) -> FrameDisposition {
        session.frame(TICK, input, scene)
    }

    #[test]
    fn the_clock_converts_wall_time_into_whole_ticks() {
        let mut clock = TickClock::default();
        assert_eq!(clock.advance(TICK), 1);
        assert_eq!(clock.advance(TICK / 2), 0);
        // The half-tick remainder carries into the next frame.
        assert_eq!(clock.advance(TICK), 1);
    }

    #[test]
    fn the_clock_caps_the_backlog_after_a_stall() {
        let mut clock = TickClock::default();
        let ticks = clock.advance(Duration::from_secs(10));
        assert!(ticks > 0);
        assert!(ticks < 20, "a stalled frame must not trigger a spiral");
    }

    #[test]
    fn confirm_starts_a_run_from_the_title_screen() {
        let (mut session, _signal) = session();
        let mut scene = Scene::default();

        let disposition = frame(
            &mut session,
            &mut scene,
            FrameInput {
                confirm: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(disposition, FrameDisposition::Continue);
        assert_eq!(scene.state, GameState::Playing);
        assert_eq!(scene.hud.level_name, "First Year");
        assert_eq!(scene.hud.phrase, "LUMOS");
    }

    #[test]
    fn a_raised_gesture_signal_jumps_in_gesture_mode() {
        let (mut session, signal) = session();
        let mut scene = Scene::default();
        let _ = frame(
            &mut session,
            &mut scene,
            FrameInput {
                confirm: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(scene.hud.control_mode, ControlMode::Gesture);

        signal.raise();
        let _ = frame(&mut session, &mut scene, FrameInput::default());
        assert!(scene.player.jumping);
    }

    #[test]
    fn keyboard_fallback_jumps_on_the_jump_edge() {
        let (mut session, _signal) = session();
        session.force_keyboard();
        let mut scene = Scene::default();
        let _ = frame(
            &mut session,
            &mut scene,
            FrameInput {
                confirm: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(scene.hud.control_mode, ControlMode::Keyboard);

        let _ = frame(
            &mut session,
            &mut scene,
            FrameInput {
                jump: true,
                ..FrameInput::default()
            },
        );
        assert!(scene.player.jumping);
    }

    #[test]
    fn escape_quits_everywhere_except_mid_run() {
        let (mut session, _signal) = session();
        let mut scene = Scene::default();

        let _ = frame(
            &mut session,
            &mut scene,
            FrameInput {
                confirm: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(scene.state, GameState::Playing);

        // Mid-run escape abandons the run instead of quitting.
        let disposition = frame(
            &mut session,
            &mut scene,
            FrameInput {
                escape: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(disposition, FrameDisposition::Continue);
        assert_eq!(scene.state, GameState::Welcome);

        let disposition = frame(
            &mut session,
            &mut scene,
            FrameInput {
                escape: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(disposition, FrameDisposition::Quit);
    }

    #[test]
    fn clicking_the_story_button_opens_the_story_screen() {
        let (mut session, _signal) = session();
        let mut scene = Scene::default();

        let button = story_button();
        let inside = button.origin() + button.size() * 0.5;
        let _ = frame(
            &mut session,
            &mut scene,
            FrameInput {
                clicked: true,
                cursor: Some(inside),
                ..FrameInput::default()
            },
        );
        assert_eq!(scene.state, GameState::Story);

        // A click well away from the button does nothing.
        let _ = frame(
            &mut session,
            &mut scene,
            FrameInput {
                confirm: true,
                ..FrameInput::default()
            },
        );
        assert_eq!(scene.state, GameState::Welcome);
        let _ = frame(
            &mut session,
            &mut scene,
            FrameInput {
                clicked: true,
                cursor: Some(Vec2::new(5.0, 5.0)),
                ..FrameInput::default()
            },
        );
        assert_eq!(scene.state, GameState::Welcome);
    }

    #[test]
    fn the_scheduler_feeds_obstacles_through_the_driver() {
        let (mut session, _signal) = session();
        let mut scene = Scene::default();

        let _ = frame(
            &mut session,
            &mut scene,
            FrameInput {
                confirm: true,
                ..FrameInput::default()
            },
        );
        // The starting frame already ran tick 1 of the schedule.
        for _ in 0..98 {
            let _ = frame(&mut session, &mut scene, FrameInput::default());
        }
        assert!(scene.obstacles.is_empty());

        let _ = frame(&mut session, &mut scene, FrameInput::default());
        assert_eq!(scene.obstacles.len(), 1, "obstacle due on schedule tick 100");
    }
}
