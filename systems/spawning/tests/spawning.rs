use spellrun_core::{Command, Event, GameState, ObstacleVisual};
use spellrun_system_spawning::{Config, Spawning};
use spellrun_world::{self as world, query, World};

const SEED: u64 = 0x4d59_5df4_d0f3_3173;

fn playing() -> Event {
    Event::StateChanged {
        state: GameState::Playing,
    }
}

fn tick(index: u64) -> Event {
    Event::TimeAdvanced { tick: index }
}

#[test]
fn first_spawns_land_exactly_on_the_period_boundaries() {
    let level = query::levels()[0];
    assert_eq!(level.obstacle_period(), 100);
    assert_eq!(level.letter_period(), 110);

    let mut spawning = Spawning::new(Config::new(SEED, 0));
    let mut commands = Vec::new();

    spawning.handle(&[playing()], GameState::Playing, &level, &mut commands);
    for index in 1..100u64 {
        spawning.handle(&[tick(index)], GameState::Playing, &level, &mut commands);
    }
    assert!(commands.is_empty(), "no spawn before the obstacle period");

    spawning.handle(&[tick(100)], GameState::Playing, &level, &mut commands);
    assert_eq!(
        commands,
        vec![Command::SpawnObstacle {
            visual: ObstacleVisual::Orb,
        }],
    );

    commands.clear();
    for index in 101..=110u64 {
        spawning.handle(&[tick(index)], GameState::Playing, &level, &mut commands);
    }
    assert_eq!(commands.len(), 1, "one letter spawn at the letter period");
    assert!(matches!(commands[0], Command::SpawnLetter { lift } if lift <= 100));
}

#[test]
fn the_counter_restarts_on_every_entry_into_playing() {
    let level = query::levels()[0];
    let mut spawning = Spawning::new(Config::new(SEED, 0));
    let mut commands = Vec::new();

    spawning.handle(&[playing()], GameState::Playing, &level, &mut commands);
    for index in 1..=50u64 {
        spawning.handle(&[tick(index)], GameState::Playing, &level, &mut commands);
    }
    assert!(commands.is_empty());

    // Re-entering the playing state discards the accumulated cadence.
    spawning.handle(&[playing()], GameState::Playing, &level, &mut commands);
    for index in 51..=149u64 {
        spawning.handle(&[tick(index)], GameState::Playing, &level, &mut commands);
    }
    assert!(commands.is_empty(), "99 ticks after the reset spawn nothing");

    spawning.handle(&[tick(150)], GameState::Playing, &level, &mut commands);
    assert_eq!(commands.len(), 1);
}

#[test]
fn ticks_outside_the_playing_state_spawn_nothing() {
    let level = query::levels()[0];
    let mut spawning = Spawning::new(Config::new(SEED, 0));
    let mut commands = Vec::new();

    for index in 1..=400u64 {
        spawning.handle(&[tick(index)], GameState::Welcome, &level, &mut commands);
    }
    assert!(commands.is_empty());
}

#[test]
fn identical_seeds_schedule_identical_sessions() {
    let level = query::levels()[1];

    let run = || {
        let mut spawning = Spawning::new(Config::new(SEED, 4));
        let mut commands = Vec::new();
        spawning.handle(&[playing()], GameState::Playing, &level, &mut commands);
        for index in 1..=2_000u64 {
            spawning.handle(&[tick(index)], GameState::Playing, &level, &mut commands);
        }
        commands
    };

    assert_eq!(run(), run());
}

#[test]
fn scheduler_and_world_pump_spawns_on_cadence() {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(SEED, 0));

    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRun, &mut events);

    // 150 ticks keep the first obstacle short of the grounded player, which
    // it would otherwise reach 76 ticks after spawning.
    let mut spawned_obstacles = 0usize;
    let mut spawned_letters = 0usize;
    for _ in 0..150u32 {
        world::apply(&mut world, Command::Tick, &mut events);
        let state = query::game_state(&world);
        let level = query::level(&world);
        let mut commands = Vec::new();
        spawning.handle(&events, state, level, &mut commands);
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        spawned_obstacles += events
            .iter()
            .filter(|event| matches!(event, Event::ObstacleSpawned { .. }))
            .count();
        spawned_letters += events
            .iter()
            .filter(|event| matches!(event, Event::LetterSpawned { .. }))
            .count();
    }

    // Level one: obstacles every 100 ticks, letters every 110.
    assert_eq!(spawned_obstacles, 1);
    assert_eq!(spawned_letters, 1);
    assert_eq!(query::game_state(&world), GameState::Playing);
    assert_eq!(query::obstacle_view(&world).len(), 1);
    assert_eq!(query::letter_view(&world).len(), 1);
}
