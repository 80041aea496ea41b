use spellrun_core::{Command, ControlMode, GameState};
use spellrun_system_gesture::GestureSignal;
use spellrun_system_input::{InputRouter, KeyIntents};

fn route(
    intents: KeyIntents,
    signal: &GestureSignal,
    state: GameState,
    mode: ControlMode,
) -> Vec<Command> {
    let mut router = InputRouter::default();
    let mut commands = Vec::new();
    router.route(&intents, signal, state, mode, &mut commands);
    commands
}

#[test]
fn keyboard_jump_edges_only_count_during_play() {
    let signal = GestureSignal::new();
    let intents = KeyIntents {
        jump: true,
        ..KeyIntents::default()
    };

    assert_eq!(
        route(intents, &signal, GameState::Playing, ControlMode::Keyboard),
        vec![Command::Jump],
    );
    assert!(route(intents, &signal, GameState::Welcome, ControlMode::Keyboard).is_empty());
    assert!(route(intents, &signal, GameState::Lost, ControlMode::Keyboard).is_empty());
}

#[test]
fn the_confirm_edge_dispatches_on_the_active_screen() {
    let signal = GestureSignal::new();
    let intents = KeyIntents {
        confirm: true,
        ..KeyIntents::default()
    };

    assert_eq!(
        route(intents, &signal, GameState::Welcome, ControlMode::Keyboard),
        vec![Command::StartRun],
    );
    assert_eq!(
        route(intents, &signal, GameState::Story, ControlMode::Keyboard),
        vec![Command::DismissStory],
    );
    assert_eq!(
        route(
            intents,
            &signal,
            GameState::LevelComplete,
            ControlMode::Keyboard
        ),
        vec![Command::ContinueRun],
    );
    assert_eq!(
        route(intents, &signal, GameState::Lost, ControlMode::Keyboard),
        vec![Command::RetryRun],
    );
    assert_eq!(
        route(
            intents,
            &signal,
            GameState::AllComplete,
            ControlMode::Keyboard
        ),
        vec![Command::RetryRun],
    );
    // In keyboard mode the same edge doubles as the jump key mid-run.
    assert_eq!(
        route(intents, &signal, GameState::Playing, ControlMode::Keyboard),
        vec![Command::Jump],
    );
}

#[test]
fn a_latched_gesture_produces_exactly_one_jump() {
    let signal = GestureSignal::new();
    signal.raise();

    assert_eq!(
        route(
            KeyIntents::default(),
            &signal,
            GameState::Playing,
            ControlMode::Gesture
        ),
        vec![Command::Jump],
    );
    // The slot was cleared by consumption.
    assert!(route(
        KeyIntents::default(),
        &signal,
        GameState::Playing,
        ControlMode::Gesture
    )
    .is_empty());
}

#[test]
fn keyboard_mode_leaves_a_pending_gesture_latched() {
    let signal = GestureSignal::new();
    signal.raise();

    assert!(route(
        KeyIntents::default(),
        &signal,
        GameState::Playing,
        ControlMode::Keyboard
    )
    .is_empty());

    // Switching back later still delivers the stale signal once.
    assert_eq!(
        route(
            KeyIntents::default(),
            &signal,
            GameState::Playing,
            ControlMode::Gesture
        ),
        vec![Command::Jump],
    );
}

#[test]
fn gestures_outside_play_stay_latched() {
    let signal = GestureSignal::new();
    signal.raise();

    assert!(route(
        KeyIntents::default(),
        &signal,
        GameState::Welcome,
        ControlMode::Gesture
    )
    .is_empty());
    assert!(signal.take(), "the signal must not be consumed off-run");
}

#[test]
fn mode_switch_edges_always_route() {
    let signal = GestureSignal::new();
    let intents = KeyIntents {
        keyboard_mode: true,
        ..KeyIntents::default()
    };

    for state in [GameState::Welcome, GameState::Playing, GameState::Lost] {
        let commands = route(intents, &signal, state, ControlMode::Gesture);
        assert!(commands.contains(&Command::SetControlMode {
            mode: ControlMode::Keyboard
        }));
    }
}

#[test]
fn exit_and_menu_buttons_leave_the_run() {
    let signal = GestureSignal::new();

    let escape = KeyIntents {
        exit: true,
        ..KeyIntents::default()
    };
    assert_eq!(
        route(escape, &signal, GameState::Playing, ControlMode::Keyboard),
        vec![Command::ExitToMenu],
    );
    // Outside the run, back/escape is the adapter's concern (quit).
    assert!(route(escape, &signal, GameState::Welcome, ControlMode::Keyboard).is_empty());

    let home = KeyIntents {
        leave_run: true,
        ..KeyIntents::default()
    };
    assert_eq!(
        route(home, &signal, GameState::Playing, ControlMode::Keyboard),
        vec![Command::ExitToMenu],
    );
}

#[test]
fn story_button_opens_the_story_screen() {
    let signal = GestureSignal::new();
    let intents = KeyIntents {
        view_story: true,
        ..KeyIntents::default()
    };

    assert_eq!(
        route(intents, &signal, GameState::Welcome, ControlMode::Gesture),
        vec![Command::ViewStory],
    );
    assert!(route(intents, &signal, GameState::Playing, ControlMode::Keyboard).is_empty());
}
