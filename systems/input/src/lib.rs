#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Merges keyboard, menu and gesture intents into session commands.
//!
//! The router runs once per tick. Keyboard and menu intents are
//! edge-triggered flags gathered by the host adapter; the gesture signal is
//! the one-slot latch raised by the sampling thread. What a key means
//! depends on the state snapshot the router is handed: the same confirm
//! edge starts a run from the title screen, dismisses the story, continues
//! past a completed level, or jumps mid-run in keyboard mode.

use spellrun_core::{Command, ControlMode, GameState};
use spellrun_system_gesture::GestureSignal;

/// Edge-triggered intents gathered by the host adapter for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyIntents {
    /// Primary action edge: confirm the active screen, or jump while
    /// playing in keyboard mode.
    pub confirm: bool,
    /// Dedicated jump key edge.
    pub jump: bool,
    /// Switch jump input to the gesture signal.
    pub gesture_mode: bool,
    /// Switch jump input to the keyboard.
    pub keyboard_mode: bool,
    /// Back/escape edge.
    pub exit: bool,
    /// The story menu button was selected.
    pub view_story: bool,
    /// The leave-run menu button was selected.
    pub leave_run: bool,
}

/// Pure system that turns one tick's intents into a command batch.
#[derive(Debug, Default)]
pub struct InputRouter;

impl InputRouter {
    /// Routes the intents gathered for this tick.
    ///
    /// `state` and `mode` are the snapshots taken before routing, so a
    /// mode switch issued here takes effect on the next tick. The gesture
    /// signal is consumed only in gesture mode during play; a pending
    /// signal survives a switch to keyboard mode untouched.
    pub fn route(
        &mut self,
        intents: &KeyIntents,
        signal: &GestureSignal,
        state: GameState,
        mode: ControlMode,
        out: &mut Vec<Command>,
    ) {
        if intents.gesture_mode {
            out.push(Command::SetControlMode {
                mode: ControlMode::Gesture,
            });
        }
        if intents.keyboard_mode {
            out.push(Command::SetControlMode {
                mode: ControlMode::Keyboard,
            });
        }

        match state {
            GameState::Welcome => {
                if intents.view_story {
                    out.push(Command::ViewStory);
                }
                if intents.confirm {
                    out.push(Command::StartRun);
                }
            }
            GameState::Story => {
                if intents.confirm {
                    out.push(Command::DismissStory);
                }
            }
            GameState::LevelComplete => {
                if intents.confirm {
                    out.push(Command::ContinueRun);
                }
            }
            GameState::AllComplete | GameState::Lost => {
                if intents.confirm {
                    out.push(Command::RetryRun);
                }
            }
            GameState::Playing => {
                if intents.exit || intents.leave_run {
                    out.push(Command::ExitToMenu);
                }
                match mode {
                    ControlMode::Keyboard => {
                        if intents.confirm || intents.jump {
                            out.push(Command::Jump);
                        }
                    }
                    ControlMode::Gesture => {
                        if signal.take() {
                            out.push(Command::Jump);
                        }
                    }
                }
            }
        }
    }
}
