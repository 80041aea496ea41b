//! Scripted camera and tracker collaborators.
//!
//! These stand in for real capture hardware in two places: the test suites,
//! and the binary's gesture rehearsal mode, which pulses an open hand on a
//! fixed cadence so the full sampler-to-jump pipeline can be exercised
//! without a webcam.

use std::collections::VecDeque;

use crate::{
    CameraConfig, CameraFeed, CameraFrame, HandLandmarks, HandTracker, Landmark,
    FINGERTIP_INDICES, KNUCKLE_INDICES, LANDMARKS_PER_HAND,
};

/// Landmark set describing an open hand: every tracked fingertip sits
/// above its base knuckle.
#[must_use]
pub fn open_hand_landmarks() -> HandLandmarks {
    let mut points = [Landmark::new(0.5, 0.5); LANDMARKS_PER_HAND];
    for knuckle in KNUCKLE_INDICES {
        points[knuckle] = Landmark::new(0.5, 0.55);
    }
    for tip in FINGERTIP_INDICES {
        points[tip] = Landmark::new(0.5, 0.35);
    }
    HandLandmarks::from_points(points)
}

/// Landmark set describing a fist: every tracked fingertip curls below
/// its base knuckle.
#[must_use]
pub fn fist_landmarks() -> HandLandmarks {
    let mut points = [Landmark::new(0.5, 0.5); LANDMARKS_PER_HAND];
    for knuckle in KNUCKLE_INDICES {
        points[knuckle] = Landmark::new(0.5, 0.55);
    }
    for tip in FINGERTIP_INDICES {
        points[tip] = Landmark::new(0.5, 0.75);
    }
    HandLandmarks::from_points(points)
}

fn blank_frame(config: CameraConfig) -> CameraFrame {
    let length = config.width() as usize * config.height() as usize * 3;
    CameraFrame::new(config.width(), config.height(), vec![0; length])
}

/// Camera feed that replays a fixed capture script.
#[derive(Debug)]
pub struct ScriptedCamera {
    script: VecDeque<Option<CameraFrame>>,
    endless: Option<CameraFrame>,
}

impl ScriptedCamera {
    /// Replays the provided captures in order, then reports missed frames
    /// forever. `None` entries model capture failures.
    #[must_use]
    pub fn from_script(script: Vec<Option<CameraFrame>>) -> Self {
        Self {
            script: script.into(),
            endless: None,
        }
    }

    /// Produces an endless stream of blank frames at the configured size.
    #[must_use]
    pub fn endless(config: CameraConfig) -> Self {
        Self {
            script: VecDeque::new(),
            endless: Some(blank_frame(config)),
        }
    }

    /// A script of `count` blank frames at the configured size.
    #[must_use]
    pub fn blank_frames(config: CameraConfig, count: usize) -> Self {
        Self::from_script((0..count).map(|_| Some(blank_frame(config))).collect())
    }
}

impl CameraFeed for ScriptedCamera {
    fn capture(&mut self) -> Option<CameraFrame> {
        if let Some(scripted) = self.script.pop_front() {
            return scripted;
        }
        self.endless.clone()
    }
}

/// Hand tracker that replays a fixed detection script.
#[derive(Debug)]
pub struct ScriptedTracker {
    script: VecDeque<bool>,
    pulse: Option<Pulse>,
    cycle: u64,
}

#[derive(Clone, Copy, Debug)]
struct Pulse {
    open_cycles: u64,
    period: u64,
}

impl ScriptedTracker {
    /// Replays the provided detections in order (`true` is an open hand,
    /// `false` a fist), then reports no hand forever.
    #[must_use]
    pub fn from_script(script: Vec<bool>) -> Self {
        Self {
            script: script.into(),
            pulse: None,
            cycle: 0,
        }
    }

    /// Reports an open hand for `open_cycles` detections out of every
    /// `open_cycles + closed_cycles`, indefinitely.
    #[must_use]
    pub fn pulsing(open_cycles: u64, closed_cycles: u64) -> Self {
        Self {
            script: VecDeque::new(),
            pulse: Some(Pulse {
                open_cycles,
                period: open_cycles + closed_cycles,
            }),
            cycle: 0,
        }
    }
}

impl HandTracker for ScriptedTracker {
    fn detect(&mut self, _frame: &CameraFrame) -> Option<HandLandmarks> {
        if let Some(open) = self.script.pop_front() {
            return Some(if open {
                open_hand_landmarks()
            } else {
                fist_landmarks()
            });
        }
        let pulse = self.pulse?;
        let phase = self.cycle % pulse.period.max(1);
        self.cycle = self.cycle.wrapping_add(1);
        if phase < pulse.open_cycles {
            Some(open_hand_landmarks())
        } else {
            Some(fist_landmarks())
        }
    }
}
