#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Webcam open-hand detection feeding debounced jump signals.
//!
//! The sampler runs on its own thread at its own cadence, fully isolated
//! from the tick loop except for one mutex-guarded boolean slot. Camera
//! frames and hand landmarks come from collaborator traits so the pipeline
//! runs identically against real hardware, the scripted feeds in
//! [`scripted`], and the test suites.

pub mod scripted;

use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// Pause between successive sampling cycles, roughly 50 Hz.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(20);

/// Minimum pause between two accepted open-hand edges.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Number of landmarks the hand-pose model reports per hand.
pub const LANDMARKS_PER_HAND: usize = 21;

/// Landmark indices of the index, middle, ring and pinky fingertips.
pub const FINGERTIP_INDICES: [usize; 4] = [8, 12, 16, 20];

/// Landmark indices of the base knuckles matching [`FINGERTIP_INDICES`].
pub const KNUCKLE_INDICES: [usize; 4] = [5, 9, 13, 17];

/// Capture parameters requested from the camera collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraConfig {
    width: u32,
    height: u32,
    frames_per_second: u32,
}

impl CameraConfig {
    /// Creates a new capture configuration.
    #[must_use]
    pub const fn new(width: u32, height: u32, frames_per_second: u32) -> Self {
        Self {
            width,
            height,
            frames_per_second,
        }
    }

    /// Requested frame width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Requested frame height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Requested capture rate in frames per second.
    #[must_use]
    pub const fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new(320, 240, 30)
    }
}

/// A single captured camera frame of tightly packed RGB bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CameraFrame {
    /// Wraps a pixel buffer captured at the provided dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len() as u64, u64::from(width) * u64::from(height) * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Frame width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGB pixel data.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// A single normalised hand landmark. The origin sits in the top-left
/// corner of the frame, so smaller `y` values are higher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    x: f32,
    y: f32,
}

impl Landmark {
    /// Creates a new landmark from normalised frame coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal position in the range 0.0..=1.0.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical position in the range 0.0..=1.0.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// The full landmark set the hand-pose model reports for one hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARKS_PER_HAND],
}

impl HandLandmarks {
    /// Creates a landmark set from the conventional 21-point layout.
    #[must_use]
    pub const fn from_points(points: [Landmark; LANDMARKS_PER_HAND]) -> Self {
        Self { points }
    }

    /// Retrieves a single landmark by model index.
    #[must_use]
    pub const fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    /// Returns a copy of the landmark set with one point replaced.
    #[must_use]
    pub fn with_point(mut self, index: usize, landmark: Landmark) -> Self {
        self.points[index] = landmark;
        self
    }
}

/// Classifies a hand pose as "open".
///
/// A hand is open when at least three of the four tracked fingertips sit
/// vertically above their base knuckles.
#[must_use]
pub fn is_open_hand(hand: &HandLandmarks) -> bool {
    let raised = FINGERTIP_INDICES
        .iter()
        .zip(KNUCKLE_INDICES.iter())
        .filter(|(tip, knuckle)| hand.point(**tip).y() < hand.point(**knuckle).y())
        .count();
    raised >= 3
}

/// Collaborator that produces camera frames on demand.
///
/// Returning `None` means the frame was not available this cycle; the
/// sampler skips the cycle without surfacing an error. Permanent camera
/// unavailability is decided once at startup by whoever constructs the
/// feed, not by this trait.
pub trait CameraFeed {
    /// Captures the next frame, if one is available.
    fn capture(&mut self) -> Option<CameraFrame>;
}

/// Collaborator that locates hand landmarks within a frame.
pub trait HandTracker {
    /// Detects at most one hand in the frame. `None` means no hand.
    fn detect(&mut self, frame: &CameraFrame) -> Option<HandLandmarks>;
}

/// One-slot jump signal shared between the sampler and the input router.
///
/// Take-and-clear semantics, not a queue: edges raised faster than the
/// consumer drains them coalesce into a single jump intent by design.
#[derive(Debug, Default)]
pub struct GestureSignal {
    flag: Mutex<bool>,
}

impl GestureSignal {
    /// Creates a new, lowered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches the signal. Never blocks on the consumer.
    pub fn raise(&self) {
        let mut flag = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
        *flag = true;
    }

    /// Atomically reads and clears the signal.
    #[must_use]
    pub fn take(&self) -> bool {
        let mut flag = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *flag, false)
    }
}

/// Rising-edge filter with a minimum pause between accepted edges.
#[derive(Debug)]
pub struct EdgeDebouncer {
    window: Duration,
    last_state: bool,
    last_accepted: Option<Instant>,
}

impl EdgeDebouncer {
    /// Creates a debouncer with the provided minimum pause.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_state: false,
            last_accepted: None,
        }
    }

    /// Feeds one sample into the filter, returning `true` when the sample
    /// is an accepted rising edge. Falling edges and sustained detection
    /// never trigger; rising edges within the pause window are dropped.
    pub fn observe(&mut self, detected: bool, now: Instant) -> bool {
        let rising = detected && !self.last_state;
        self.last_state = detected;
        if !rising {
            return false;
        }
        if let Some(accepted) = self.last_accepted {
            if now.duration_since(accepted) < self.window {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

impl Default for EdgeDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

/// Background worker that samples the camera and raises the jump signal.
#[derive(Debug)]
pub struct GestureSampler<C, T> {
    camera: C,
    tracker: T,
    signal: Arc<GestureSignal>,
    running: Arc<AtomicBool>,
    debouncer: EdgeDebouncer,
}

impl<C, T> GestureSampler<C, T>
where
    C: CameraFeed + Send + 'static,
    T: HandTracker + Send + 'static,
{
    /// Starts the sampling thread over an already-open camera feed.
    ///
    /// The thread observes the shared running flag on its own cadence and
    /// exits cooperatively; dropping the handle detaches the worker.
    pub fn spawn(
        camera: C,
        tracker: T,
        signal: Arc<GestureSignal>,
        running: Arc<AtomicBool>,
    ) -> io::Result<JoinHandle<()>> {
        let sampler = Self {
            camera,
            tracker,
            signal,
            running,
            debouncer: EdgeDebouncer::default(),
        };
        thread::Builder::new()
            .name("gesture-sampler".into())
            .spawn(move || sampler.run())
    }

    fn run(mut self) {
        while self.running.load(Ordering::Relaxed) {
            self.cycle(Instant::now());
            thread::sleep(SAMPLE_INTERVAL);
        }
        log::debug!("gesture sampler stopped");
    }

    fn cycle(&mut self, now: Instant) {
        // A missed frame skips the cycle; the sleep bounds the retry rate.
        let Some(frame) = self.camera.capture() else {
            return;
        };
        let detected = self
            .tracker
            .detect(&frame)
            .map_or(false, |hand| is_open_hand(&hand));
        if self.debouncer.observe(detected, now) {
            self.signal.raise();
            log::debug!("open-hand edge accepted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::{fist_landmarks, open_hand_landmarks};

    fn with_fingers_raised(raised: usize) -> HandLandmarks {
        let mut hand = fist_landmarks();
        for (tip, knuckle) in FINGERTIP_INDICES.iter().zip(KNUCKLE_INDICES.iter()).take(raised) {
            let knuckle_y = hand.point(*knuckle).y();
            hand = hand.with_point(*tip, Landmark::new(hand.point(*tip).x(), knuckle_y - 0.2));
        }
        hand
    }

    #[test]
    fn open_hand_requires_three_raised_fingertips() {
        assert!(is_open_hand(&open_hand_landmarks()));
        assert!(!is_open_hand(&fist_landmarks()));
        assert!(!is_open_hand(&with_fingers_raised(2)));
        assert!(is_open_hand(&with_fingers_raised(3)));
        assert!(is_open_hand(&with_fingers_raised(4)));
    }

    #[test]
    fn edges_inside_the_debounce_window_are_dropped() {
        let base = Instant::now();
        let mut debouncer = EdgeDebouncer::new(DEBOUNCE_WINDOW);

        assert!(debouncer.observe(true, base));
        assert!(!debouncer.observe(false, base + Duration::from_millis(50)));
        // Second rising edge only 100 ms after the first.
        assert!(!debouncer.observe(true, base + Duration::from_millis(100)));
    }

    #[test]
    fn edges_outside_the_debounce_window_both_trigger() {
        let base = Instant::now();
        let mut debouncer = EdgeDebouncer::new(DEBOUNCE_WINDOW);

        assert!(debouncer.observe(true, base));
        assert!(!debouncer.observe(false, base + Duration::from_millis(200)));
        // Second rising edge 400 ms after the first.
        assert!(debouncer.observe(true, base + Duration::from_millis(400)));
    }

    #[test]
    fn the_window_boundary_itself_is_accepted() {
        let base = Instant::now();
        let mut debouncer = EdgeDebouncer::new(DEBOUNCE_WINDOW);

        assert!(debouncer.observe(true, base));
        assert!(!debouncer.observe(false, base + Duration::from_millis(150)));
        assert!(debouncer.observe(true, base + DEBOUNCE_WINDOW));
    }

    #[test]
    fn sustained_detection_triggers_once() {
        let base = Instant::now();
        let mut debouncer = EdgeDebouncer::new(DEBOUNCE_WINDOW);

        assert!(debouncer.observe(true, base));
        for sample in 1..40u64 {
            assert!(!debouncer.observe(true, base + Duration::from_millis(20 * sample)));
        }
    }

    #[test]
    fn the_signal_coalesces_rapid_edges() {
        let signal = GestureSignal::new();
        assert!(!signal.take());

        signal.raise();
        signal.raise();
        assert!(signal.take());
        assert!(!signal.take());
    }
}
