#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Spellrun experience.

mod session;

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spellrun_rendering::{Presentation, RenderingBackend, Scene};
use spellrun_rendering_macroquad::{MacroquadBackend, Theme};
use spellrun_system_gesture::{
    scripted::{ScriptedCamera, ScriptedTracker},
    CameraConfig, GestureSampler, GestureSignal,
};

use crate::session::Session;

/// Flags accepted by the `spellrun` binary.
#[derive(Debug, Parser)]
#[command(name = "spellrun", about = "Gesture-controlled spell-collecting runner")]
struct Args {
    /// Seed for the deterministic spawn schedule. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Print frame rate metrics once per second.
    #[arg(long)]
    show_fps: bool,

    /// Render as fast as possible instead of waiting for vsync.
    #[arg(long)]
    no_vsync: bool,

    /// Path to a TOML theme file overriding the built-in palette.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Drive the gesture pipeline from a scripted open-hand pulse instead
    /// of camera hardware.
    #[arg(long)]
    gesture_demo: bool,
}

/// Entry point for the Spellrun command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let theme = match &args.theme {
        Some(path) => Theme::load(path)
            .with_context(|| format!("loading theme file {}", path.display()))?,
        None => Theme::default(),
    };

    // One published seed reproduces the whole spawn schedule.
    let session_seed = args.seed.unwrap_or_else(rand::random);
    let mut seed_rng = ChaCha8Rng::seed_from_u64(session_seed);
    let spawn_seed: u64 = seed_rng.gen();
    log::info!("session seed {session_seed:#018x}");

    let signal = Arc::new(GestureSignal::new());
    let running = Arc::new(AtomicBool::new(true));
    let mut session = Session::new(spawn_seed, theme.sprite_count(), Arc::clone(&signal));

    if args.gesture_demo {
        // Open hand for half a second out of every two, at sampler cadence.
        let camera = ScriptedCamera::endless(CameraConfig::default());
        let tracker = ScriptedTracker::pulsing(25, 75);
        let _detached = GestureSampler::spawn(
            camera,
            tracker,
            Arc::clone(&signal),
            Arc::clone(&running),
        )
        .context("starting the gesture sampler")?;
        log::info!("gesture rehearsal feed running");
    } else {
        // No camera collaborator is wired on this platform; the check runs
        // once at startup and the session degrades for its whole lifetime.
        log::warn!("camera unavailable - wand (keyboard) controls only");
        session.force_keyboard();
    }

    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_theme(theme.clone());

    let presentation = Presentation {
        window_title: "Spellrun: The Forbidden Run".to_string(),
        clear_color: theme.background(),
        scene: Scene::default(),
    };

    let result = backend.run(presentation, move |dt, input, scene| {
        session.frame(dt, input, scene)
    });
    running.store(false, Ordering::Relaxed);
    result
}
