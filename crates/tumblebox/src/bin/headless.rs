//! # TUMBLEBOX Headless
//!
//! Runs the frame loop without a window at a steady 60 Hz and logs what
//! happened.
//!
//! ```bash
//! # Stock scene, 600 frames (10 simulated seconds)
//! ./tumblebox_headless
//!
//! # Custom config, 1200 frames
//! ./tumblebox_headless scene.toml 1200
//! ```

use std::process::ExitCode;

use tumblebox::core::{Simulation, SimulationConfig};
use tumblebox::shared::TARGET_FPS;
use tumblebox::{AppError, AppResult, GameLoop, GameLoopConfig, RecordingSurface, SteppedClock};

/// Frames run when no count is given.
const DEFAULT_FRAMES: u64 = 600;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "headless run failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> AppResult<()> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => {
            tracing::info!(%path, "loading config");
            SimulationConfig::from_toml_file(&path)?
        }
        None => SimulationConfig::default(),
    };
    let frames = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|err| AppError::Usage(format!("frame count {raw:?}: {err}")))?,
        None => DEFAULT_FRAMES,
    };

    let simulation = Simulation::with_demo_scene(&config)?;
    let mut game_loop = GameLoop::new(
        simulation,
        GameLoopConfig {
            enable_timing_logs: true,
            ..GameLoopConfig::default()
        },
    );

    let mut clock = SteppedClock::from_hz(TARGET_FPS);
    let mut surface = RecordingSurface::new();
    game_loop.run(&mut clock, &mut surface, Some(frames))?;

    for (index, proxy) in surface.last_frame().iter().enumerate() {
        tracing::debug!(
            index,
            x = proxy.position.x,
            y = proxy.position.y,
            rotation = proxy.rotation,
            "final pose"
        );
    }
    Ok(())
}
