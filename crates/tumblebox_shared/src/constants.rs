//! # Compiled-in Simulation Constants
//!
//! Defaults for every tunable in `SimulationConfig`.
//!
//! **NOTE:** These values are baked into the binary. A TOML config overrides
//! them at startup, never mid-run.

// =============================================================================
// SURFACE
// =============================================================================

/// Width of the render surface in display units.
pub const GAME_WIDTH: f32 = 700.0;

/// Height of the render surface in display units.
pub const GAME_HEIGHT: f32 = 720.0;

/// Title of the window opened by the client.
pub const WINDOW_TITLE: &str = "Physics Simulation";

// =============================================================================
// UNIT SCALE
// =============================================================================

/// Display units per physics unit (1 physics unit = 30 display units).
pub const PHYSICS_SCALE: f32 = 30.0;

/// Inverse of [`PHYSICS_SCALE`], useful for display -> physics conversion.
pub const PHYSICS_SCALE_INV: f32 = 1.0 / PHYSICS_SCALE;

// =============================================================================
// SOLVER
// =============================================================================

/// Gravity in physics units per second squared. Positive y is up.
pub const GRAVITY: [f32; 2] = [0.0, -9.8];

/// Velocity-resolution passes per step.
pub const VELOCITY_ITERATIONS: usize = 6;

/// Position-resolution passes per step.
pub const POSITION_ITERATIONS: usize = 2;

/// Frame deltas above this (seconds) are clamped before stepping.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Target frame rate of the presentation loop.
pub const TARGET_FPS: u32 = 60;
