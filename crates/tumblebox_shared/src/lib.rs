//! # TUMBLEBOX Shared
//!
//! Common types used by the simulation core and by every render surface.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - the physics engine
//! - any window, GPU or rendering crate
//!
//! Physics handles live in `tumblebox_core`; drawing lives in `tumblebox`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;
pub mod units;

pub use constants::{
    GAME_HEIGHT, GAME_WIDTH, GRAVITY, MAX_FRAME_DELTA, PHYSICS_SCALE, PHYSICS_SCALE_INV,
    POSITION_ITERATIONS, TARGET_FPS, VELOCITY_ITERATIONS, WINDOW_TITLE,
};
pub use math::{Rgba, Vec2};
pub use units::{
    display_to_physics, invert_height, physics_to_display, radians_to_degrees, Surface, UnitScale,
};
