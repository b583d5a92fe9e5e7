//! # Simulation Error Types
//!
//! All errors that can occur while building or configuring a simulation.
//! Stepping itself has no failure modes; bad deltas are clamped, not rejected.

use thiserror::Error;

/// Errors that can occur in the simulation core.
#[derive(Error, Debug)]
pub enum SimError {
    /// Box size with a zero, negative or non-finite dimension.
    #[error("degenerate box size {width}x{height}: both dimensions must be finite and > 0")]
    DegenerateBox {
        /// Requested width (display units).
        width: f32,
        /// Requested height (display units).
        height: f32,
    },

    /// Body position with a non-finite component.
    #[error("non-finite body position ({x}, {y})")]
    NonFinitePosition {
        /// Requested x (display units).
        x: f32,
        /// Requested y (display units).
        y: f32,
    },

    /// The scene was already populated; a second pass would break the pairing.
    #[error("scene already populated with {0} bodies")]
    SceneAlreadyPopulated(usize),

    /// A handle that does not belong to this world.
    #[error("unknown body handle")]
    UnknownBody,

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
