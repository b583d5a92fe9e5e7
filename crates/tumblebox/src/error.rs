//! Frame loop errors.

use thiserror::Error;
use tumblebox_core::SimError;

/// Errors that end the frame loop.
#[derive(Error, Debug)]
pub enum AppError {
    /// The simulation rejected its config or scene.
    #[error("simulation error: {0}")]
    Sim(#[from] SimError),

    /// The render surface failed to clear, draw or present.
    #[error("render surface error: {0}")]
    Surface(String),

    /// Bad command-line arguments.
    #[error("usage error: {0}")]
    Usage(String),
}

/// Result type for the frame loop.
pub type AppResult<T> = Result<T, AppError>;
