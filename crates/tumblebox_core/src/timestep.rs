//! # Timestep Policy
//!
//! Turns wall-clock frame deltas into physics steps.
//!
//! - `Variable`: one step per frame, by exactly the elapsed time. Smooth, but
//!   results depend on frame rate and are not reproducible run to run.
//! - `Fixed`: an accumulator hands out whole steps of a constant size and
//!   carries the remainder to the next frame. Reproducible for a given
//!   sequence of deltas.
//!
//! Both modes first sanitize the delta: negative or NaN becomes zero, anything
//! above `max_frame_delta` is clamped.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Slack when dividing the accumulator, so 1/60 + 1/60 yields two 1/60 steps.
const ACCUMULATOR_EPSILON: f32 = 1e-4;

/// How frame time is turned into physics steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimestepMode {
    /// Step by the elapsed frame time.
    #[default]
    Variable,
    /// Step in constant increments from an accumulator.
    Fixed {
        /// Step size in seconds.
        step: f32,
        /// Upper bound on steps per frame; older backlog is dropped.
        max_substeps: u32,
    },
}

impl TimestepMode {
    /// Fixed mode at `hz` steps per second with a backlog cap of 8 steps.
    #[must_use]
    pub fn fixed_hz(hz: f32) -> Self {
        Self::Fixed {
            step: 1.0 / hz,
            max_substeps: 8,
        }
    }

    pub(crate) fn validate(self) -> SimResult<()> {
        match self {
            Self::Variable => Ok(()),
            Self::Fixed { step, max_substeps } => {
                if !(step.is_finite() && step > 0.0) {
                    return Err(SimError::InvalidConfig(format!(
                        "fixed step must be > 0, got {step}"
                    )));
                }
                if max_substeps == 0 {
                    return Err(SimError::InvalidConfig(
                        "max_substeps must be at least 1".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Physics work for one frame: `steps` advances of `dt` seconds each.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepPlan {
    /// Number of physics steps to run.
    pub steps: u32,
    /// Size of each step in seconds.
    pub dt: f32,
}

impl StepPlan {
    /// No physics work this frame.
    pub const IDLE: Self = Self { steps: 0, dt: 0.0 };

    /// Total simulated time covered by this plan.
    #[must_use]
    pub fn simulated(self) -> f32 {
        self.steps as f32 * self.dt
    }
}

/// Per-simulation timestep state.
#[derive(Clone, Debug)]
pub struct Stepper {
    mode: TimestepMode,
    max_frame_delta: f32,
    accumulator: f32,
}

impl Stepper {
    /// Creates a stepper for `mode`, clamping deltas at `max_frame_delta`.
    #[must_use]
    pub fn new(mode: TimestepMode, max_frame_delta: f32) -> Self {
        Self {
            mode,
            max_frame_delta,
            accumulator: 0.0,
        }
    }

    /// The active mode.
    #[must_use]
    pub fn mode(&self) -> TimestepMode {
        self.mode
    }

    /// Unconsumed time carried to the next frame (fixed mode only).
    #[must_use]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Clamps a raw frame delta into `0.0..=max_frame_delta`.
    #[must_use]
    pub fn sanitize(&self, delta: f32) -> f32 {
        if delta.is_nan() || delta < 0.0 {
            tracing::warn!(delta, "rejected frame delta, clamping to zero");
            return 0.0;
        }
        if delta > self.max_frame_delta {
            tracing::debug!(delta, max = self.max_frame_delta, "clamped long frame delta");
            return self.max_frame_delta;
        }
        delta
    }

    /// Plans the physics work for a frame that took `delta` seconds.
    pub fn plan(&mut self, delta: f32) -> StepPlan {
        let delta = self.sanitize(delta);

        match self.mode {
            TimestepMode::Variable => {
                if delta > 0.0 {
                    StepPlan { steps: 1, dt: delta }
                } else {
                    StepPlan::IDLE
                }
            }
            TimestepMode::Fixed { step, max_substeps } => {
                self.accumulator += delta;
                let due = ((self.accumulator + step * ACCUMULATOR_EPSILON) / step).floor();
                // `due` is a small non-negative whole number here
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let mut steps = due as u32;

                if steps > max_substeps {
                    tracing::warn!(
                        due = steps,
                        max_substeps,
                        "fixed-step backlog dropped"
                    );
                    steps = max_substeps;
                    self.accumulator = 0.0;
                } else {
                    self.accumulator = (self.accumulator - steps as f32 * step).max(0.0);
                }

                StepPlan { steps, dt: step }
            }
        }
    }
}
