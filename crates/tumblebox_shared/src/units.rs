//! # Coordinate Converter
//!
//! Maps between the physics unit space (y up) and the display unit space
//! (y down, origin at the top-left of the surface).
//!
//! ```text
//!   physics (m)          display (px)
//!   ^ y                  +-------> x
//!   |                    |
//!   +-----> x            v y
//! ```
//!
//! Scale conversion and vertical inversion are separate steps: a display
//! position is `invert_height(physics_to_display(p))`.

use serde::{Deserialize, Serialize};

use crate::constants::{GAME_HEIGHT, GAME_WIDTH, PHYSICS_SCALE, PHYSICS_SCALE_INV};
use crate::math::Vec2;

/// Display units per physics unit, with the reciprocal precomputed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitScale {
    per_unit: f32,
    inv: f32,
}

impl UnitScale {
    /// The compiled-in scale (30 display units per physics unit).
    pub const DEFAULT: Self = Self {
        per_unit: PHYSICS_SCALE,
        inv: PHYSICS_SCALE_INV,
    };

    /// Creates a scale of `display_per_physics` display units per physics unit.
    #[must_use]
    pub fn new(display_per_physics: f32) -> Self {
        Self {
            per_unit: display_per_physics,
            inv: 1.0 / display_per_physics,
        }
    }

    /// Display units per physics unit.
    #[inline]
    #[must_use]
    pub const fn display_per_physics(self) -> f32 {
        self.per_unit
    }

    /// Display units -> physics units.
    #[inline]
    #[must_use]
    pub fn to_physics(self, v: Vec2) -> Vec2 {
        v * self.inv
    }

    /// Physics units -> display units.
    #[inline]
    #[must_use]
    pub fn to_display(self, v: Vec2) -> Vec2 {
        v * self.per_unit
    }

    /// Scalar display length -> physics length.
    #[inline]
    #[must_use]
    pub fn length_to_physics(self, len: f32) -> f32 {
        len * self.inv
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Extent of the render surface in display units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Width in display units.
    pub width: f32,
    /// Height in display units.
    pub height: f32,
}

impl Surface {
    /// The compiled-in 700x720 surface.
    pub const DEFAULT: Self = Self {
        width: GAME_WIDTH,
        height: GAME_HEIGHT,
    };

    /// Creates a surface.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Flips the vertical axis: `y' = height - y`. Self-inverse.
    #[inline]
    #[must_use]
    pub fn invert_height(self, p: Vec2) -> Vec2 {
        Vec2::new(p.x, self.height - p.y)
    }

    /// Surface extent as a vector.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Display units -> physics units at the compiled-in scale.
#[inline]
#[must_use]
pub fn display_to_physics(v: Vec2) -> Vec2 {
    UnitScale::DEFAULT.to_physics(v)
}

/// Physics units -> display units at the compiled-in scale.
#[inline]
#[must_use]
pub fn physics_to_display(v: Vec2) -> Vec2 {
    UnitScale::DEFAULT.to_display(v)
}

/// Vertical inversion against the compiled-in surface height.
#[inline]
#[must_use]
pub fn invert_height(p: Vec2) -> Vec2 {
    Surface::DEFAULT.invert_height(p)
}

/// Radians -> degrees.
#[inline]
#[must_use]
pub fn radians_to_degrees(angle: f32) -> f32 {
    angle * (180.0 / std::f32::consts::PI)
}
