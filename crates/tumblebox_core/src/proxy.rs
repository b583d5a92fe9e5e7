//! Drawable proxies - the render-side mirror of each body.
//!
//! A proxy is written only by the simulation's sync pass. Render surfaces
//! read it; nothing else mutates it.

use bytemuck::{Pod, Zeroable};
use tumblebox_shared::{Rgba, Vec2};

/// A renderable rectangle in display units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawableProxy {
    /// Pivot position on the surface (y down).
    pub position: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Clockwise-on-screen rotation in degrees.
    pub rotation: f32,
    /// Pivot offset from the rectangle's top-left corner.
    pub origin: Vec2,
    /// Solid fill.
    pub fill: Rgba,
}

impl DrawableProxy {
    /// Creates a proxy pivoting on its center.
    #[must_use]
    pub fn centered(size: Vec2, fill: Rgba) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
            rotation: 0.0,
            origin: size * 0.5,
            fill,
        }
    }

    /// Same proxy moved to `position`.
    #[must_use]
    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }
}

/// Packed per-proxy instance for GPU-style consumers.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ProxyInstance {
    /// Pivot position (display units).
    pub position: [f32; 2],
    /// Width and height (display units).
    pub size: [f32; 2],
    /// Pivot offset from the top-left corner.
    pub origin: [f32; 2],
    /// Rotation in degrees.
    pub rotation: f32,
    /// RGBA fill.
    pub color: [f32; 4],
}

impl From<&DrawableProxy> for ProxyInstance {
    fn from(proxy: &DrawableProxy) -> Self {
        Self {
            position: proxy.position.to_array(),
            size: proxy.size.to_array(),
            origin: proxy.origin.to_array(),
            rotation: proxy.rotation,
            color: proxy.fill.to_array(),
        }
    }
}
