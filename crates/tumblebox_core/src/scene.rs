//! # Demo Scene Layout
//!
//! The fixed scene as plain data: a row of spinning dynamic boxes and four
//! static walls enclosing the surface.
//!
//! ```text
//!  +==========================+   <- wall (ceiling)
//!  ||                        ||
//!  ||  []  []  []  ...  []   ||   <- box row at 70% height
//!  ||                        ||
//!  ||                        ||
//!  +==========================+   <- wall (floor)
//! ```
//!
//! Positions are display units with the physics axis orientation (y up from
//! the bottom edge), exactly what `BodyFactory::create_box` expects.

use tumblebox_shared::{Rgba, Surface, Vec2};

use crate::config::SceneConfig;
use crate::physics::Mobility;

/// One body-and-proxy to create.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxPlacement {
    /// Static wall or dynamic box.
    pub mobility: Mobility,
    /// Center (display units, y up).
    pub position: Vec2,
    /// Extent (display units).
    pub size: Vec2,
    /// Proxy fill.
    pub fill: Rgba,
    /// One-time angular impulse applied right after creation.
    pub spin: Option<f32>,
}

/// Builds the full scene: boxes first, then walls.
///
/// Order matters: it is the pairing order and therefore the draw order, so
/// walls end up drawn on top of boxes.
#[must_use]
pub fn demo_layout(scene: &SceneConfig, surface: Surface) -> Vec<BoxPlacement> {
    let mut placements = Vec::with_capacity(scene.box_count + 4);
    placements.extend(box_row(scene, surface));
    placements.extend(walls(scene, surface));
    placements
}

/// Dynamic boxes evenly spaced across the surface width.
fn box_row(scene: &SceneConfig, surface: Surface) -> impl Iterator<Item = BoxPlacement> + '_ {
    let spacing = surface.width / (scene.box_count + 2) as f32;
    let y = surface.height * scene.row_height_ratio;
    let size = Vec2::new(scene.box_size, scene.box_size);

    (1..=scene.box_count).map(move |i| BoxPlacement {
        mobility: Mobility::Dynamic,
        position: Vec2::new(i as f32 * spacing, y),
        size,
        fill: scene.box_color,
        spin: Some(scene.spin_impulse),
    })
}

/// Floor, ceiling, left and right walls hugging the surface edges.
fn walls(scene: &SceneConfig, surface: Surface) -> [BoxPlacement; 4] {
    let (w, h, t) = (surface.width, surface.height, scene.wall_thickness);
    let half = t * 0.5;
    let wall = |position: Vec2, size: Vec2| BoxPlacement {
        mobility: Mobility::Static,
        position,
        size,
        fill: scene.wall_color,
        spin: None,
    };

    [
        wall(Vec2::new(w * 0.5, half), Vec2::new(w, t)),
        wall(Vec2::new(w * 0.5, h - half), Vec2::new(w, t)),
        wall(Vec2::new(half, h * 0.5), Vec2::new(t, h)),
        wall(Vec2::new(w - half, h * 0.5), Vec2::new(t, h)),
    ]
}
