//! # Body Factory
//!
//! Builds one rigid body with one box collider from a position/size pair in
//! display units. Positions use the physics axis orientation (y up); the
//! vertical flip happens only when syncing proxies.
//!
//! Material presets by mobility:
//!
//! | mobility | density | friction | restitution |
//! |----------|---------|----------|-------------|
//! | dynamic  | 10.0    | 0.8      | 1.0         |
//! | static   | 0.0     | 1.0      | 1.0         |

use tumblebox_shared::{Surface, UnitScale, Vec2};

use crate::error::{SimError, SimResult};
use crate::physics::{BodyHandle, Material, Mobility, PhysicsWorld};
use crate::proxy::DrawableProxy;

/// Material of every dynamic box: heavy, grippy, fully elastic.
pub const DYNAMIC_MATERIAL: Material = Material {
    density: 10.0,
    friction: 0.8,
    restitution: 1.0,
};

/// Material of every static body: immovable, maximal friction, fully elastic.
pub const STATIC_MATERIAL: Material = Material {
    density: 0.0,
    friction: 1.0,
    restitution: 1.0,
};

impl Mobility {
    /// The material preset for this mobility class.
    #[must_use]
    pub fn material(self) -> Material {
        match self {
            Self::Dynamic => DYNAMIC_MATERIAL,
            Self::Static => STATIC_MATERIAL,
        }
    }
}

/// Creates box bodies at a fixed unit scale.
#[derive(Clone, Copy, Debug, Default)]
pub struct BodyFactory {
    scale: UnitScale,
    surface: Surface,
}

impl BodyFactory {
    /// Creates a factory converting with `scale`; `surface` is used only by
    /// the proxy adapter to undo the vertical flip.
    #[must_use]
    pub fn new(scale: UnitScale, surface: Surface) -> Self {
        Self { scale, surface }
    }

    /// Creates a box body centered at `position` with extent `size`.
    ///
    /// # Errors
    ///
    /// `DegenerateBox` when either size component is not finite and positive;
    /// `NonFinitePosition` when the position is not finite.
    pub fn create_box(
        &self,
        world: &mut PhysicsWorld,
        mobility: Mobility,
        position: Vec2,
        size: Vec2,
    ) -> SimResult<BodyHandle> {
        Self::check_box(position, size)?;

        let half_extents = self.scale.to_physics(size) * 0.5;
        let body = world.create_body(mobility, self.scale.to_physics(position));
        world.attach_box(body, half_extents, mobility.material())?;
        Ok(body)
    }

    /// Checks a box's position and size without touching any world.
    ///
    /// # Errors
    ///
    /// Same as [`BodyFactory::create_box`].
    pub fn check_box(position: Vec2, size: Vec2) -> SimResult<()> {
        if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(SimError::DegenerateBox {
                width: size.x,
                height: size.y,
            });
        }
        if !position.is_finite() {
            return Err(SimError::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }
        Ok(())
    }

    /// Creates a box body matching an existing proxy's pose and size.
    ///
    /// The proxy lives in flipped display space, so its position is flipped
    /// back before the regular conversion.
    pub fn create_box_for_proxy(
        &self,
        world: &mut PhysicsWorld,
        mobility: Mobility,
        proxy: &DrawableProxy,
    ) -> SimResult<BodyHandle> {
        let position = self.surface.invert_height(proxy.position);
        self.create_box(world, mobility, position, proxy.size)
    }
}
