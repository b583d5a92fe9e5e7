//! # TUMBLEBOX Physics World
//!
//! Wraps the rapier2d boilerplate (pipeline, island manager, phases, sets)
//! behind the handful of calls the simulation needs:
//!
//! - world creation with gravity and solver iteration counts
//! - body creation (static / dynamic) at a position
//! - box collider attachment with density, friction, restitution
//! - one-shot angular impulse
//! - time-stepped advance
//! - per-body pose queries
//!
//! Everything here is in physics units (y up). rapier's vector types never
//! leave this module.

use std::num::NonZeroUsize;

use rapier2d::prelude::*;
use tumblebox_shared::Vec2;

use crate::error::{SimError, SimResult};

// ---------------------------------------------------------------------------
// Conversion helpers (private) - shared Vec2 <-> nalgebra
// ---------------------------------------------------------------------------

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Opaque handle to a body owned by a [`PhysicsWorld`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Whether a body is immovable or subject to forces and collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mobility {
    /// Infinite effective mass; never moves.
    Static,
    /// Integrated every step.
    Dynamic,
}

impl Mobility {
    /// Maps the factory's boolean flag.
    #[must_use]
    pub fn from_dynamic(dynamic: bool) -> Self {
        if dynamic {
            Self::Dynamic
        } else {
            Self::Static
        }
    }

    fn to_rapier(self) -> RigidBodyType {
        match self {
            Self::Static => RigidBodyType::Fixed,
            Self::Dynamic => RigidBodyType::Dynamic,
        }
    }
}

/// Surface material of a collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Mass per unit area; zero for immovable bodies.
    pub density: f32,
    /// Coulomb friction coefficient.
    pub friction: f32,
    /// Bounciness; 1.0 is fully elastic.
    pub restitution: f32,
}

/// Position (physics units) and orientation (radians) of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPose {
    /// Center of the body.
    pub position: Vec2,
    /// Counter-clockwise rotation in radians.
    pub angle: f32,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Owns every rigid body and collider of one simulation.
///
/// No global state: two worlds built the same way and stepped the same way
/// produce the same poses.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Creates an empty world.
    ///
    /// `velocity_iterations` and `position_iterations` bound the solver's work
    /// per step; they are fixed for the world's lifetime.
    #[must_use]
    pub fn new(gravity: Vec2, velocity_iterations: usize, position_iterations: usize) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        integration_parameters.num_internal_stabilization_iterations = position_iterations;

        Self {
            gravity: to_na(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Gravity in physics units per second squared.
    #[must_use]
    pub fn gravity(&self) -> Vec2 {
        from_na(&self.gravity)
    }

    /// Creates a body without colliders at `position`.
    ///
    /// Dynamic bodies get continuous collision detection, so a long step
    /// cannot carry them through a thin static wall.
    pub fn create_body(&mut self, mobility: Mobility, position: Vec2) -> BodyHandle {
        let body = RigidBodyBuilder::new(mobility.to_rapier())
            .translation(to_na(position))
            .ccd_enabled(mobility == Mobility::Dynamic)
            .build();
        BodyHandle(self.bodies.insert(body))
    }

    /// Removes a body together with its colliders.
    pub fn remove_body(&mut self, body: BodyHandle) -> SimResult<()> {
        self.bodies
            .remove(
                body.0,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .map(|_| ())
            .ok_or(SimError::UnknownBody)
    }

    /// Attaches a box collider centered on the body origin.
    ///
    /// Mass properties of the parent are updated immediately, so impulses
    /// applied right after attachment see the final inertia.
    pub fn attach_box(
        &mut self,
        body: BodyHandle,
        half_extents: Vec2,
        material: Material,
    ) -> SimResult<()> {
        if !self.bodies.contains(body.0) {
            return Err(SimError::UnknownBody);
        }
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .density(material.density)
            .friction(material.friction)
            .restitution(material.restitution)
            .build();
        self.colliders
            .insert_with_parent(collider, body.0, &mut self.bodies);
        Ok(())
    }

    /// Applies an instantaneous change of angular momentum.
    ///
    /// No effect on static bodies.
    pub fn apply_angular_impulse(&mut self, body: BodyHandle, impulse: f32) -> SimResult<()> {
        let rb = self.bodies.get_mut(body.0).ok_or(SimError::UnknownBody)?;
        rb.apply_torque_impulse(impulse, true);
        Ok(())
    }

    /// Advances the world by `dt` seconds. Non-positive `dt` is a no-op.
    pub fn step(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Current pose of a body.
    pub fn pose(&self, body: BodyHandle) -> SimResult<BodyPose> {
        let rb = self.bodies.get(body.0).ok_or(SimError::UnknownBody)?;
        Ok(BodyPose {
            position: from_na(rb.translation()),
            angle: rb.rotation().angle(),
        })
    }

    /// Current angular velocity in radians per second.
    pub fn angular_velocity(&self, body: BodyHandle) -> SimResult<f32> {
        self.bodies
            .get(body.0)
            .map(RigidBody::angvel)
            .ok_or(SimError::UnknownBody)
    }

    /// Current linear velocity in physics units per second.
    pub fn linear_velocity(&self, body: BodyHandle) -> SimResult<Vec2> {
        self.bodies
            .get(body.0)
            .map(|rb| from_na(rb.linvel()))
            .ok_or(SimError::UnknownBody)
    }

    /// Whether continuous collision detection is on for a body.
    pub fn is_ccd_enabled(&self, body: BodyHandle) -> SimResult<bool> {
        self.bodies
            .get(body.0)
            .map(RigidBody::is_ccd_enabled)
            .ok_or(SimError::UnknownBody)
    }

    /// Mobility class of a body.
    pub fn mobility(&self, body: BodyHandle) -> SimResult<Mobility> {
        let rb = self.bodies.get(body.0).ok_or(SimError::UnknownBody)?;
        Ok(if rb.is_dynamic() {
            Mobility::Dynamic
        } else {
            Mobility::Static
        })
    }

    /// Number of bodies in the world.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders in the world.
    #[must_use]
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("gravity", &self.gravity())
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .finish_non_exhaustive()
    }
}
