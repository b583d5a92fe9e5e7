//! # TUMBLEBOX Simulation
//!
//! Owns the physics world and the ordered body/proxy pairs.
//!
//! ```text
//! advance(frame_delta):
//!   1. Stepper turns the delta into a StepPlan (variable or fixed)
//!   2. PhysicsWorld::step runs plan.steps times
//!   3. sync: for each pair, pose -> display units -> flip y -> proxy
//! ```
//!
//! Pairs live in one `Vec`, so a body and its proxy can never drift apart.
//! The only way to add pairs is `populate_demo_scene`, which runs once.

use tumblebox_shared::{radians_to_degrees, Surface, UnitScale, Vec2};

use crate::body::BodyFactory;
use crate::config::{SceneConfig, SimulationConfig};
use crate::error::{SimError, SimResult};
use crate::physics::{BodyHandle, BodyPose, Mobility, PhysicsWorld};
use crate::proxy::{DrawableProxy, ProxyInstance};
use crate::scene::{demo_layout, BoxPlacement};
use crate::timestep::{StepPlan, Stepper};

/// A body and the proxy that mirrors it.
#[derive(Clone, Copy, Debug)]
pub struct BodyProxyPair {
    body: BodyHandle,
    proxy: DrawableProxy,
}

impl BodyProxyPair {
    /// The physics side.
    #[must_use]
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// The render side.
    #[must_use]
    pub fn proxy(&self) -> &DrawableProxy {
        &self.proxy
    }
}

/// The simulation-and-sync loop state. No globals: build as many as you like.
#[derive(Debug)]
pub struct Simulation {
    world: PhysicsWorld,
    pairs: Vec<BodyProxyPair>,
    factory: BodyFactory,
    scale: UnitScale,
    surface: Surface,
    stepper: Stepper,
    simulated_time: f64,
    steps_taken: u64,
}

impl Simulation {
    /// Creates an empty simulation (no bodies) from a validated config.
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let scale = config.unit_scale();

        Ok(Self {
            world: PhysicsWorld::new(
                config.gravity,
                config.velocity_iterations,
                config.position_iterations,
            ),
            pairs: Vec::new(),
            factory: BodyFactory::new(scale, config.surface),
            scale,
            surface: config.surface,
            stepper: Stepper::new(config.timestep, config.max_frame_delta),
            simulated_time: 0.0,
            steps_taken: 0,
        })
    }

    /// Creates a simulation and populates the demo scene.
    pub fn with_demo_scene(config: &SimulationConfig) -> SimResult<Self> {
        let mut sim = Self::new(config)?;
        sim.populate_demo_scene(&config.scene)?;
        Ok(sim)
    }

    /// Builds the fixed scene: spinning boxes, then walls.
    ///
    /// All or nothing: on any error the simulation is left empty and a
    /// corrected scene can be populated afterwards.
    ///
    /// # Errors
    ///
    /// `SceneAlreadyPopulated` if any pair exists; a second pass would
    /// duplicate every body. `InvalidConfig`, `DegenerateBox` or
    /// `NonFinitePosition` for a layout that cannot be built.
    pub fn populate_demo_scene(&mut self, scene: &SceneConfig) -> SimResult<()> {
        if !self.pairs.is_empty() {
            return Err(SimError::SceneAlreadyPopulated(self.pairs.len()));
        }
        scene.validate(self.surface)?;

        let placements = demo_layout(scene, self.surface);
        for placement in &placements {
            BodyFactory::check_box(placement.position, placement.size)?;
        }

        self.pairs.reserve(placements.len());
        for placement in &placements {
            if let Err(err) = self.spawn(placement) {
                self.clear_pairs();
                return Err(err);
            }
        }

        tracing::info!(
            boxes = scene.box_count,
            walls = placements.len() - scene.box_count,
            "demo scene populated"
        );
        Ok(())
    }

    /// Creates one body, applies its spin, and appends its proxy.
    fn spawn(&mut self, placement: &BoxPlacement) -> SimResult<()> {
        let body = self
            .factory
            .create_box(&mut self.world, placement.mobility, placement.position, placement.size)?;
        if let Some(impulse) = placement.spin {
            self.world.apply_angular_impulse(body, impulse)?;
        }

        let pose = self.world.pose(body)?;
        let (position, rotation) = to_screen(self.scale, self.surface, pose);
        let mut proxy = DrawableProxy::centered(placement.size, placement.fill).at(position);
        proxy.rotation = rotation;

        self.pairs.push(BodyProxyPair { body, proxy });
        Ok(())
    }

    /// Drops every pair and its body.
    fn clear_pairs(&mut self) {
        for pair in self.pairs.drain(..) {
            if self.world.remove_body(pair.body).is_err() {
                tracing::error!(body = ?pair.body, "pair references a body outside its world");
            }
        }
    }

    /// Advances by one frame's elapsed wall-clock time, then syncs proxies.
    ///
    /// Negative or NaN deltas step nothing; proxies are still synced.
    pub fn advance(&mut self, frame_delta: f32) -> StepPlan {
        let plan = self.stepper.plan(frame_delta);
        for _ in 0..plan.steps {
            self.world.step(plan.dt);
        }
        self.steps_taken += u64::from(plan.steps);
        self.simulated_time += f64::from(plan.simulated());
        self.sync_proxies();
        plan
    }

    /// Copies every body's pose into its proxy.
    pub fn sync_proxies(&mut self) {
        for pair in &mut self.pairs {
            let Ok(pose) = self.world.pose(pair.body) else {
                tracing::error!(body = ?pair.body, "pair references a body outside its world");
                continue;
            };
            let (position, rotation) = to_screen(self.scale, self.surface, pose);
            pair.proxy.position = position;
            pair.proxy.rotation = rotation;
        }
    }

    /// Proxies in pairing (draw) order.
    pub fn proxies(&self) -> impl ExactSizeIterator<Item = &DrawableProxy> + '_ {
        self.pairs.iter().map(|pair| &pair.proxy)
    }

    /// All pairs in order.
    #[must_use]
    pub fn pairs(&self) -> &[BodyProxyPair] {
        &self.pairs
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True before the scene is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Physics pose of the body at `index`.
    pub fn body_pose(&self, index: usize) -> SimResult<BodyPose> {
        self.world.pose(self.handle(index)?)
    }

    /// Angular velocity of the body at `index`.
    pub fn angular_velocity(&self, index: usize) -> SimResult<f32> {
        self.world.angular_velocity(self.handle(index)?)
    }

    /// Mobility of the body at `index`.
    pub fn mobility(&self, index: usize) -> SimResult<Mobility> {
        self.world.mobility(self.handle(index)?)
    }

    fn handle(&self, index: usize) -> SimResult<BodyHandle> {
        self.pairs
            .get(index)
            .map(|pair| pair.body)
            .ok_or(SimError::UnknownBody)
    }

    /// Writes packed render instances for every proxy into `out`.
    pub fn extract_instances(&self, out: &mut Vec<ProxyInstance>) {
        out.clear();
        out.extend(self.proxies().map(ProxyInstance::from));
    }

    /// The physics world.
    #[must_use]
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Render surface extent.
    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Total simulated seconds so far.
    #[must_use]
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    /// Total physics steps so far.
    #[must_use]
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }
}

/// Physics pose -> display position (flipped) and rotation in degrees.
fn to_screen(scale: UnitScale, surface: Surface, pose: BodyPose) -> (Vec2, f32) {
    let position = surface.invert_height(scale.to_display(pose.position));
    (position, radians_to_degrees(pose.angle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumblebox_shared::Rgba;

    const EPS: f32 = 1e-3;

    fn demo() -> Simulation {
        Simulation::with_demo_scene(&SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_pairing_invariant_after_init() {
        let sim = demo();
        assert_eq!(sim.len(), 14);
        assert_eq!(sim.world().body_count(), sim.len());
        assert_eq!(sim.proxies().len(), sim.len());

        for (i, pair) in sim.pairs().iter().enumerate() {
            let pose = sim.body_pose(i).unwrap();
            let expected = Surface::DEFAULT
                .invert_height(UnitScale::DEFAULT.to_display(pose.position));
            assert!(pair.proxy().position.distance(expected) < EPS, "pair {i}");
        }
    }

    #[test]
    fn test_initial_proxies() {
        let sim = demo();
        let proxies: Vec<_> = sim.proxies().copied().collect();

        // First box: x = 700/12, y flipped from 504 to 216.
        assert!(proxies[0].position.distance(Vec2::new(700.0 / 12.0, 216.0)) < EPS);
        assert_eq!(proxies[0].size, Vec2::new(50.0, 50.0));
        assert_eq!(proxies[0].origin, Vec2::new(25.0, 25.0));
        assert_eq!(proxies[0].fill, Rgba::WHITE);

        // Floor wall is drawn at the bottom of the screen.
        assert!(proxies[10].position.distance(Vec2::new(350.0, 710.0)) < EPS);
        assert_eq!(proxies[10].origin, Vec2::new(350.0, 10.0));
        assert_eq!(proxies[10].fill, Rgba::GREEN);
    }

    #[test]
    fn test_boxes_spin_before_first_step() {
        let sim = demo();
        for i in 0..10 {
            assert_eq!(sim.mobility(i).unwrap(), Mobility::Dynamic);
            assert!(sim.angular_velocity(i).unwrap().abs() > 0.0, "box {i}");
        }
        for i in 10..14 {
            assert_eq!(sim.mobility(i).unwrap(), Mobility::Static);
        }
    }

    #[test]
    fn test_second_populate_rejected() {
        let mut sim = demo();
        let result = sim.populate_demo_scene(&SceneConfig::default());
        assert!(matches!(result, Err(SimError::SceneAlreadyPopulated(14))));
        assert_eq!(sim.len(), 14);
        assert_eq!(sim.world().body_count(), 14);
    }

    #[test]
    fn test_rejected_scene_leaves_simulation_empty() {
        let mut sim = Simulation::new(&SimulationConfig::default()).unwrap();
        let thin_walls = SceneConfig {
            wall_thickness: 0.0,
            ..SceneConfig::default()
        };

        let result = sim.populate_demo_scene(&thin_walls);
        assert!(matches!(result, Err(SimError::InvalidConfig(_))), "{result:?}");
        assert!(sim.is_empty());
        assert_eq!(sim.world().body_count(), 0);

        sim.populate_demo_scene(&SceneConfig::default()).unwrap();
        assert_eq!(sim.len(), 14);
        assert_eq!(sim.world().body_count(), 14);
    }

    #[test]
    fn test_row_outside_surface_rejected() {
        let mut sim = Simulation::new(&SimulationConfig::default()).unwrap();
        let scene = SceneConfig {
            row_height_ratio: 3.0,
            ..SceneConfig::default()
        };
        assert!(matches!(
            sim.populate_demo_scene(&scene),
            Err(SimError::InvalidConfig(_))
        ));
        assert_eq!(sim.world().body_count(), 0);
    }

    #[test]
    fn test_degenerate_box_rejected_before_any_body() {
        let mut sim = Simulation::new(&SimulationConfig::default()).unwrap();
        let scene = SceneConfig {
            box_size: f32::NAN,
            ..SceneConfig::default()
        };
        assert!(sim.populate_demo_scene(&scene).is_err());
        assert_eq!(sim.world().body_count(), 0);
        assert!(sim.is_empty());
    }

    #[test]
    fn test_advance_moves_boxes_and_rotates_proxies() {
        let mut sim = demo();
        let before: Vec<_> = sim.proxies().copied().collect();

        let plan = sim.advance(1.0 / 60.0);
        assert_eq!(plan.steps, 1);
        assert_eq!(sim.steps_taken(), 1);

        let after: Vec<_> = sim.proxies().copied().collect();
        for i in 0..10 {
            assert!(after[i].position.y > before[i].position.y, "box {i} did not fall");
            assert!(after[i].rotation != 0.0, "box {i} did not rotate");
        }
    }

    #[test]
    fn test_bad_delta_steps_nothing() {
        let mut sim = demo();
        let before: Vec<_> = sim.proxies().copied().collect();

        assert_eq!(sim.advance(-1.0), StepPlan::IDLE);
        assert_eq!(sim.advance(f32::NAN), StepPlan::IDLE);

        let after: Vec<_> = sim.proxies().copied().collect();
        assert_eq!(before, after);
        assert_eq!(sim.simulated_time(), 0.0);
    }

    #[test]
    fn test_extract_instances() {
        let sim = demo();
        let mut out = vec![];
        sim.extract_instances(&mut out);
        assert_eq!(out.len(), 14);
        assert_eq!(out[13].color, Rgba::GREEN.to_array());
    }

    #[test]
    fn test_unknown_index() {
        let sim = demo();
        assert!(matches!(sim.body_pose(99), Err(SimError::UnknownBody)));
    }

    #[test]
    fn test_empty_simulation() {
        let mut sim = Simulation::new(&SimulationConfig::default()).unwrap();
        assert!(sim.is_empty());
        sim.advance(0.016);
        assert_eq!(sim.world().body_count(), 0);
    }
}
