//! # Simulation Scenario Tests
//!
//! Runs the demo scene for seconds of simulated time and checks what a
//! viewer would see: boxes stay inside the walls, walls never move, and two
//! runs fed the same deltas draw the same frames.

use tumblebox_core::{
    DrawableProxy, Mobility, SceneConfig, Simulation, SimulationConfig, TimestepMode,
};
use tumblebox_shared::Vec2;

const FRAME: f32 = 1.0 / 120.0;

fn snapshot(sim: &Simulation) -> Vec<DrawableProxy> {
    sim.proxies().copied().collect()
}

/// Test: identical inputs produce identical proxies.
#[test]
fn test_two_runs_are_identical() {
    let config = SimulationConfig::default();
    let mut a = Simulation::with_demo_scene(&config).unwrap();
    let mut b = Simulation::with_demo_scene(&config).unwrap();

    for i in 0..240 {
        // Uneven deltas, as a real clock would report.
        let delta = if i % 3 == 0 { 1.0 / 90.0 } else { 1.0 / 144.0 };
        a.advance(delta);
        b.advance(delta);
    }

    assert_eq!(snapshot(&a), snapshot(&b));
}

/// Test: walls are never moved by collisions.
#[test]
fn test_walls_never_move() {
    let mut sim = Simulation::with_demo_scene(&SimulationConfig::default()).unwrap();
    let walls: Vec<usize> = (0..sim.len())
        .filter(|&i| sim.mobility(i).unwrap() == Mobility::Static)
        .collect();
    assert_eq!(walls.len(), 4);

    let before = snapshot(&sim);
    for _ in 0..600 {
        sim.advance(FRAME);
    }
    let after = snapshot(&sim);

    for i in walls {
        assert_eq!(before[i].position, after[i].position, "wall {i} moved");
        assert_eq!(after[i].rotation, 0.0, "wall {i} rotated");
    }
}

/// Contact solving allows a sliver of overlap before pushing bodies apart.
const CONTACT_SLACK: f32 = 3.0;

/// Asserts every box center is at least half a box away from each wall.
fn assert_boxes_inside_walls(sim: &Simulation, frame: usize) {
    let surface = sim.surface();
    let config = SceneConfig::default();
    let margin = config.wall_thickness + config.box_size * 0.5 - CONTACT_SLACK;

    for (i, proxy) in sim.proxies().enumerate().take(config.box_count) {
        let Vec2 { x, y } = proxy.position;
        assert!(
            x > margin && x < surface.width - margin && y > margin && y < surface.height - margin,
            "box {i} left the walled area at frame {frame}: {:?}",
            proxy.position
        );
    }
}

/// Test: ten simulated seconds in small increments, every box stays walled in.
#[test]
fn test_boxes_stay_inside_walls() {
    let mut sim = Simulation::with_demo_scene(&SimulationConfig::default()).unwrap();

    for frame in 0..1200 {
        sim.advance(FRAME);
        assert_boxes_inside_walls(&sim, frame);
    }

    assert!((sim.simulated_time() - 10.0).abs() < 1e-2);
}

/// Test: frames at the delta cap never carry a box through a wall.
#[test]
fn test_boxes_stay_inside_walls_at_delta_cap() {
    let config = SimulationConfig::default();
    let mut sim = Simulation::with_demo_scene(&config).unwrap();

    for frame in 0..200 {
        let plan = sim.advance(config.max_frame_delta);
        assert_eq!(plan.steps, 1);
        assert_boxes_inside_walls(&sim, frame);
    }

    assert!((sim.simulated_time() - 20.0).abs() < 1e-2);
}

/// Test: boxes fall and tumble from the very first frame.
#[test]
fn test_boxes_fall_and_spin() {
    let mut sim = Simulation::with_demo_scene(&SimulationConfig::default()).unwrap();
    let start = snapshot(&sim);

    for _ in 0..30 {
        sim.advance(1.0 / 60.0);
    }

    let now = snapshot(&sim);
    for i in 0..10 {
        assert!(now[i].position.y > start[i].position.y, "box {i} did not fall");
        assert!(now[i].rotation.abs() > 1.0, "box {i} barely rotated");
    }
}

/// Test: long frames are clamped instead of taking one giant step.
#[test]
fn test_long_frame_is_clamped() {
    let mut sim = Simulation::with_demo_scene(&SimulationConfig::default()).unwrap();
    let plan = sim.advance(5.0);
    assert_eq!(plan.steps, 1);
    assert!((plan.dt - 0.1).abs() < 1e-6);
}

/// Test: fixed mode runs whole substeps and carries the remainder.
#[test]
fn test_fixed_timestep_substeps() {
    let config = SimulationConfig {
        timestep: TimestepMode::fixed_hz(120.0),
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::with_demo_scene(&config).unwrap();

    let plan = sim.advance(1.0 / 30.0);
    assert_eq!(plan.steps, 4);
    assert_eq!(sim.steps_taken(), 4);
}

/// Test: configs parsed from TOML drive the scene.
#[test]
fn test_config_from_toml() {
    let config = SimulationConfig::from_toml_str(
        r#"
        [scene]
        box_count = 4
        "#,
    )
    .unwrap();
    let sim = Simulation::with_demo_scene(&config).unwrap();
    assert_eq!(sim.len(), 8);
}
