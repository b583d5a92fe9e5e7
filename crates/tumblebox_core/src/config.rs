//! # Simulation Configuration
//!
//! Every field defaults to the compiled-in constants from
//! `tumblebox_shared::constants`, so an empty TOML document yields the stock
//! demo. Configs are loaded once at startup and validated before use.
//!
//! ```toml
//! physics_scale = 30.0
//! gravity = { x = 0.0, y = -9.8 }
//!
//! [timestep]
//! mode = "fixed"
//! step = 0.008333
//! max_substeps = 8
//!
//! [scene]
//! box_count = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tumblebox_shared::constants::{
    GRAVITY, MAX_FRAME_DELTA, PHYSICS_SCALE, POSITION_ITERATIONS, VELOCITY_ITERATIONS,
};
use tumblebox_shared::{Rgba, Surface, UnitScale, Vec2};

use crate::error::{SimError, SimResult};
use crate::timestep::TimestepMode;

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Display units per physics unit.
    pub physics_scale: f32,
    /// Render surface extent (display units).
    pub surface: Surface,
    /// Gravity (physics units / s^2, y up).
    pub gravity: Vec2,
    /// Velocity-resolution solver passes per step.
    pub velocity_iterations: usize,
    /// Position-resolution solver passes per step.
    pub position_iterations: usize,
    /// How frame time is turned into physics steps.
    pub timestep: TimestepMode,
    /// Upper bound applied to every frame delta (seconds).
    pub max_frame_delta: f32,
    /// Scene layout.
    pub scene: SceneConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            physics_scale: PHYSICS_SCALE,
            surface: Surface::DEFAULT,
            gravity: Vec2::from_array(GRAVITY),
            velocity_iterations: VELOCITY_ITERATIONS,
            position_iterations: POSITION_ITERATIONS,
            timestep: TimestepMode::Variable,
            max_frame_delta: MAX_FRAME_DELTA,
            scene: SceneConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> SimResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// The unit scale this config describes.
    #[must_use]
    pub fn unit_scale(&self) -> UnitScale {
        UnitScale::new(self.physics_scale)
    }

    /// Checks every value the simulation relies on.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.physics_scale.is_finite() && self.physics_scale > 0.0) {
            return Err(invalid(format!("physics_scale must be > 0, got {}", self.physics_scale)));
        }
        if !(self.surface.width > 0.0 && self.surface.height > 0.0)
            || !self.surface.size().is_finite()
        {
            return Err(invalid(format!(
                "surface must be positive, got {}x{}",
                self.surface.width, self.surface.height
            )));
        }
        if !self.gravity.is_finite() {
            return Err(invalid("gravity must be finite".to_string()));
        }
        if self.velocity_iterations == 0 {
            return Err(invalid("velocity_iterations must be at least 1".to_string()));
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(invalid(format!(
                "max_frame_delta must be > 0, got {}",
                self.max_frame_delta
            )));
        }
        self.timestep.validate()?;
        self.scene.validate(self.surface)
    }
}

/// Layout of the fixed demo scene (display units).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of dynamic boxes in the row.
    pub box_count: usize,
    /// Edge length of each square box.
    pub box_size: f32,
    /// Row height as a fraction of the surface height, measured from the bottom.
    pub row_height_ratio: f32,
    /// Full thickness of each boundary wall.
    pub wall_thickness: f32,
    /// Angular impulse given to each box once after creation.
    pub spin_impulse: f32,
    /// Fill of the dynamic boxes.
    pub box_color: Rgba,
    /// Fill of the boundary walls.
    pub wall_color: Rgba,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            box_count: 10,
            box_size: 50.0,
            row_height_ratio: 0.7,
            wall_thickness: 20.0,
            spin_impulse: 5.0,
            box_color: Rgba::WHITE,
            wall_color: Rgba::GREEN,
        }
    }
}

impl SceneConfig {
    /// Checks the layout against the surface it will be built on.
    pub(crate) fn validate(&self, surface: Surface) -> SimResult<()> {
        if !(self.box_size.is_finite() && self.box_size > 0.0) {
            return Err(invalid(format!("box_size must be > 0, got {}", self.box_size)));
        }
        if !(self.wall_thickness.is_finite() && self.wall_thickness > 0.0) {
            return Err(invalid(format!(
                "wall_thickness must be > 0, got {}",
                self.wall_thickness
            )));
        }
        if 2.0 * self.wall_thickness >= surface.width.min(surface.height) {
            return Err(invalid("walls leave no play area".to_string()));
        }
        if !(self.row_height_ratio > 0.0 && self.row_height_ratio < 1.0) {
            return Err(invalid(format!(
                "row_height_ratio must be in (0, 1), got {}",
                self.row_height_ratio
            )));
        }
        let row_y = surface.height * self.row_height_ratio;
        let half = self.box_size * 0.5;
        if row_y - half <= self.wall_thickness || row_y + half >= surface.height - self.wall_thickness {
            return Err(invalid(format!("box row at y={row_y} overlaps a wall")));
        }
        if !self.spin_impulse.is_finite() {
            return Err(invalid("spin_impulse must be finite".to_string()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> SimError {
    SimError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.physics_scale, 30.0);
        assert_eq!(config.surface, Surface::new(700.0, 720.0));
        assert_eq!(config.gravity, Vec2::new(0.0, -9.8));
        assert_eq!(config.velocity_iterations, 6);
        assert_eq!(config.position_iterations, 2);
        assert_eq!(config.timestep, TimestepMode::Variable);
        assert_eq!(config.scene.box_count, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SimulationConfig::from_toml_str(
            r#"
            physics_scale = 50.0
            gravity = { x = 0.0, y = -20.0 }

            [scene]
            box_count = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.physics_scale, 50.0);
        assert_eq!(config.gravity, Vec2::new(0.0, -20.0));
        assert_eq!(config.scene.box_count, 3);
        assert_eq!(config.scene.box_size, 50.0);
        assert_eq!(config.velocity_iterations, 6);
    }

    #[test]
    fn test_fixed_timestep_parse() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [timestep]
            mode = "fixed"
            step = 0.01
            max_substeps = 4
            "#,
        )
        .unwrap();
        assert_eq!(
            config.timestep,
            TimestepMode::Fixed {
                step: 0.01,
                max_substeps: 4
            }
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SimulationConfig::from_toml_str("physics_scale = 0.0"),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("velocity_iterations = 0"),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("[scene]\nbox_size = -1.0"),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("[scene]\nwall_thickness = 400.0"),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_box_row_must_clear_walls() {
        let scene = |ratio: f32| SceneConfig {
            row_height_ratio: ratio,
            ..SceneConfig::default()
        };
        assert!(scene(0.7).validate(Surface::DEFAULT).is_ok());
        assert!(scene(3.0).validate(Surface::DEFAULT).is_err());
        // 0.02 * 720 = 14.4, under the floor wall.
        assert!(scene(0.02).validate(Surface::DEFAULT).is_err());
        // 0.98 * 720 = 705.6, inside the ceiling wall.
        assert!(scene(0.98).validate(Surface::DEFAULT).is_err());
    }

    #[test]
    fn test_parse_error_surfaces() {
        assert!(matches!(
            SimulationConfig::from_toml_str("physics_scale = \"big\""),
            Err(SimError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimulationConfig::from_toml_file("/definitely/not/here.toml"),
            Err(SimError::Io(_))
        ));
    }
}
