//! # TUMBLEBOX Core
//!
//! The simulation-and-sync loop: a 2D rigid-body world populated with a row
//! of spinning boxes inside four walls, mirrored every frame into drawable
//! proxies.
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────┐   create_box    ┌──────────────┐
//! │ BodyFactory  │───────────────> │ PhysicsWorld │  (meters, y up)
//! └──────────────┘                 └──────┬───────┘
//!                                         │ step(dt) x N
//!                                         v
//!                                  ┌──────────────┐
//!                                  │  Simulation  │  pose -> pixels, flip y,
//!                                  │  sync pass   │  radians -> degrees
//!                                  └──────┬───────┘
//!                                         v
//!                                  ┌──────────────┐
//!                                  │ DrawableProxy│  (pixels, y down)
//!                                  └──────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **No globals** - everything lives in a `Simulation` value
//! 2. **Pairs, not parallel lists** - a body and its proxy share one slot
//! 3. **Units at the edges** - physics never sees pixels, proxies never see meters
//!
//! ## Example
//!
//! ```rust,ignore
//! use tumblebox_core::{Simulation, SimulationConfig};
//!
//! let mut sim = Simulation::with_demo_scene(&SimulationConfig::default())?;
//! sim.advance(1.0 / 60.0);
//! for proxy in sim.proxies() {
//!     draw(proxy);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod body;
pub mod config;
pub mod error;
pub mod physics;
pub mod proxy;
pub mod scene;
pub mod simulation;
pub mod timestep;

pub use body::{BodyFactory, DYNAMIC_MATERIAL, STATIC_MATERIAL};
pub use config::{SceneConfig, SimulationConfig};
pub use error::{SimError, SimResult};
pub use physics::{BodyHandle, BodyPose, Material, Mobility, PhysicsWorld};
pub use proxy::{DrawableProxy, ProxyInstance};
pub use scene::{demo_layout, BoxPlacement};
pub use simulation::{BodyProxyPair, Simulation};
pub use timestep::{StepPlan, Stepper, TimestepMode};
