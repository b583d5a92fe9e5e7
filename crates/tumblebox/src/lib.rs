//! # TUMBLEBOX
//!
//! The application crate: drives the simulation frame by frame and hands the
//! synced proxies to a render surface.
//!
//! ## Modules
//!
//! - `events`: window events into the loop
//! - `game_loop`: frame orchestration and timing
//! - `render`: render port and the render pass
//!
//! The physics lives in `tumblebox_core`, re-exported here as `core`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod events;
pub mod game_loop;
pub mod render;

pub use tumblebox_core as core;
pub use tumblebox_shared as shared;

pub use error::{AppError, AppResult};
pub use events::{EventBus, EventReceiver, EventSender, WindowEvent};
pub use game_loop::{
    FrameClock, FrameStats, FrameStatsAccumulator, GameLoop, GameLoopConfig, SteppedClock,
    WallClock,
};
pub use render::{render_pass, RecordingSurface, RenderSurface, CLEAR_COLOR};
