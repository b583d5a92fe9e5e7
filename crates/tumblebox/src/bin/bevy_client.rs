//! # TUMBLEBOX Client
//!
//! Opens the 700x720 "Physics Simulation" window and drives the same
//! `GameLoop` as the headless binary. Bevy owns the window and sprite
//! drawing; every frame goes through `GameLoop::run_frame`:
//!
//! ```text
//! Bevy window events ──> EventSender ──> GameLoop (drain)
//! WallClock ───────────────────────────> GameLoop (measure)
//! GameLoop render pass ──> SpriteSurface ──> sprite transforms
//! ```
//!
//! ```bash
//! cargo run -p tumblebox --features bevy_client --bin tumblebox_client -- [scene.toml]
//! ```

// Bevy systems take their params by value.
#![allow(clippy::needless_pass_by_value)]

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::{WindowCloseRequested, WindowFocused, WindowResolution};

use tumblebox::core::{DrawableProxy, SimResult, Simulation, SimulationConfig};
use tumblebox::shared::{Rgba, Surface, WINDOW_TITLE};
use tumblebox::{
    AppError, AppResult, EventSender, GameLoop, GameLoopConfig, RenderSurface, WallClock,
    WindowEvent,
};

// =============================================================================
// RESOURCES & COMPONENTS
// =============================================================================

/// The frame loop and everything it needs from the Bevy side.
#[derive(Resource)]
struct Frontend {
    game_loop: GameLoop,
    clock: WallClock,
    events: EventSender,
    /// Sprite entities in proxy (draw) order.
    sprites: Vec<Entity>,
    surface: Surface,
    /// Set when a frame fails; read by `main` after the app exits.
    failed: Arc<AtomicBool>,
}

/// Marks the sprites mirroring proxies.
#[derive(Component)]
struct ProxySprite;

// =============================================================================
// COORDINATES
// =============================================================================

/// Proxy pose (top-left origin, y down, clockwise degrees) to a Bevy
/// transform (centered origin, y up). Later proxies sit in front.
fn proxy_transform(proxy: &DrawableProxy, surface: Surface, index: usize) -> Transform {
    // Sprites are anchored at their center; shift when the pivot is elsewhere.
    let center_offset_x = proxy.size.x * 0.5 - proxy.origin.x;
    let center_offset_y = proxy.size.y * 0.5 - proxy.origin.y;

    let x = proxy.position.x + center_offset_x - surface.width * 0.5;
    let y = surface.height * 0.5 - (proxy.position.y + center_offset_y);

    Transform::from_xyz(x, y, index as f32 * 0.001)
        .with_rotation(Quat::from_rotation_z(-proxy.rotation.to_radians()))
}

fn fill_color(fill: Rgba) -> Color {
    Color::rgba(fill.r, fill.g, fill.b, fill.a)
}

// =============================================================================
// RENDER SURFACE
// =============================================================================

/// Writes each drawn proxy into the transform of the sprite at the same
/// index. Bevy clears the window itself (`ClearColor`) and presents after
/// the frame's systems finish.
struct SpriteSurface<'a, 'w, 's> {
    transforms: &'a mut Query<'w, 's, &'static mut Transform, With<ProxySprite>>,
    sprites: &'a [Entity],
    surface: Surface,
    next: usize,
}

impl RenderSurface for SpriteSurface<'_, '_, '_> {
    fn clear(&mut self, _color: Rgba) -> AppResult<()> {
        self.next = 0;
        Ok(())
    }

    fn draw_rect(&mut self, proxy: &DrawableProxy) -> AppResult<()> {
        let index = self.next;
        let entity = *self
            .sprites
            .get(index)
            .ok_or_else(|| AppError::Surface(format!("no sprite for proxy {index}")))?;
        let mut transform = self
            .transforms
            .get_mut(entity)
            .map_err(|err| AppError::Surface(format!("sprite {index}: {err:?}")))?;
        *transform = proxy_transform(proxy, self.surface, index);
        self.next += 1;
        Ok(())
    }

    fn present(&mut self) -> AppResult<()> {
        Ok(())
    }
}

// =============================================================================
// SYSTEMS
// =============================================================================

fn spawn_scene(mut commands: Commands, mut frontend: ResMut<Frontend>) {
    commands.spawn(Camera2dBundle::default());

    let frontend = &mut *frontend;
    let simulation = frontend.game_loop.simulation();
    for (index, proxy) in simulation.proxies().enumerate() {
        let entity = commands
            .spawn((
                SpriteBundle {
                    sprite: Sprite {
                        color: fill_color(proxy.fill),
                        custom_size: Some(Vec2::new(proxy.size.x, proxy.size.y)),
                        ..default()
                    },
                    transform: proxy_transform(proxy, frontend.surface, index),
                    ..default()
                },
                ProxySprite,
            ))
            .id();
        frontend.sprites.push(entity);
    }
    info!(sprites = frontend.sprites.len(), "scene spawned");
}

/// Forwards Bevy window events into the frame loop's channel.
fn forward_window_events(
    frontend: Res<Frontend>,
    mut close_requests: EventReader<WindowCloseRequested>,
    mut focus_changes: EventReader<WindowFocused>,
) {
    for _ in close_requests.read() {
        frontend.events.send(WindowEvent::CloseRequested);
    }
    for change in focus_changes.read() {
        frontend.events.send(WindowEvent::Focused(change.focused));
    }
}

fn run_frame(
    mut frontend: ResMut<Frontend>,
    mut transforms: Query<&mut Transform, With<ProxySprite>>,
    mut exit: EventWriter<AppExit>,
) {
    let frontend = &mut *frontend;
    // Bevy may still run an update after AppExit was sent.
    if !frontend.game_loop.is_running() || frontend.failed.load(Ordering::Relaxed) {
        return;
    }
    let mut surface = SpriteSurface {
        transforms: &mut transforms,
        sprites: &frontend.sprites,
        surface: frontend.surface,
        next: 0,
    };

    if let Err(err) = frontend.game_loop.run_frame(&mut frontend.clock, &mut surface) {
        error!(%err, "frame failed");
        frontend.failed.store(true, Ordering::Relaxed);
        frontend.game_loop.finish();
        exit.send(AppExit);
        return;
    }

    if !frontend.game_loop.is_running() {
        frontend.game_loop.finish();
        exit.send(AppExit);
    }
}

// =============================================================================
// MAIN
// =============================================================================

fn load_simulation() -> SimResult<Simulation> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_toml_file(path)?,
        None => SimulationConfig::default(),
    };
    Simulation::with_demo_scene(&config)
}

fn main() -> ExitCode {
    let simulation = match load_simulation() {
        Ok(simulation) => simulation,
        Err(err) => {
            eprintln!("tumblebox_client: {err}");
            return ExitCode::FAILURE;
        }
    };
    let surface = simulation.surface();
    let game_loop = GameLoop::new(simulation, GameLoopConfig::default());
    let failed = Arc::new(AtomicBool::new(false));

    let frontend = Frontend {
        events: game_loop.event_sender(),
        game_loop,
        clock: WallClock::new(),
        sprites: Vec::new(),
        surface,
        failed: Arc::clone(&failed),
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: WINDOW_TITLE.into(),
                resolution: WindowResolution::new(surface.width, surface.height),
                resizable: false,
                ..default()
            }),
            // The frame loop decides when to stop, after finishing its frame.
            close_when_requested: false,
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(frontend)
        .add_systems(Startup, spawn_scene)
        .add_systems(Update, (forward_window_events, run_frame).chain())
        .run();

    if failed.load(Ordering::Relaxed) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
