//! # TUMBLEBOX Game Loop
//!
//! One logical thread, one frame at a time:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. MEASURE                                                          │
//! │    └─ Clock reports seconds since the previous frame                │
//! │                                                                     │
//! │ 2. EVENTS                                                           │
//! │    └─ Drain the window channel; CloseRequested ends the loop        │
//! │       once this frame is finished                                   │
//! │                                                                     │
//! │ 3. STEP                                                             │
//! │    ├─ Advance physics by the measured delta                         │
//! │    └─ Sync every body pose into its proxy                           │
//! │                                                                     │
//! │ 4. RENDER                                                           │
//! │    └─ Clear, draw proxies in pairing order, present                 │
//! │                                                                     │
//! │ 5. END FRAME                                                        │
//! │    └─ Record timings                                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use tumblebox_core::Simulation;
use tumblebox_shared::TARGET_FPS;

use crate::error::AppResult;
use crate::events::{EventBus, EventReceiver, EventSender, WindowEvent, DEFAULT_EVENT_CAPACITY};
use crate::render::{render_pass, RenderSurface};

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Maximum allowed frame time before warning.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Source of per-frame elapsed time.
pub trait FrameClock {
    /// Seconds since the previous call (or since creation, the first time).
    fn tick(&mut self) -> f32;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    /// Starts measuring from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for WallClock {
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta.as_secs_f32()
    }
}

/// Reports the same delta every frame. Headless runs and tests.
#[derive(Clone, Copy, Debug)]
pub struct SteppedClock {
    delta: f32,
}

impl SteppedClock {
    /// A clock that advances by `delta` seconds per tick.
    #[must_use]
    pub fn new(delta: f32) -> Self {
        Self { delta }
    }

    /// A clock running at `hz` frames per second.
    #[must_use]
    pub fn from_hz(hz: u32) -> Self {
        Self::new(1.0 / hz as f32)
    }
}

impl FrameClock for SteppedClock {
    fn tick(&mut self) -> f32 {
        self.delta
    }
}

/// Configuration for the game loop.
#[derive(Clone, Debug)]
pub struct GameLoopConfig {
    /// Event channel capacity.
    pub event_capacity: usize,
    /// Enable slow-frame warnings.
    pub enable_timing_logs: bool,
    /// Target frames per second.
    pub target_fps: u32,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            enable_timing_logs: false,
            target_fps: TARGET_FPS,
        }
    }
}

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Physics step plus proxy sync in microseconds.
    pub step_us: u64,
    /// Render pass in microseconds.
    pub render_us: u64,
    /// Frame number.
    pub frame: u64,
    /// Physics steps taken this frame.
    pub physics_steps: u32,
    /// Rectangles drawn this frame.
    pub rects_drawn: u32,
    /// Events processed this frame.
    pub events_processed: u32,
}

/// The frame loop orchestrator.
///
/// Owns the simulation and the event channel.
pub struct GameLoop {
    simulation: Simulation,
    events: EventBus,
    receiver: EventReceiver,
    config: GameLoopConfig,
    frame_count: u64,
    running: bool,
    stats_accumulator: FrameStatsAccumulator,
}

impl GameLoop {
    /// Creates a loop around a ready simulation.
    #[must_use]
    pub fn new(simulation: Simulation, config: GameLoopConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        let receiver = events.receiver();

        Self {
            simulation,
            events,
            receiver,
            config,
            frame_count: 0,
            running: true,
            stats_accumulator: FrameStatsAccumulator::new(),
        }
    }

    /// Handle for platform glue to push window events.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.events.sender()
    }

    /// Runs one frame: measure, drain events, step, render.
    ///
    /// A close request received here still lets this frame finish.
    pub fn run_frame<C, S>(&mut self, clock: &mut C, surface: &mut S) -> AppResult<FrameStats>
    where
        C: FrameClock + ?Sized,
        S: RenderSurface + ?Sized,
    {
        let frame_start = Instant::now();
        let delta = clock.tick();

        let events = self.receiver.drain();
        for event in &events {
            match event {
                WindowEvent::CloseRequested => {
                    tracing::info!(frame = self.frame_count, "close requested");
                    self.running = false;
                }
                WindowEvent::Focused(focused) => {
                    tracing::debug!(focused, "focus changed");
                }
            }
        }

        let step_start = Instant::now();
        let plan = self.simulation.advance(delta);
        let step_us = elapsed_us(step_start);

        let render_start = Instant::now();
        let drawn = render_pass(surface, self.simulation.proxies())?;
        let render_us = elapsed_us(render_start);

        let stats = FrameStats {
            total_us: elapsed_us(frame_start),
            step_us,
            render_us,
            frame: self.frame_count,
            physics_steps: plan.steps,
            rects_drawn: u32::try_from(drawn).unwrap_or(u32::MAX),
            events_processed: u32::try_from(events.len()).unwrap_or(u32::MAX),
        };
        self.end_frame(stats);
        Ok(stats)
    }

    /// Runs frames until a close request or until `max_frames` have run.
    ///
    /// Returns the number of frames run. Logs a statistics summary on exit,
    /// including when a frame fails.
    pub fn run<C, S>(
        &mut self,
        clock: &mut C,
        surface: &mut S,
        max_frames: Option<u64>,
    ) -> AppResult<u64>
    where
        C: FrameClock + ?Sized,
        S: RenderSurface + ?Sized,
    {
        tracing::info!(bodies = self.simulation.len(), ?max_frames, "frame loop starting");

        let mut frames = 0;
        let result = loop {
            if !self.running || max_frames.is_some_and(|max| frames >= max) {
                break Ok(frames);
            }
            if let Err(err) = self.run_frame(clock, surface) {
                tracing::error!(frame = self.frame_count, %err, "frame failed");
                break Err(err);
            }
            frames += 1;
        };

        self.finish();
        result
    }

    /// Logs the statistics summary. Call once when the loop ends, whoever
    /// drives it.
    pub fn finish(&self) {
        self.stats_accumulator.log_summary();
        tracing::info!(
            frames = self.frame_count,
            simulated_s = self.simulation.simulated_time(),
            physics_steps = self.simulation.steps_taken(),
            "frame loop stopped"
        );
    }

    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        self.stats_accumulator.record(stats);

        if self.config.enable_timing_logs && stats.total_us > duration_us(MAX_FRAME_TIME) {
            tracing::warn!(
                frame = stats.frame,
                total_ms = stats.total_us as f64 / 1000.0,
                target_ms = 1000.0 / f64::from(self.config.target_fps.max(1)),
                "frame exceeded budget"
            );
        }
    }

    /// False once a close request has been handled.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns the current frame count.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The simulation being driven.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }
}

fn elapsed_us(since: Instant) -> u64 {
    duration_us(since.elapsed())
}

fn duration_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of step times.
    pub step_us_sum: u64,
    /// Sum of render times.
    pub render_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Physics steps across all frames.
    pub physics_steps: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            step_us_sum: 0,
            render_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            physics_steps: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.step_us_sum += stats.step_us;
        self.render_us_sum += stats.render_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.physics_steps += u64::from(stats.physics_steps);

        if stats.total_us > duration_us(TARGET_FRAME_TIME) {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        self.average_ms(self.total_us_sum)
    }

    /// Returns average step time in milliseconds.
    #[must_use]
    pub fn avg_step_ms(&self) -> f64 {
        self.average_ms(self.step_us_sum)
    }

    /// Returns average render time in milliseconds.
    #[must_use]
    pub fn avg_render_ms(&self) -> f64 {
        self.average_ms(self.render_us_sum)
    }

    fn average_ms(&self, sum_us: u64) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (sum_us as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns average FPS.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Logs a summary of the statistics.
    pub fn log_summary(&self) {
        if self.frames_recorded == 0 {
            tracing::info!("no frames recorded");
            return;
        }
        tracing::info!(
            frames = self.frames_recorded,
            avg_ms = self.avg_frame_ms(),
            avg_fps = self.avg_fps(),
            min_ms = self.min_frame_us as f64 / 1000.0,
            max_ms = self.max_frame_us as f64 / 1000.0,
            "frame timing"
        );
        tracing::info!(
            step_ms = self.avg_step_ms(),
            render_ms = self.avg_render_ms(),
            physics_steps = self.physics_steps,
            over_budget = self.frames_over_budget,
            over_budget_pct = self.over_budget_ratio() * 100.0,
            "frame breakdown"
        );
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;
    use tumblebox_core::SimulationConfig;

    fn demo_loop() -> GameLoop {
        let sim = Simulation::with_demo_scene(&SimulationConfig::default()).unwrap();
        GameLoop::new(sim, GameLoopConfig::default())
    }

    #[test]
    fn test_game_loop_creation() {
        let game_loop = demo_loop();
        assert_eq!(game_loop.frame_count(), 0);
        assert!(game_loop.is_running());
        assert_eq!(game_loop.simulation().len(), 14);
    }

    #[test]
    fn test_frame_cycle() {
        let mut game_loop = demo_loop();
        let mut clock = SteppedClock::from_hz(60);
        let mut surface = RecordingSurface::new();

        let stats = game_loop.run_frame(&mut clock, &mut surface).unwrap();

        assert_eq!(stats.frame, 0);
        assert_eq!(stats.physics_steps, 1);
        assert_eq!(stats.rects_drawn, 14);
        assert_eq!(game_loop.frame_count(), 1);
        assert_eq!(surface.frames_presented(), 1);

        let drawn = surface.last_frame();
        let synced: Vec<_> = game_loop.simulation().proxies().copied().collect();
        assert_eq!(drawn, synced.as_slice());
    }

    #[test]
    fn test_close_finishes_current_frame() {
        let mut game_loop = demo_loop();
        let mut clock = SteppedClock::from_hz(60);
        let mut surface = RecordingSurface::new();

        assert!(game_loop.event_sender().send(WindowEvent::CloseRequested));
        let frames = game_loop.run(&mut clock, &mut surface, Some(100)).unwrap();

        assert_eq!(frames, 1);
        assert_eq!(surface.frames_presented(), 1);
        assert!(!game_loop.is_running());
    }

    #[test]
    fn test_run_stops_at_max_frames() {
        let mut game_loop = demo_loop();
        let mut clock = SteppedClock::from_hz(60);
        let mut surface = RecordingSurface::new();

        let frames = game_loop.run(&mut clock, &mut surface, Some(30)).unwrap();

        assert_eq!(frames, 30);
        assert_eq!(game_loop.stats().frames_recorded, 30);
        assert_eq!(game_loop.stats().physics_steps, 30);
        assert!(game_loop.is_running());
    }

    #[test]
    fn test_focus_events_ignored() {
        let mut game_loop = demo_loop();
        let sender = game_loop.event_sender();
        sender.send(WindowEvent::Focused(false));

        let stats = game_loop
            .run_frame(&mut SteppedClock::from_hz(60), &mut RecordingSurface::new())
            .unwrap();

        assert_eq!(stats.events_processed, 1);
        assert!(game_loop.is_running());
    }

    #[test]
    fn test_wall_clock_measures_elapsed_time() {
        let mut clock = WallClock::new();
        std::thread::sleep(Duration::from_millis(5));
        let first = clock.tick();
        let second = clock.tick();

        assert!(first >= 0.005, "{first}");
        assert!(second >= 0.0);
        assert!(second < first);
    }

    #[test]
    fn test_frame_with_wall_clock() {
        let mut game_loop = demo_loop();
        let mut clock = WallClock::new();
        let mut surface = RecordingSurface::new();
        std::thread::sleep(Duration::from_millis(2));

        let stats = game_loop.run_frame(&mut clock, &mut surface).unwrap();

        assert_eq!(stats.physics_steps, 1);
        assert!(game_loop.simulation().simulated_time() > 0.0);
        assert_eq!(surface.last_frame().len(), 14);
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new();

        for i in 0..100 {
            acc.record(FrameStats {
                total_us: 10_000 + (i * 100),
                step_us: 5000,
                render_us: 2000,
                frame: i,
                physics_steps: 1,
                rects_drawn: 14,
                events_processed: 0,
            });
        }

        assert_eq!(acc.frames_recorded, 100);
        assert!(acc.avg_fps() > 50.0);
        assert!(acc.avg_fps() < 100.0);
        assert!((acc.avg_step_ms() - 5.0).abs() < 1e-9);
        assert_eq!(acc.physics_steps, 100);
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = FrameStatsAccumulator::default();
        assert_eq!(acc.avg_fps(), 0.0);
        assert_eq!(acc.over_budget_ratio(), 0.0);
    }
}
