//! Render port and the per-frame render pass.
//!
//! The loop never talks to a windowing crate directly; anything that can
//! clear, draw a rotated rectangle and present implements [`RenderSurface`].

use tumblebox_core::DrawableProxy;
use tumblebox_shared::Rgba;

use crate::error::AppResult;

/// Color the surface is cleared to before every frame.
pub const CLEAR_COLOR: Rgba = Rgba::BLACK;

/// A surface that draws proxies.
pub trait RenderSurface {
    /// Wipes the previous frame.
    fn clear(&mut self, color: Rgba) -> AppResult<()>;

    /// Draws one filled rectangle at the proxy's position, size, origin and
    /// rotation (degrees).
    fn draw_rect(&mut self, proxy: &DrawableProxy) -> AppResult<()>;

    /// Shows the finished frame.
    fn present(&mut self) -> AppResult<()>;
}

/// Clears, draws every proxy in the given order, presents.
///
/// Returns the number of rectangles drawn. Later proxies draw over earlier
/// ones.
pub fn render_pass<'a, S, I>(surface: &mut S, proxies: I) -> AppResult<usize>
where
    S: RenderSurface + ?Sized,
    I: IntoIterator<Item = &'a DrawableProxy>,
{
    surface.clear(CLEAR_COLOR)?;
    let mut drawn = 0;
    for proxy in proxies {
        surface.draw_rect(proxy)?;
        drawn += 1;
    }
    surface.present()?;
    Ok(drawn)
}

/// Surface that keeps the last presented frame in memory.
///
/// Backs the headless binary and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pending: Vec<DrawableProxy>,
    presented: Vec<DrawableProxy>,
    clear_color: Option<Rgba>,
    frames_presented: u64,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangles of the last presented frame, in draw order.
    #[must_use]
    pub fn last_frame(&self) -> &[DrawableProxy] {
        &self.presented
    }

    /// Color of the most recent clear.
    #[must_use]
    pub fn clear_color(&self) -> Option<Rgba> {
        self.clear_color
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self, color: Rgba) -> AppResult<()> {
        self.pending.clear();
        self.clear_color = Some(color);
        Ok(())
    }

    fn draw_rect(&mut self, proxy: &DrawableProxy) -> AppResult<()> {
        self.pending.push(*proxy);
        Ok(())
    }

    fn present(&mut self) -> AppResult<()> {
        std::mem::swap(&mut self.pending, &mut self.presented);
        self.pending.clear();
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use tumblebox_shared::Vec2;

    fn rect(x: f32, fill: Rgba) -> DrawableProxy {
        DrawableProxy::centered(Vec2::new(10.0, 10.0), fill).at(Vec2::new(x, 0.0))
    }

    #[test]
    fn test_render_pass_keeps_order() {
        let proxies = [rect(1.0, Rgba::WHITE), rect(2.0, Rgba::WHITE), rect(3.0, Rgba::GREEN)];
        let mut surface = RecordingSurface::new();

        let drawn = render_pass(&mut surface, &proxies).unwrap();

        assert_eq!(drawn, 3);
        assert_eq!(surface.last_frame(), &proxies);
        assert_eq!(surface.clear_color(), Some(CLEAR_COLOR));
        assert_eq!(surface.frames_presented(), 1);
    }

    #[test]
    fn test_each_frame_starts_clean() {
        let mut surface = RecordingSurface::new();
        render_pass(&mut surface, &[rect(1.0, Rgba::WHITE), rect(2.0, Rgba::WHITE)]).unwrap();
        render_pass(&mut surface, &[rect(5.0, Rgba::GREEN)]).unwrap();

        assert_eq!(surface.last_frame().len(), 1);
        assert_eq!(surface.frames_presented(), 2);
    }

    struct BrokenSurface;

    impl RenderSurface for BrokenSurface {
        fn clear(&mut self, _color: Rgba) -> AppResult<()> {
            Ok(())
        }

        fn draw_rect(&mut self, _proxy: &DrawableProxy) -> AppResult<()> {
            Err(AppError::Surface("device lost".to_string()))
        }

        fn present(&mut self) -> AppResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_draw_failure_propagates() {
        let result = render_pass(&mut BrokenSurface, &[rect(1.0, Rgba::WHITE)]);
        assert!(matches!(result, Err(AppError::Surface(_))));
    }
}
