//! Platform abstraction layer
//!
//! Boundary services the session loop owns and passes into the core:
//! - Surface: draw primitives, flushed once per frame
//! - Input: per-frame snapshot of player intent
//! - Time: monotonic milliseconds for wall-clock effect timers

pub mod headless;
pub mod term;

use std::time::Duration;

use anyhow::Result;
use glam::Vec2;

use crate::Color;
use crate::sim::Rect;

/// One frame's input snapshot, read once before the update pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Player asked to leave (escape, q, window close)
    pub quit: bool,
    pub left_held: bool,
    pub right_held: bool,
    /// Launch was pressed since the last poll (one-shot)
    pub launch_pressed: bool,
}

/// Render target for the draw step.
///
/// Draw calls write into a frame buffer and cannot fail; `present`
/// flushes the finished frame and is the only fallible step. A present
/// failure is fatal to the session.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color);
    fn present(&mut self) -> Result<()>;
}

/// Monotonic time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Input boundary. `wait` bounds how long the source may block, which
/// doubles as the frame-pacing sleep in the terminal frontend.
pub trait InputSource {
    fn poll(&mut self, wait: Duration) -> Result<FrameInput>;
}

/// The boundary services for one session, owned by the session loop and
/// torn down when it returns
pub struct SessionContext<S, I, C> {
    pub surface: S,
    pub input: I,
    pub clock: C,
}
