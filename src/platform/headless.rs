//! Headless boundary services for tests and demo runs
//!
//! No terminal, no wall clock: the clock is advanced by hand, input is
//! scripted, and the surface records the draw commands it receives.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use glam::Vec2;

use super::{Clock, FrameInput, InputSource, Surface};
use crate::Color;
use crate::sim::Rect;

/// Clock advanced explicitly by the caller
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    pub fn set(&mut self, ms: u64) {
        self.now_ms = ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

/// Input source that replays queued frames, then repeats the final one
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<FrameInput>,
    last: FrameInput,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = FrameInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            last: FrameInput::default(),
        }
    }

    /// A source that returns the same frame forever
    pub fn hold(frame: FrameInput) -> Self {
        Self {
            frames: VecDeque::new(),
            last: frame,
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _wait: Duration) -> Result<FrameInput> {
        if let Some(frame) = self.frames.pop_front() {
            self.last = frame;
        }
        Ok(self.last)
    }
}

/// A single recorded draw command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    Rect(Rect, Color),
    Circle(Vec2, f32, Color),
    Text(String, Vec2, Color),
}

/// Surface that records the current frame's draw commands.
///
/// `clear` starts a new frame, so after a draw pass the recording holds
/// exactly that frame's commands.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCmd>,
    pub presented: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if some text command contains the given fragment
    pub fn has_text(&self, fragment: &str) -> bool {
        self.commands.iter().any(|cmd| match cmd {
            DrawCmd::Text(text, _, _) => text.contains(fragment),
            _ => false,
        })
    }

    /// All filled rects of the given color
    pub fn rects_with_color(&self, color: Color) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Rect(rect, c) if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear(color));
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::Rect(rect, color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::Circle(center, radius, color));
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color) {
        self.commands.push(DrawCmd::Text(text.to_string(), pos, color));
    }

    fn present(&mut self) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let mut clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0);
        clock.advance(16);
        clock.advance(16);
        assert_eq!(clock.now_ms(), 32);
        clock.set(1_000);
        assert_eq!(clock.now_ms(), 1_000);
    }

    #[test]
    fn test_scripted_input_replays_then_repeats() {
        let launch = FrameInput {
            launch_pressed: true,
            ..Default::default()
        };
        let left = FrameInput {
            left_held: true,
            ..Default::default()
        };
        let mut input = ScriptedInput::new([launch, left]);

        assert_eq!(input.poll(Duration::ZERO).unwrap(), launch);
        assert_eq!(input.poll(Duration::ZERO).unwrap(), left);
        // Queue exhausted: the last frame repeats
        assert_eq!(input.poll(Duration::ZERO).unwrap(), left);
    }

    #[test]
    fn test_recording_surface_keeps_one_frame() {
        let mut surface = RecordingSurface::new();
        surface.draw_text("stale", Vec2::ZERO, Color::WHITE);
        surface.clear(Color::BLACK);
        surface.draw_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED);

        assert!(!surface.has_text("stale"));
        assert_eq!(surface.commands.len(), 2);
        assert_eq!(surface.rects_with_color(Color::RED).len(), 1);
    }
}
