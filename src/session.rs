//! Frame loop tying the sim, renderer, and platform together.
//!
//! The session owns the game state and a [`SessionContext`] of platform
//! handles. Pacing rides on the input poll: each frame blocks in
//! [`InputSource::poll`] until the frame deadline, so a quiet keyboard
//! and a busy one both land near the target frame rate.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::consts::FRAME_MICROS;
use crate::platform::{Clock, InputSource, SessionContext, Surface};
use crate::renderer;
use crate::sim::{GameState, TickInput, tick};

pub struct Session<S, I, C> {
    pub state: GameState,
    pub ctx: SessionContext<S, I, C>,
    /// When set, the tick synthesizes paddle input and auto-launches
    pub demo: bool,
}

impl<S: Surface, I: InputSource, C: Clock> Session<S, I, C> {
    pub fn new(state: GameState, ctx: SessionContext<S, I, C>) -> Self {
        Self {
            state,
            ctx,
            demo: false,
        }
    }

    /// Run frames until the player quits.
    pub fn run(&mut self) -> Result<()> {
        let frame_budget = Duration::from_micros(FRAME_MICROS);
        let mut next_frame = Instant::now() + frame_budget;

        loop {
            let wait = next_frame.saturating_duration_since(Instant::now());
            if !self.step(wait)? {
                return Ok(());
            }
            next_frame += frame_budget;
            // After a stall, resync instead of bursting catch-up frames
            let now = Instant::now();
            if next_frame < now {
                next_frame = now + frame_budget;
            }
        }
    }

    /// One frame: poll input, advance the sim, draw, present.
    ///
    /// Returns `Ok(false)` once the player asks to quit.
    pub fn step(&mut self, wait: Duration) -> Result<bool> {
        let input = self.ctx.input.poll(wait)?;
        if input.quit {
            log::info!("Quit requested, final score {}", self.state.score);
            return Ok(false);
        }

        let tick_input = TickInput {
            left_held: input.left_held,
            right_held: input.right_held,
            launch: input.launch_pressed,
            demo: self.demo,
        };
        let now_ms = self.ctx.clock.now_ms();
        tick(&mut self.state, &tick_input, now_ms);

        renderer::draw(&self.state, now_ms, &mut self.ctx.surface);
        self.ctx.surface.present()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PADDLE_SPEED, POWERUP_DURATION_MS};
    use crate::platform::FrameInput;
    use crate::platform::headless::{ManualClock, RecordingSurface, ScriptedInput};
    use crate::sim::{BallState, PowerUpKind};

    fn headless_session(input: ScriptedInput) -> Session<RecordingSurface, ScriptedInput, ManualClock> {
        let ctx = SessionContext {
            surface: RecordingSurface::new(),
            input,
            clock: ManualClock::new(),
        };
        Session::new(GameState::new(7), ctx)
    }

    #[test]
    fn test_quit_stops_before_drawing() {
        let mut session = headless_session(ScriptedInput::hold(FrameInput {
            quit: true,
            ..FrameInput::default()
        }));

        assert!(!session.step(Duration::ZERO).unwrap());
        assert_eq!(session.ctx.surface.presented, 0);
    }

    #[test]
    fn test_each_step_ticks_and_presents() {
        let mut session = headless_session(ScriptedInput::hold(FrameInput::default()));

        for _ in 0..5 {
            assert!(session.step(Duration::ZERO).unwrap());
        }
        assert_eq!(session.state.time_ticks, 5);
        assert_eq!(session.ctx.surface.presented, 5);
    }

    #[test]
    fn test_launch_press_frees_the_ball() {
        let mut session = headless_session(ScriptedInput::new([
            FrameInput {
                launch_pressed: true,
                ..FrameInput::default()
            },
            FrameInput::default(),
        ]));

        assert_eq!(session.state.balls[0].state, BallState::Anchored);
        session.step(Duration::ZERO).unwrap();
        assert_eq!(session.state.balls[0].state, BallState::Free);
    }

    #[test]
    fn test_effect_expires_on_the_session_clock() {
        let mut session = headless_session(ScriptedInput::hold(FrameInput::default()));
        let now = session.ctx.clock.now_ms();
        session.state.paddle.apply_power_up(PowerUpKind::Speed, now);

        session.ctx.clock.advance(POWERUP_DURATION_MS + 1);
        session.step(Duration::ZERO).unwrap();

        assert!(session.state.paddle.active_power_up.is_none());
        assert_eq!(session.state.paddle.speed, PADDLE_SPEED);
    }
}
