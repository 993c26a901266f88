//! Draw-list construction for a game frame
//!
//! Pure translation from [`GameState`] to [`Surface`] calls. Anything
//! time-based here (effect timer bars) reads the same clock the tick
//! ran with, so a frame is fully determined by state plus `now_ms`.

use glam::Vec2;

use crate::Color;
use crate::consts::{
    PADDLE_Y, POWERUP_DURATION_MS, POWERUP_FALL_TIMEOUT_MS, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::platform::Surface;
use crate::sim::{Brick, GameState, Paddle, PowerUp, Rect};

/// Height of the thin timer bars over paddle and pickups
const TIMER_BAR_HEIGHT: f32 = 3.0;
/// Gap between a timer bar and the thing it annotates
const TIMER_BAR_RISE: f32 = 5.0;
/// Radius of the dot marking a power-up brick
const SPECIAL_DOT_RADIUS: f32 = 5.0;
/// Border thickness marking a reinforced brick
const STRONG_BORDER: f32 = 2.0;

/// Emit one full frame of draw calls. Present is left to the caller.
pub fn draw(state: &GameState, now_ms: u64, surface: &mut impl Surface) {
    surface.clear(Color::BLACK);

    draw_paddle(&state.paddle, now_ms, surface);

    for ball in &state.balls {
        surface.draw_rect(ball.rect(), Color::WHITE);
    }

    for brick in state.bricks.iter().filter(|b| b.visible) {
        draw_brick(brick, surface);
    }

    for power_up in &state.power_ups {
        draw_power_up(power_up, now_ms, surface);
    }

    surface.draw_text(
        &format!("Score: {}", state.score),
        Vec2::new(10.0, WINDOW_HEIGHT - 30.0),
        Color::WHITE,
    );
    surface.draw_text(
        &format!("Lives: {}", state.lives),
        Vec2::new(WINDOW_WIDTH - 100.0, WINDOW_HEIGHT - 30.0),
        Color::WHITE,
    );

    if state.game_over {
        surface.draw_text(
            "GAME OVER",
            Vec2::new(WINDOW_WIDTH / 2.0 - 100.0, WINDOW_HEIGHT / 2.0),
            Color::RED,
        );
    }
}

fn draw_paddle(paddle: &Paddle, now_ms: u64, surface: &mut impl Surface) {
    surface.draw_rect(paddle.rect(), Color::WHITE);

    // Effect countdown drains the bar from full paddle width to zero
    if let Some(active) = &paddle.active_power_up {
        let fraction = active.remaining_ms(now_ms) as f32 / POWERUP_DURATION_MS as f32;
        surface.draw_rect(
            Rect::new(
                paddle.x,
                PADDLE_Y - TIMER_BAR_RISE,
                paddle.width * fraction,
                TIMER_BAR_HEIGHT,
            ),
            active.kind.color(),
        );
    }
}

fn draw_brick(brick: &Brick, surface: &mut impl Surface) {
    surface.draw_rect(brick.rect, brick.color);

    if brick.is_special() {
        surface.draw_circle(brick.rect.center(), SPECIAL_DOT_RADIUS, Color::WHITE);
    }
    if brick.strong {
        stroke_rect(brick.rect, STRONG_BORDER, Color::GRAY, surface);
        surface.draw_text(&brick.hits_left().to_string(), brick.rect.center(), Color::WHITE);
    }
}

fn draw_power_up(power_up: &PowerUp, now_ms: u64, surface: &mut impl Surface) {
    surface.draw_rect(power_up.rect, power_up.kind.color());

    // Pickup-timeout bar, same shape as the paddle's effect bar
    let fraction = power_up.time_left_ms(now_ms) as f32 / POWERUP_FALL_TIMEOUT_MS as f32;
    surface.draw_rect(
        Rect::new(
            power_up.rect.x,
            power_up.rect.y - TIMER_BAR_RISE,
            power_up.rect.w * fraction,
            TIMER_BAR_HEIGHT,
        ),
        Color::WHITE,
    );
}

/// Outline a rect as four thin filled rects
fn stroke_rect(rect: Rect, thickness: f32, color: Color, surface: &mut impl Surface) {
    surface.draw_rect(Rect::new(rect.x, rect.y, rect.w, thickness), color);
    surface.draw_rect(
        Rect::new(rect.x, rect.bottom() - thickness, rect.w, thickness),
        color,
    );
    surface.draw_rect(Rect::new(rect.x, rect.y, thickness, rect.h), color);
    surface.draw_rect(
        Rect::new(rect.right() - thickness, rect.y, thickness, rect.h),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BRICK_HEIGHT, BRICK_WIDTH, PADDLE_WIDTH, POWERUP_SIZE};
    use crate::platform::headless::{DrawCmd, RecordingSurface};
    use crate::sim::PowerUpKind;

    #[test]
    fn test_frame_starts_with_a_clear() {
        let state = GameState::new(3);
        let mut surface = RecordingSurface::new();

        draw(&state, 0, &mut surface);

        assert_eq!(surface.commands[0], DrawCmd::Clear(Color::BLACK));
    }

    #[test]
    fn test_game_over_banner() {
        let mut state = GameState::new(3);
        let mut surface = RecordingSurface::new();

        draw(&state, 0, &mut surface);
        assert!(!surface.has_text("GAME OVER"));

        state.game_over = true;
        draw(&state, 0, &mut surface);
        assert!(surface.has_text("GAME OVER"));
        assert!(surface.has_text("Score: 0"));
    }

    #[test]
    fn test_destroyed_brick_is_not_drawn() {
        let mut state = GameState::new(3);
        let mut surface = RecordingSurface::new();

        draw(&state, 0, &mut surface);
        let full_wave = surface.commands.len();

        state.bricks[0].visible = false;
        draw(&state, 0, &mut surface);
        assert!(surface.commands.len() < full_wave);
    }

    #[test]
    fn test_paddle_timer_bar_drains_with_the_clock() {
        let mut state = GameState::new(3);
        // Green row bricks would collide with the green Speed bar below
        state.bricks.clear();
        state.paddle.apply_power_up(PowerUpKind::Speed, 0);
        let mut surface = RecordingSurface::new();

        draw(&state, POWERUP_DURATION_MS / 2, &mut surface);

        let bars = surface.rects_with_color(PowerUpKind::Speed.color());
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].w, PADDLE_WIDTH / 2.0);
        assert_eq!(bars[0].y, PADDLE_Y - TIMER_BAR_RISE);
    }

    #[test]
    fn test_pickup_timeout_bar_at_half_life() {
        let mut state = GameState::new(3);
        state.bricks.clear();
        state.power_ups.push(PowerUp::new(
            Vec2::new(200.0, 300.0),
            PowerUpKind::Paddle,
            1_000,
        ));
        let mut surface = RecordingSurface::new();

        draw(&state, 1_000 + POWERUP_FALL_TIMEOUT_MS / 2, &mut surface);

        let bars = surface.rects_with_color(Color::WHITE);
        let bar = bars
            .iter()
            .find(|r| r.h == TIMER_BAR_HEIGHT)
            .copied()
            .unwrap();
        assert_eq!(bar.w, POWERUP_SIZE / 2.0);
    }

    #[test]
    fn test_strong_brick_shows_hits_left() {
        let mut state = GameState::new(3);
        state.bricks.clear();
        state.bricks.push(Brick::new(
            Rect::new(100.0, 100.0, BRICK_WIDTH, BRICK_HEIGHT),
            Color::GRAY,
            true,
            None,
        ));
        let mut surface = RecordingSurface::new();

        draw(&state, 0, &mut surface);
        assert!(surface.has_text("2"));

        state.bricks[0].hit();
        draw(&state, 0, &mut surface);
        assert!(surface.has_text("1"));
    }
}
