//! Collision queries and response for the paddle and brick grid
//!
//! Everything is axis-aligned, so detection is rect overlap; the
//! interesting part is the paddle deflection, which steers the ball by
//! where it struck along the paddle face.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Brick, Paddle};
use crate::consts::*;

/// Outgoing velocity for a ball that struck the paddle.
///
/// The horizontal component scales with the impact offset from the paddle
/// center, normalized by the half-width and clamped to [-1, 1]: dead
/// center rebounds straight up, the rim sends the ball out at the maximum
/// angle. The vertical component is reset to the fixed launch speed, so
/// paddle hits never accumulate speed.
pub fn paddle_bounce_velocity(ball_x: f32, paddle: &Paddle) -> Vec2 {
    let half_width = paddle.width / 2.0;
    let offset = ((ball_x - paddle.center_x()) / half_width).clamp(-1.0, 1.0);

    Vec2::new(
        offset * PADDLE_MAX_BOUNCE * PADDLE_BOUNCE_SCALE,
        BALL_SPEED_Y,
    )
}

/// Index of the first visible brick overlapping the rect, scanning in
/// insertion (generation) order. At most one brick is resolved per ball
/// per tick, so the first match wins.
pub fn first_brick_overlap(rect: &Rect, bricks: &[Brick]) -> Option<usize> {
    bricks
        .iter()
        .position(|brick| brick.visible && brick.rect.overlaps(rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_paddle_bounce_center_is_vertical() {
        let paddle = Paddle::default();
        let vel = paddle_bounce_velocity(paddle.center_x(), &paddle);
        assert_eq!(vel.x, 0.0);
        assert_eq!(vel.y, BALL_SPEED_Y);
    }

    #[test]
    fn test_paddle_bounce_steers_toward_impact_side() {
        let paddle = Paddle::default();
        let max_vx = PADDLE_MAX_BOUNCE * PADDLE_BOUNCE_SCALE;

        // Left rim deflects left at the maximum angle
        let vel = paddle_bounce_velocity(paddle.x, &paddle);
        assert!((vel.x - (-max_vx)).abs() < 0.001);

        // Right rim deflects right
        let vel = paddle_bounce_velocity(paddle.x + paddle.width, &paddle);
        assert!((vel.x - max_vx).abs() < 0.001);

        // Halfway between center and right rim
        let vel = paddle_bounce_velocity(paddle.center_x() + paddle.width / 4.0, &paddle);
        assert!((vel.x - max_vx / 2.0).abs() < 0.001);
    }

    #[test]
    fn test_paddle_bounce_offset_clamped() {
        let paddle = Paddle::default();
        let max_vx = PADDLE_MAX_BOUNCE * PADDLE_BOUNCE_SCALE;

        // An impact past the rim still caps at the maximum angle
        let vel = paddle_bounce_velocity(paddle.x + paddle.width * 2.0, &paddle);
        assert!((vel.x - max_vx).abs() < 0.001);
    }

    #[test]
    fn test_first_brick_overlap_takes_insertion_order() {
        let ball = Rect::new(10.0, 10.0, 10.0, 10.0);
        let bricks = vec![
            Brick::new(Rect::new(0.0, 0.0, 80.0, 30.0), Color::RED, false, None),
            Brick::new(Rect::new(0.0, 0.0, 80.0, 30.0), Color::GREEN, false, None),
        ];

        assert_eq!(first_brick_overlap(&ball, &bricks), Some(0));
    }

    #[test]
    fn test_first_brick_overlap_skips_destroyed() {
        let ball = Rect::new(10.0, 10.0, 10.0, 10.0);
        let mut bricks = vec![
            Brick::new(Rect::new(0.0, 0.0, 80.0, 30.0), Color::RED, false, None),
            Brick::new(Rect::new(0.0, 0.0, 80.0, 30.0), Color::GREEN, false, None),
            Brick::new(Rect::new(500.0, 0.0, 80.0, 30.0), Color::BLUE, false, None),
        ];
        bricks[0].hit();

        assert_eq!(first_brick_overlap(&ball, &bricks), Some(1));
        bricks[1].hit();
        assert_eq!(first_brick_overlap(&ball, &bricks), None);
    }

    mod props {
        use super::*;
        use crate::consts::WINDOW_WIDTH;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_bounce_speed_is_bounded(
                ball_x in -100.0f32..(WINDOW_WIDTH + 100.0),
                paddle_x in 0.0f32..(WINDOW_WIDTH - PADDLE_WIDTH),
            ) {
                let paddle = Paddle {
                    x: paddle_x,
                    ..Paddle::default()
                };
                let vel = paddle_bounce_velocity(ball_x, &paddle);
                prop_assert!(vel.x.abs() <= PADDLE_MAX_BOUNCE * PADDLE_BOUNCE_SCALE);
                prop_assert_eq!(vel.y, BALL_SPEED_Y);
            }
        }
    }
}
