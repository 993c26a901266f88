//! Fixed timestep simulation tick
//!
//! Core update pass that advances the game deterministically, plus the
//! seeded brick grid generator.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::collision::{first_brick_overlap, paddle_bounce_velocity};
use super::rect::Rect;
use super::state::{Ball, BallState, Brick, GameState, PowerUp, PowerUpKind};
use crate::consts::*;
use crate::{Color, ROW_COLORS};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Hold paddle movement left
    pub left_held: bool,
    /// Hold paddle movement right
    pub right_held: bool,
    /// Launch the anchored ball (space)
    pub launch: bool,
    /// Demo mode - AI tracks the ball and auto-launches
    pub demo: bool,
}

/// Advance the game state by one tick.
///
/// `now_ms` is the monotonic clock sampled once by the caller for this
/// frame; wall-clock durations (power-up expiry, the fall timeout) are
/// measured against it rather than by counting ticks. Once `game_over`
/// is set the pass is a no-op.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if state.game_over {
        return;
    }

    state.time_ticks += 1;

    // Demo mode synthesizes input before anything reads it
    let mut input = *input;
    if input.demo {
        demo_input(state, &mut input);
    }

    // Paddle movement from held keys
    if input.left_held {
        state.paddle.shift(-1.0);
    }
    if input.right_held {
        state.paddle.shift(1.0);
    }

    if input.launch {
        for ball in &mut state.balls {
            ball.launch();
        }
    }

    // Expire the paddle's held effect
    state.paddle.update_power_up(now_ms);

    // Advance balls: anchored ones ride the paddle, free ones integrate
    // and bounce off the side and top walls
    for ball in &mut state.balls {
        match ball.state {
            BallState::Anchored => ball.anchor_to(&state.paddle),
            BallState::Free => ball.advance(),
        }
    }

    // Advance falling power-ups and prune the expired ones
    for power_up in &mut state.power_ups {
        power_up.fall(now_ms);
    }
    state.power_ups.retain(|p| p.active);

    // Paddle deflection
    let paddle_rect = state.paddle.rect();
    for ball in &mut state.balls {
        if ball.state == BallState::Free && ball.rect().overlaps(&paddle_rect) {
            ball.vel = paddle_bounce_velocity(ball.pos.x, &state.paddle);
        }
    }

    resolve_brick_hits(state, now_ms);
    collect_power_ups(state, now_ms);

    // Balls below the playfield are gone
    state.balls.retain(|ball| ball.pos.y <= WINDOW_HEIGHT);

    // Life loss and the terminal state
    if state.balls.is_empty() {
        state.lives = state.lives.saturating_sub(1);
        if state.lives == 0 {
            state.game_over = true;
            log::info!("game over at score {}", state.score);
        } else {
            log::info!("ball lost, {} lives remain", state.lives);
            state.balls.push(Ball::new());
        }
    }
}

/// Demo AI: auto-launch, then chase the lowest free ball
fn demo_input(state: &GameState, input: &mut TickInput) {
    input.launch = state.balls.iter().any(|b| b.state == BallState::Anchored);

    let target = state
        .balls
        .iter()
        .filter(|b| b.state == BallState::Free)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|ball| ball.pos.x + BALL_SIZE / 2.0);

    if let Some(x) = target {
        // Deadband of one step so the paddle doesn't oscillate
        let diff = x - state.paddle.center_x();
        input.left_held = diff < -state.paddle.speed;
        input.right_held = diff > state.paddle.speed;
    }
}

/// Resolve at most one brick hit per ball, scanning bricks in generation
/// order. Spawned power-ups are deferred to a local so the power-up list
/// is never grown mid-pass.
fn resolve_brick_hits(state: &mut GameState, now_ms: u64) {
    let mut spawned: Vec<PowerUp> = Vec::new();

    for ball in &mut state.balls {
        if ball.state != BallState::Free {
            continue;
        }
        let Some(idx) = first_brick_overlap(&ball.rect(), &state.bricks) else {
            continue;
        };

        let brick = &mut state.bricks[idx];
        let destroyed = brick.hit();
        ball.vel.y = -ball.vel.y;

        if destroyed {
            state.score += if brick.is_special() {
                SCORE_SPECIAL
            } else if brick.strong {
                SCORE_STRONG
            } else {
                SCORE_NORMAL
            };

            if let Some(kind) = brick.power_up {
                let center = brick.rect.center();
                let pos = Vec2::new(center.x - POWERUP_SIZE / 2.0, center.y);
                spawned.push(PowerUp::new(pos, kind, now_ms));
                log::debug!("brick dropped {:?} power-up", kind);
            }
        } else {
            state.score += SCORE_DAMAGE;
        }
    }

    state.power_ups.extend(spawned);
}

/// Collect power-ups that reached the paddle and apply their effects.
/// Removal goes through retain; multiball ball spawns happen after the
/// scan so the lists are never mutated mid-iteration.
fn collect_power_ups(state: &mut GameState, now_ms: u64) {
    let paddle_rect = state.paddle.rect();

    let mut collected: Vec<PowerUpKind> = Vec::new();
    state.power_ups.retain(|power_up| {
        if power_up.active && power_up.rect.overlaps(&paddle_rect) {
            collected.push(power_up.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        state.paddle.apply_power_up(kind, now_ms);
        log::debug!("collected {:?} power-up", kind);
        if kind == PowerUpKind::Multiball {
            spawn_multiball(state);
        }
    }
}

/// Two extra balls from the paddle top-center. The horizontal direction
/// comes from a tick-counter hash so the tick never touches RNG state.
fn spawn_multiball(state: &mut GameState) {
    let spawn = Vec2::new(state.paddle.center_x(), PADDLE_Y - BALL_SIZE);

    for i in 0..2u64 {
        let hash = state
            .time_ticks
            .wrapping_mul(2654435761)
            .wrapping_add(i.wrapping_mul(31337))
            .wrapping_mul(7919);
        let vx = if (hash >> 7) & 1 == 0 {
            BALL_SPEED_X
        } else {
            -BALL_SPEED_X
        };

        state
            .balls
            .push(Ball::with_velocity(spawn, Vec2::new(vx, BALL_SPEED_Y)));
    }
}

/// Build the brick grid from the state's seed, row-major.
///
/// Each cell rolls for a power-up payload first (kind drawn uniformly
/// only when the roll lands), then independently for strength. Color is
/// purple for special bricks, gray for strong, otherwise the row palette.
pub fn generate_bricks(state: &mut GameState) {
    let mut rng = state.rng_state.to_rng();
    state.bricks.clear();

    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            let rect = Rect::new(
                col as f32 * (BRICK_WIDTH + BRICK_GAP) + BRICK_INSET,
                row as f32 * (BRICK_HEIGHT + BRICK_GAP) + BRICK_INSET,
                BRICK_WIDTH,
                BRICK_HEIGHT,
            );

            let power_up = if rng.random::<f32>() < SPECIAL_BRICK_CHANCE {
                PowerUpKind::ALL.choose(&mut rng).copied()
            } else {
                None
            };
            let strong = rng.random::<f32>() < STRONG_BRICK_CHANCE;

            let color = if power_up.is_some() {
                Color::PURPLE
            } else if strong {
                Color::GRAY
            } else {
                ROW_COLORS[row % ROW_COLORS.len()]
            };

            state.bricks.push(Brick::new(rect, color, strong, power_up));
        }
    }

    log::info!("generated {} bricks from seed {}", state.bricks.len(), state.seed);
}
