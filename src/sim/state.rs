//! Game state and core simulation types
//!
//! All state needed to reproduce a run lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::Color;

/// Ball state - anchored to the paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Ball rides the paddle top-center, waiting for launch input
    Anchored,
    /// Ball is free-moving
    Free,
}

/// A ball entity (axis-aligned square collider)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left corner of the collider
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub state: BallState,
}

impl Ball {
    /// A free ball at the default launch state
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(BALL_RESET_X, BALL_RESET_Y),
            vel: Vec2::new(BALL_SPEED_X, BALL_SPEED_Y),
            state: BallState::Free,
        }
    }

    /// A free ball at an explicit position and velocity (multiball spawns)
    pub fn with_velocity(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            state: BallState::Free,
        }
    }

    /// Return to the default launch state
    pub fn reset(&mut self) {
        *self = Ball::new();
    }

    /// Integrate one tick of motion and resolve wall bounces.
    ///
    /// The position is clamped back into the horizontal band on a side
    /// bounce and below the top edge on a top bounce, with the velocity
    /// pointed back into the field. There is no bottom wall.
    pub fn advance(&mut self) {
        self.pos += self.vel;

        let max_x = WINDOW_WIDTH - BALL_SIZE;
        if self.pos.x <= 0.0 {
            self.pos.x = 0.0;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x >= max_x {
            self.pos.x = max_x;
            self.vel.x = -self.vel.x.abs();
        }

        if self.pos.y <= 0.0 {
            self.pos.y = 0.0;
            self.vel.y = self.vel.y.abs();
        }
    }

    /// Snap to the paddle top-center (called each tick while anchored)
    pub fn anchor_to(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(
            paddle.x + paddle.width / 2.0 - BALL_SIZE / 2.0,
            PADDLE_Y - BALL_SIZE,
        );
    }

    /// Release an anchored ball with the default launch velocity
    pub fn launch(&mut self) {
        if self.state == BallState::Anchored {
            self.vel = Vec2::new(BALL_SPEED_X, BALL_SPEED_Y);
            self.state = BallState::Free;
        }
    }

    /// Collider rect
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BALL_SIZE, BALL_SIZE)
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Faster paddle movement
    Speed,
    /// Wider paddle
    Paddle,
    /// Two extra balls
    Multiball,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Speed,
        PowerUpKind::Paddle,
        PowerUpKind::Multiball,
    ];

    /// Display color, shared by falling pickups and the paddle timer bar
    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::Speed => Color::GREEN,
            PowerUpKind::Paddle => Color::BLUE,
            PowerUpKind::Multiball => Color::PURPLE,
        }
    }
}

/// An effect currently held by the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub expires_at_ms: u64,
}

impl ActivePowerUp {
    /// Milliseconds until expiry (zero once past it)
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge x coordinate (y is fixed at `PADDLE_Y`)
    pub x: f32,
    pub width: f32,
    /// Pixels moved per tick of held input
    pub speed: f32,
    /// Currently held effect, if any
    pub active_power_up: Option<ActivePowerUp>,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (WINDOW_WIDTH - PADDLE_WIDTH) / 2.0,
            width: PADDLE_WIDTH,
            speed: PADDLE_SPEED,
            active_power_up: None,
        }
    }
}

impl Paddle {
    /// Collider rect
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, PADDLE_Y, self.width, PADDLE_HEIGHT)
    }

    /// Horizontal center
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Move one step left (-1.0) or right (1.0), clamped to the playfield
    pub fn shift(&mut self, direction: f32) {
        self.x = (self.x + direction * self.speed).clamp(0.0, WINDOW_WIDTH - self.width);
    }

    /// Record a collected effect and apply its stat change.
    ///
    /// An already-held effect is overwritten without being restored first;
    /// stat changes are absolute, so collecting the same kind twice does
    /// not compound.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, now_ms: u64) {
        match kind {
            PowerUpKind::Speed => self.speed = PADDLE_BOOST_SPEED,
            PowerUpKind::Paddle => {
                self.width = PADDLE_WIDTH * PADDLE_WIDTH_BOOST;
                // Keep the widened paddle inside the field
                self.x = self.x.min(WINDOW_WIDTH - self.width);
            }
            PowerUpKind::Multiball => {}
        }
        self.active_power_up = Some(ActivePowerUp {
            kind,
            expires_at_ms: now_ms + POWERUP_DURATION_MS,
        });
    }

    /// Expire the held effect once its deadline passes
    pub fn update_power_up(&mut self, now_ms: u64) {
        if let Some(active) = &self.active_power_up {
            if now_ms > active.expires_at_ms {
                self.deactivate_power_up();
            }
        }
    }

    /// Drop the held effect. Speed returns to its base value; width is
    /// left as-is, so a widened paddle stays wide after expiry.
    pub fn deactivate_power_up(&mut self) {
        self.active_power_up = None;
        self.speed = PADDLE_SPEED;
    }
}

/// A destructible brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: Color,
    /// Takes two hits instead of one
    pub strong: bool,
    pub hits_required: u8,
    pub hits_taken: u8,
    pub visible: bool,
    /// Some when destruction drops a power-up of this kind
    pub power_up: Option<PowerUpKind>,
}

impl Brick {
    pub fn new(rect: Rect, color: Color, strong: bool, power_up: Option<PowerUpKind>) -> Self {
        Self {
            rect,
            color,
            strong,
            hits_required: if strong { STRONG_BRICK_HITS } else { 1 },
            hits_taken: 0,
            visible: true,
            power_up,
        }
    }

    /// Register one ball hit. Returns true when the brick is destroyed;
    /// destruction is terminal.
    pub fn hit(&mut self) -> bool {
        self.hits_taken += 1;
        if self.hits_taken >= self.hits_required {
            self.visible = false;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.power_up.is_some()
    }

    /// Hits still needed to destroy (shown on strong bricks)
    #[inline]
    pub fn hits_left(&self) -> u8 {
        self.hits_required.saturating_sub(self.hits_taken)
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub active: bool,
    pub created_at_ms: u64,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, now_ms: u64) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, POWERUP_SIZE, POWERUP_SIZE),
            kind,
            active: true,
            created_at_ms: now_ms,
        }
    }

    /// Fall one tick; deactivates below the playfield or after the
    /// fall timeout elapses uncollected
    pub fn fall(&mut self, now_ms: u64) {
        self.rect.y += POWERUP_FALL_SPEED;
        if self.rect.y > WINDOW_HEIGHT
            || now_ms.saturating_sub(self.created_at_ms) > POWERUP_FALL_TIMEOUT_MS
        {
            self.active = false;
        }
    }

    /// Milliseconds until the fall timeout (drives the timer bar)
    pub fn time_left_ms(&self, now_ms: u64) -> u64 {
        (self.created_at_ms + POWERUP_FALL_TIMEOUT_MS).saturating_sub(now_ms)
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Player lives
    pub lives: u8,
    /// Score (never decreases)
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Terminal once true; the tick pass becomes a no-op
    pub game_over: bool,
    /// Player paddle
    pub paddle: Paddle,
    /// Balls in play (insertion order, pruned with retain)
    pub balls: Vec<Ball>,
    /// Brick grid in row-major generation order
    pub bricks: Vec<Brick>,
    /// Falling pickups (insertion order, pruned with retain)
    pub power_ups: Vec<PowerUp>,
}

impl GameState {
    /// Create a new game with the given seed: full brick grid, one ball
    /// anchored to the paddle
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            lives: STARTING_LIVES,
            score: 0,
            time_ticks: 0,
            game_over: false,
            paddle: Paddle::default(),
            balls: Vec::new(),
            bricks: Vec::new(),
            power_ups: Vec::new(),
        };

        super::tick::generate_bricks(&mut state);
        state.spawn_ball_anchored();

        state
    }

    /// Spawn a ball riding the paddle, waiting for launch
    pub fn spawn_ball_anchored(&mut self) {
        let mut ball = Ball::new();
        ball.state = BallState::Anchored;
        ball.anchor_to(&self.paddle);
        self.balls.push(ball);
    }

    /// Count of bricks still standing
    pub fn visible_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.visible).count()
    }
}
