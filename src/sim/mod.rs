//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only, clocked by the caller
//! - Seeded RNG only
//! - Stable iteration order (insertion order, pruned with retain)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{first_brick_overlap, paddle_bounce_velocity};
pub use rect::Rect;
pub use state::{
    ActivePowerUp, Ball, BallState, Brick, GameState, Paddle, PowerUp, PowerUpKind, RngState,
};
pub use tick::{TickInput, generate_bricks, tick};
