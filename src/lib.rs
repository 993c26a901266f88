//! Brick Strike - An arcade brick-breaking game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: Draw-step generation against the surface abstraction
//! - `platform`: Terminal/headless boundary services (surface, input, clock)
//! - `session`: Fixed-rate session loop wiring input, simulation, and drawing

pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;

pub use session::Session;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const WINDOW_WIDTH: f32 = 1280.0;
    pub const WINDOW_HEIGHT: f32 = 900.0;

    /// Target frame rate and frame budget
    pub const FPS: u32 = 60;
    pub const FRAME_MICROS: u64 = 1_000_000 / FPS as u64;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Paddle speed while a speed power-up is active
    pub const PADDLE_BOOST_SPEED: f32 = 12.0;
    /// Width multiplier while a paddle power-up is active
    pub const PADDLE_WIDTH_BOOST: f32 = 1.5;
    /// Paddle rests this far above the bottom edge
    pub const PADDLE_Y: f32 = WINDOW_HEIGHT - 40.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 10.0;
    /// Default launch velocity (pixels per tick)
    pub const BALL_SPEED_X: f32 = 5.0;
    pub const BALL_SPEED_Y: f32 = -5.0;
    /// Default launch position
    pub const BALL_RESET_X: f32 = WINDOW_WIDTH / 2.0;
    pub const BALL_RESET_Y: f32 = WINDOW_HEIGHT - 60.0;

    /// Paddle bounce: normalized impact offset times max-angle
    /// coefficient times speed scale gives the outgoing vx
    pub const PADDLE_MAX_BOUNCE: f32 = 0.75;
    pub const PADDLE_BOUNCE_SCALE: f32 = 5.0;

    /// Brick grid
    pub const BRICK_WIDTH: f32 = 80.0;
    pub const BRICK_HEIGHT: f32 = 30.0;
    pub const BRICK_ROWS: usize = 8;
    pub const BRICK_COLS: usize = 15;
    /// Spacing between cells and the grid origin inset
    pub const BRICK_GAP: f32 = 2.0;
    pub const BRICK_INSET: f32 = 1.0;
    /// Chance a generated brick carries a power-up
    pub const SPECIAL_BRICK_CHANCE: f32 = 0.10;
    /// Chance a generated brick takes two hits
    pub const STRONG_BRICK_CHANCE: f32 = 0.15;
    pub const STRONG_BRICK_HITS: u8 = 2;

    /// Scoring
    pub const SCORE_SPECIAL: u64 = 30;
    pub const SCORE_STRONG: u64 = 20;
    pub const SCORE_NORMAL: u64 = 10;
    pub const SCORE_DAMAGE: u64 = 5;

    /// Power-up defaults
    pub const POWERUP_SIZE: f32 = 20.0;
    /// Fall speed (pixels per tick)
    pub const POWERUP_FALL_SPEED: f32 = 3.0;
    /// Active duration once collected
    pub const POWERUP_DURATION_MS: u64 = 10_000;
    /// A falling power-up expires this long after spawning
    pub const POWERUP_FALL_TIMEOUT_MS: u64 = 5_000;

    pub const STARTING_LIVES: u8 = 3;
}

/// Solid RGB color used by entity palettes and the draw step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Brick row palette, cycled by row index
pub const ROW_COLORS: [Color; 6] = [
    Color::RED,
    Color::GREEN,
    Color::BLUE,
    Color::YELLOW,
    Color::WHITE,
    Color::ORANGE,
];
