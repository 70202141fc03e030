//! Scrollshot - a top-down scrolling arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, waves)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Duration of one nominal frame in milliseconds (60 Hz).
    /// A frame delta scale of 1.0 corresponds to this many milliseconds.
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest host-time gap accepted as a single frame
    pub const MAX_FRAME_MS: f32 = 100.0;
    /// Slack when comparing summed frame times against a countdown duration.
    /// Covers the f32 rounding of fractional frame times, far below any frame.
    pub const COUNTDOWN_EPSILON_MS: f64 = 1e-3;

    /// Viewport dimensions (the environment is twice this in each dimension)
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_HEALTH: f32 = 100.0;
    /// Invulnerability window after taking a hit
    pub const PLAYER_INVULNERABLE_MS: f32 = 1000.0;
    /// Contact damage an enemy deals to the player
    pub const CONTACT_DAMAGE: f32 = 10.0;

    /// Hit flash duration (half opacity) for player and enemies
    pub const FLASH_MS: f32 = 100.0;

    /// Gun muzzle distance from the player's anchor
    pub const GUN_OFFSET: f32 = 100.0;

    /// Bullet defaults
    pub const BULLET_SIZE: f32 = 20.0;
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_LIFE_MS: f32 = 5000.0;
    /// Inset from the environment edge past which bullets are culled
    pub const BULLET_BOUNDS_MARGIN: f32 = 10.0;
    /// Bullet damage before the difficulty multiplier is applied
    pub const BASE_DAMAGE: f32 = 10.0;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 100.0;
    pub const ENEMY_HEIGHT: f32 = 50.0;
    pub const ENEMY_BASE_SPEED: f32 = 5.0;
    pub const ENEMY_BASE_HEALTH: f32 = 100.0;
    pub const ENEMY_STOP_RANGE: f32 = 300.0;

    /// Broad-phase cull radius as a multiple of the second hitbox's width
    pub const BROAD_PHASE_FACTOR: f32 = 1.5;

    /// Spawn field cell size (world units)
    pub const GRID_SIZE: f32 = 16.0;
    /// World units per noise lattice step
    pub const NOISE_SCALE: f32 = 100.0;
    /// Rejection sampling cap before falling back to a fixed point
    pub const MAX_SPAWN_ATTEMPTS: u32 = 64;

    /// Difficulty director starting values
    pub const START_MULTIPLIER: u32 = 1;
    pub const START_MAX_ENEMY: u32 = 5;
    /// Spawn cadence numerator: frames between spawns = this / multiplier
    pub const SPAWN_CADENCE_FRAMES: f32 = 1000.0;
}

/// Unit direction vector for an angle in radians
#[inline]
pub fn heading(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_towards(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Rotate a vector by `theta` radians
#[inline]
pub fn rotate(v: Vec2, theta: f32) -> Vec2 {
    Vec2::from_angle(theta).rotate(v)
}
