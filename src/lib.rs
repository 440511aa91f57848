//! Boss Rush - A frame-driven boss-fight combat core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, boss patterns, combat, progression)
//! - `catalog`: Read-only registries for weapons, skills and artifacts
//! - `persistence`: Session snapshot save/load boundary
//! - `settings`: Run configuration (difficulty, class, seed)

pub mod catalog;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Canvas dimensions (y grows downward)
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;
    /// Projectiles farther than this outside the canvas are pruned
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_BASE_HEALTH: f32 = 100.0;
    pub const MOVE_SPEED: f32 = 5.0;
    pub const JUMP_VELOCITY: f32 = -13.0;
    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.6;
    pub const MAX_FALL_SPEED: f32 = 18.0;

    /// Dodge lasts until its cooldown expires; only the first frames are invulnerable
    pub const DODGE_COOLDOWN: u32 = 45;
    pub const DODGE_IFRAMES: u32 = 18;
    /// Invulnerability after taking a hit
    pub const HIT_IFRAMES: u32 = 30;

    /// Boss defaults
    pub const BOSS_WIDTH: f32 = 120.0;
    pub const BOSS_HEIGHT: f32 = 120.0;
    /// Wander bounding box (inside the canvas)
    pub const BOSS_MIN_X: f32 = 150.0;
    pub const BOSS_MAX_X: f32 = CANVAS_WIDTH - 150.0 - BOSS_WIDTH;
    pub const BOSS_MIN_Y: f32 = 60.0;
    pub const BOSS_MAX_Y: f32 = 360.0;

    /// Waves
    pub const MAX_WAVE: u32 = 100;
    pub const REWARD_WAVE_INTERVAL: u32 = 10;

    /// Boss projectile speed multiplier while a slow field is active
    pub const SLOW_FIELD_MULTIPLIER: f32 = 0.5;
    /// Lifetime of floating damage numbers
    pub const DAMAGE_TEXT_TICKS: u32 = 45;
}

/// Unit vector for an angle in radians
#[inline]
pub fn angle_to_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of the direction from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
