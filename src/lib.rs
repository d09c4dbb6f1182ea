//! Meteor Storm - fixed-tick simulation core for an Asteroids-style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (timers, broad-phase, entities, player)
//! - `scenes`: Scene state machine (title, playing, level intro, game over)
//! - `app`: Driver-facing update/draw/layout surface
//! - `audio`: Discrete cue signalling to an external audio player
//! - `highscore`: Single-value high-score persistence
//! - `snapshot`: Read-only entity snapshots for an external renderer

pub mod app;
pub mod audio;
pub mod highscore;
pub mod input;
pub mod scenes;
pub mod sim;
pub mod snapshot;

pub use app::{App, UpdateOutcome};
pub use input::InputState;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u64 = 60;

    /// Screen dimensions (16:9)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Base speed for newly spawned meteors (pixels per tick)
    pub const BASE_METEOR_VELOCITY: f32 = 0.25;
    /// Meteor spawn cadence
    pub const METEOR_SPAWN_MS: u64 = 100;
    /// How much the base velocity increases each speed-up interval
    pub const METEOR_SPEED_UP_AMOUNT: f32 = 0.1;
    /// Speed-up interval
    pub const METEOR_SPEED_UP_MS: u64 = 1000;
    /// Interval between sweeps of exploded meteors
    pub const CLEAN_UP_EXPLOSION_MS: u64 = 200;
    /// Distance beyond the half-screen ring where meteors spawn
    pub const METEOR_SPAWN_MARGIN: f32 = 500.0;
    /// Random speed jitter added to the base velocity on spawn
    pub const METEOR_SPEED_JITTER: f32 = 1.5;
    /// Meteor rotation speed range (radians per tick)
    pub const ROTATION_SPEED_MIN: f32 = -0.02;
    pub const ROTATION_SPEED_MAX: f32 = 0.02;
    /// Upper bound (exclusive) on smalls split from a large meteor
    pub const SMALLS_PER_LARGE_METEOR: u32 = 4;
    /// Number of meteor sprite variants
    pub const METEOR_SPRITE_VARIANTS: u32 = 8;

    /// Collider radii
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const METEOR_LARGE_RADIUS: f32 = 50.0;
    pub const METEOR_SMALL_RADIUS: f32 = 25.0;

    /// Player turn rate (radians per second, applied per tick)
    pub const ROTATION_PER_SECOND: f32 = std::f32::consts::PI;
    /// Thrust ramp per held tick and its clamp
    pub const ACCELERATION_STEP: f32 = 4.0;
    pub const MAX_ACCELERATION: f32 = 8.0;
    /// Per-shot cooldown
    pub const SHOOT_COOL_DOWN_MS: u64 = 150;
    /// Burst cooldown after a full burst
    pub const BURST_COOL_DOWN_MS: u64 = 500;
    /// Shots allowed per burst
    pub const MAX_SHOTS_PER_BURST: u32 = 3;
    /// Where lasers and exhaust spawn relative to the player center
    pub const LASER_SPAWN_OFFSET: f32 = 50.0;
    pub const EXHAUST_SPAWN_OFFSET: f32 = 50.0;
    /// One frame of the death animation
    pub const DYING_ANIMATION_MS: u64 = 50;
    /// Frames in the death animation
    pub const DYING_FRAMES: u32 = 12;

    /// Laser speed (pixels per tick) and beam length
    pub const LASER_SPEED: f32 = 7.0;
    pub const LASER_LENGTH: f32 = 15.0;

    /// Shield charges granted on scene start / soft reset
    pub const NUMBER_OF_SHIELDS: u32 = 3;
    /// How long an activated shield stays up
    pub const SHIELD_DURATION_MS: u64 = 3000;
    /// Hyperspace jump cooldown
    pub const HYPERSPACE_COOL_DOWN_MS: u64 = 10_000;

    /// Starting lives and the hard cap reached via level bonuses
    pub const STARTING_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 6;
    /// A bonus life is granted every this many levels
    pub const BONUS_LIFE_LEVEL_INTERVAL: u32 = 5;

    /// Background beat cadence: base interval, step down per beat, floor
    pub const BASE_BEAT_WAIT_MS: u64 = 1600;
    pub const BEAT_SPEED_UP_MS: u64 = 25;
    pub const MIN_BEAT_WAIT_MS: u64 = 400;
    /// Delay before the first beat of a scene
    pub const FIRST_BEAT_DELAY_MS: u64 = 2000;

    /// Stars in the decorative background field
    pub const NUMBER_OF_STARS: usize = 1000;

    /// Pause between levels in the level-intro scene
    pub const NEXT_LEVEL_DELAY_MS: u64 = 2000;

    /// Decorative meteors on the title and game-over screens
    pub const TITLE_METEOR_COUNT: usize = 10;
    pub const GAME_OVER_METEOR_COUNT: usize = 5;
}

/// Wrap a position onto the toroidal screen.
///
/// Boundary law: a coordinate at exactly `width` wraps to `0`, and any
/// negative coordinate wraps to `width`. Both axes behave the same way.
#[inline]
pub fn wrap_position(pos: Vec2) -> Vec2 {
    let mut p = pos;
    if p.x >= consts::SCREEN_WIDTH {
        p.x = 0.0;
    }
    if p.x < 0.0 {
        p.x = consts::SCREEN_WIDTH;
    }
    if p.y >= consts::SCREEN_HEIGHT {
        p.y = 0.0;
    }
    if p.y < 0.0 {
        p.y = consts::SCREEN_HEIGHT;
    }
    p
}

/// Center of the screen, the point meteors are aimed at.
#[inline]
pub fn screen_center() -> Vec2 {
    Vec2::new(consts::SCREEN_WIDTH / 2.0, consts::SCREEN_HEIGHT / 2.0)
}

/// Unit vector for a heading where 0 points straight up and angles grow
/// clockwise (sprite convention carried by the whole game).
#[inline]
pub fn heading_vector(rotation: f32) -> Vec2 {
    Vec2::new(rotation.sin(), -rotation.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wrap_at_exact_width_goes_to_zero() {
        let p = wrap_position(Vec2::new(consts::SCREEN_WIDTH, 100.0));
        assert_eq!(p.x, 0.0);
        let p = wrap_position(Vec2::new(100.0, consts::SCREEN_HEIGHT));
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn wrap_below_zero_goes_to_width() {
        let p = wrap_position(Vec2::new(-f32::EPSILON, 100.0));
        assert_eq!(p.x, consts::SCREEN_WIDTH);
        let p = wrap_position(Vec2::new(100.0, -0.001));
        assert_eq!(p.y, consts::SCREEN_HEIGHT);
    }

    proptest! {
        #[test]
        fn wrap_is_identity_inside_screen(
            x in 0.0f32..consts::SCREEN_WIDTH,
            y in 0.0f32..consts::SCREEN_HEIGHT,
        ) {
            let p = Vec2::new(x, y);
            prop_assert_eq!(wrap_position(p), p);
        }

        #[test]
        fn wrap_lands_on_screen_within_one_overshoot(
            x in -1280.0f32..2559.0,
            y in -720.0f32..1439.0,
        ) {
            let p = wrap_position(Vec2::new(x, y));
            prop_assert!((0.0..=consts::SCREEN_WIDTH).contains(&p.x));
            prop_assert!((0.0..=consts::SCREEN_HEIGHT).contains(&p.y));
        }
    }

    #[test]
    fn heading_zero_points_up() {
        let h = heading_vector(0.0);
        assert!(h.x.abs() < 1e-6);
        assert!((h.y + 1.0).abs() < 1e-6);
    }
}
