//! Entity models: meteors, lasers, and the small visual-state holders
//!
//! Entities own their position, movement, and collider handle. The scene
//! owns the maps they live in and the spatial index their colliders are
//! registered with.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::*;
use crate::sim::spatial::ColliderHandle;
use crate::{heading_vector, screen_center, wrap_position};

/// Opaque entity id. Monotonically increasing within a scene instance and
/// never reused.
pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MeteorSize {
    Large,
    Small,
}

/// Which sprite a meteor currently shows. A meteor in an exploding state is
/// dead for scoring purposes and gets swept by the next cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteState {
    Normal,
    ExplodingLarge,
    ExplodingSmall,
}

#[derive(Debug, Clone)]
pub struct Meteor {
    pub position: Vec2,
    pub movement: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub size: MeteorSize,
    pub sprite_state: SpriteState,
    pub sprite_variant: u32,
    pub collider: Option<ColliderHandle>,
}

impl Meteor {
    /// Spawn a large meteor on a ring outside the screen, aimed at the
    /// screen center with a jittered speed.
    pub fn new_large(base_velocity: f32, rng: &mut Pcg32) -> Self {
        debug_assert!(base_velocity.is_finite() && base_velocity >= 0.0);
        let target = screen_center();
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let r = SCREEN_WIDTH / 2.0 + METEOR_SPAWN_MARGIN;
        let position = target + Vec2::new(angle.cos(), angle.sin()) * r;

        let velocity = base_velocity + rng.random_range(0.0..METEOR_SPEED_JITTER);
        let movement = (target - position).normalize_or_zero() * velocity;

        Self {
            position,
            movement,
            rotation: 0.0,
            rotation_speed: rng.random_range(ROTATION_SPEED_MIN..=ROTATION_SPEED_MAX),
            size: MeteorSize::Large,
            sprite_state: SpriteState::Normal,
            sprite_variant: rng.random_range(0..METEOR_SPRITE_VARIANTS),
            collider: None,
        }
    }

    /// Spawn a small meteor split off a destroyed large one. Built by the
    /// same ring routine, then dropped at a random offset in [50, 100) on
    /// each axis from the parent's last position, keeping the routine's
    /// movement vector.
    pub fn new_small(base_velocity: f32, parent_position: Vec2, rng: &mut Pcg32) -> Self {
        let mut m = Self::new_large(base_velocity, rng);
        m.size = MeteorSize::Small;
        m.position = parent_position
            + Vec2::new(rng.random_range(50.0..100.0), rng.random_range(50.0..100.0));
        m
    }

    pub fn radius(&self) -> f32 {
        match self.size {
            MeteorSize::Large => METEOR_LARGE_RADIUS,
            MeteorSize::Small => METEOR_SMALL_RADIUS,
        }
    }

    pub fn is_exploding(&self) -> bool {
        self.sprite_state != SpriteState::Normal
    }

    /// Mark this meteor destroyed; the cleanup pass removes it later.
    pub fn mark_exploding(&mut self) {
        self.sprite_state = match self.size {
            MeteorSize::Large => SpriteState::ExplodingLarge,
            MeteorSize::Small => SpriteState::ExplodingSmall,
        };
    }

    /// One tick of translation, spin, and toroidal wrap.
    pub fn update(&mut self) {
        self.position += self.movement;
        self.rotation += self.rotation_speed;
        self.position = wrap_position(self.position);
    }
}

#[derive(Debug, Clone)]
pub struct Laser {
    pub position: Vec2,
    pub rotation: f32,
    pub collider: Option<ColliderHandle>,
}

impl Laser {
    pub fn new(position: Vec2, rotation: f32) -> Self {
        debug_assert!(position.is_finite());
        Self {
            position,
            rotation,
            collider: None,
        }
    }

    /// One tick of translation along the beam heading.
    pub fn update(&mut self) {
        self.position += heading_vector(self.rotation) * LASER_SPEED;
    }

    /// Beam endpoints for the collision segment.
    pub fn segment(&self) -> (Vec2, Vec2) {
        let tip = self.position + heading_vector(self.rotation) * LASER_LENGTH;
        (self.position, tip)
    }

    /// Lasers despawn at the screen edge instead of wrapping.
    pub fn is_off_screen(&self) -> bool {
        let p = self.position;
        p.x < 0.0 || p.x >= SCREEN_WIDTH || p.y < 0.0 || p.y >= SCREEN_HEIGHT
    }
}

/// A background star. Purely decorative; the field survives soft resets.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Star {
    pub position: Vec2,
    pub brightness: f32,
}

/// Generate the decorative star field.
pub fn generate_stars(count: usize, rng: &mut Pcg32) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            position: Vec2::new(
                rng.random_range(0.0..SCREEN_WIDTH),
                rng.random_range(0.0..SCREEN_HEIGHT),
            ),
            brightness: rng.random_range(0.2..1.0),
        })
        .collect()
}

/// Exhaust plume shown while the player is thrusting. Recreated every
/// thrusting tick, dropped the moment thrust is released.
#[derive(Debug, Clone, Copy)]
pub struct Exhaust {
    pub position: Vec2,
    pub rotation: f32,
}

impl Exhaust {
    /// Spawn behind the player, flame pointing opposite the heading.
    pub fn behind_player(player_position: Vec2, player_rotation: f32) -> Self {
        Self {
            position: player_position + heading_vector(player_rotation) * -EXHAUST_SPAWN_OFFSET,
            rotation: player_rotation + std::f32::consts::PI,
        }
    }
}

/// Shield bubble shown while a shield charge is active. Follows the player.
#[derive(Debug, Clone, Copy)]
pub struct Shield {
    pub position: Vec2,
    pub rotation: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn large_meteor_spawns_on_ring_aimed_at_center() {
        let mut rng = rng();
        for _ in 0..32 {
            let m = Meteor::new_large(0.25, &mut rng);
            let ring = SCREEN_WIDTH / 2.0 + METEOR_SPAWN_MARGIN;
            let dist = m.position.distance(screen_center());
            assert!((dist - ring).abs() < 1.0);
            // Movement points toward the center
            let to_center = (screen_center() - m.position).normalize_or_zero();
            assert!(m.movement.normalize_or_zero().dot(to_center) > 0.999);
            // Speed within base + jitter
            let speed = m.movement.length();
            assert!(speed >= 0.25 && speed < 0.25 + METEOR_SPEED_JITTER);
            assert!(m.rotation_speed >= ROTATION_SPEED_MIN);
            assert!(m.rotation_speed <= ROTATION_SPEED_MAX);
        }
    }

    #[test]
    fn small_meteor_offsets_from_parent() {
        let mut rng = rng();
        let parent = Vec2::new(300.0, 300.0);
        for _ in 0..32 {
            let m = Meteor::new_small(0.25, parent, &mut rng);
            assert_eq!(m.size, MeteorSize::Small);
            let off = m.position - parent;
            assert!((50.0..100.0).contains(&off.x));
            assert!((50.0..100.0).contains(&off.y));
        }
    }

    #[test]
    fn exploding_state_follows_size() {
        let mut rng = rng();
        let mut large = Meteor::new_large(0.25, &mut rng);
        large.mark_exploding();
        assert_eq!(large.sprite_state, SpriteState::ExplodingLarge);

        let mut small = Meteor::new_small(0.25, Vec2::ZERO, &mut rng);
        small.mark_exploding();
        assert_eq!(small.sprite_state, SpriteState::ExplodingSmall);
    }

    #[test]
    fn meteor_update_wraps_at_edges() {
        let mut rng = rng();
        let mut m = Meteor::new_large(0.25, &mut rng);
        m.position = Vec2::new(SCREEN_WIDTH - 0.01, 100.0);
        m.movement = Vec2::new(1.0, 0.0);
        m.update();
        assert_eq!(m.position.x, 0.0);
    }

    #[test]
    fn laser_travels_along_heading_and_despawns_off_screen() {
        let mut l = Laser::new(Vec2::new(640.0, 360.0), 0.0);
        l.update();
        assert!(l.position.y < 360.0);
        assert!(!l.is_off_screen());
        l.position = Vec2::new(640.0, -1.0);
        assert!(l.is_off_screen());
    }

    #[test]
    fn star_field_fits_the_screen() {
        let mut rng = rng();
        let stars = generate_stars(NUMBER_OF_STARS, &mut rng);
        assert_eq!(stars.len(), NUMBER_OF_STARS);
        assert!(stars.iter().all(|s| {
            (0.0..SCREEN_WIDTH).contains(&s.position.x)
                && (0.0..SCREEN_HEIGHT).contains(&s.position.y)
        }));
    }
}
