//! The player ship
//!
//! Owns its pose, thrust scalar, cooldowns, shield charges, and death state.
//! Each tick produces a small effects summary that the owning scene applies:
//! lasers to spawn, cues to raise, whether the exhaust plume is visible.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::*;
use crate::input::InputState;
use crate::sim::spatial::ColliderHandle;
use crate::sim::timer::Timer;
use crate::{heading_vector, screen_center, wrap_position};

/// Death progression. Transitions only Alive -> Dying -> Dead; a scene
/// reset replaces the whole player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeathState {
    Alive,
    /// Frame counter for the explosion animation, 0..DYING_FRAMES
    Dying(u32),
    Dead,
}

/// What happened during one player tick, for the scene to act on.
#[derive(Debug, Default)]
pub struct PlayerEffects {
    /// A laser left the muzzle at this pose.
    pub fired: Option<(Vec2, f32)>,
    /// Thrust held this tick (exhaust visible, thrust cue rumbling).
    pub thrusting: bool,
    /// Thrust released this tick (stop the rumble).
    pub thrust_released: bool,
    /// A shield charge was spent this tick.
    pub shield_raised: bool,
}

#[derive(Debug)]
pub struct Player {
    pub position: Vec2,
    pub rotation: f32,
    /// Speed scalar along the current heading (pixels per tick).
    pub velocity: f32,
    /// Thrust ramp, owned here rather than shared process state.
    cur_acceleration: f32,
    pub collider: Option<ColliderHandle>,
    shoot_cool_down: Timer,
    burst_cool_down: Timer,
    shots_fired: u32,
    pub is_shielded: bool,
    shield_timer: Timer,
    pub shields_remaining: u32,
    pub lives_remaining: u32,
    pub death_state: DeathState,
    dying_timer: Timer,
    hyperspace_timer: Timer,
}

impl Player {
    /// A fresh player at the default spawn pose.
    pub fn new(lives_remaining: u32) -> Self {
        Self {
            position: screen_center(),
            rotation: 0.0,
            velocity: 0.0,
            cur_acceleration: 0.0,
            collider: None,
            shoot_cool_down: Timer::from_millis(SHOOT_COOL_DOWN_MS),
            burst_cool_down: Timer::from_millis(BURST_COOL_DOWN_MS),
            shots_fired: 0,
            is_shielded: false,
            shield_timer: Timer::from_millis(SHIELD_DURATION_MS),
            shields_remaining: NUMBER_OF_SHIELDS,
            lives_remaining,
            death_state: DeathState::Alive,
            dying_timer: Timer::from_millis(DYING_ANIMATION_MS),
            hyperspace_timer: Timer::from_millis(HYPERSPACE_COOL_DOWN_MS),
        }
    }

    pub fn radius(&self) -> f32 {
        PLAYER_RADIUS
    }

    pub fn is_alive(&self) -> bool {
        self.death_state == DeathState::Alive
    }

    /// Advance movement, shield, hyperspace, and firing for one tick.
    pub fn update(&mut self, input: &InputState, now_ms: u64, rng: &mut Pcg32) -> PlayerEffects {
        let mut effects = PlayerEffects {
            thrust_released: input.thrust_released,
            ..PlayerEffects::default()
        };

        let turn_speed = ROTATION_PER_SECOND / TICKS_PER_SECOND as f32;
        if input.turn_left {
            self.rotation -= turn_speed;
        }
        if input.turn_right {
            self.rotation += turn_speed;
        }

        if input.thrust {
            self.accelerate();
            effects.thrusting = true;
        }

        self.update_shield(input, now_ms, &mut effects);
        self.hyperspace(input, now_ms, rng);
        self.fire_lasers(input, now_ms, &mut effects);

        effects
    }

    /// Thrust ramp: +4 per held tick, clamped to 8. Translation happens only
    /// while the key is held; there is no drift afterwards.
    fn accelerate(&mut self) {
        self.position = wrap_position(self.position);

        if self.cur_acceleration < MAX_ACCELERATION {
            self.cur_acceleration = self.velocity + ACCELERATION_STEP;
        }
        if self.cur_acceleration >= MAX_ACCELERATION {
            self.cur_acceleration = MAX_ACCELERATION;
        }
        self.velocity = self.cur_acceleration;

        self.position += heading_vector(self.rotation) * self.cur_acceleration;
    }

    fn update_shield(&mut self, input: &InputState, now_ms: u64, effects: &mut PlayerEffects) {
        if input.shield && !self.is_shielded && self.shields_remaining > 0 {
            self.shields_remaining -= 1;
            self.is_shielded = true;
            self.shield_timer.reset(now_ms);
            effects.shield_raised = true;
        } else if self.is_shielded && self.shield_timer.trigger_once(now_ms) {
            self.is_shielded = false;
        }
    }

    fn hyperspace(&mut self, input: &InputState, now_ms: u64, rng: &mut Pcg32) {
        if input.hyperspace && self.hyperspace_timer.is_ready(now_ms) {
            self.position = Vec2::new(
                rng.random_range(0.0..SCREEN_WIDTH),
                rng.random_range(0.0..SCREEN_HEIGHT),
            );
            self.hyperspace_timer.reset(now_ms);
        }
    }

    pub fn hyperspace_ready(&self, now_ms: u64) -> bool {
        self.hyperspace_timer.is_ready(now_ms)
    }

    /// Dual-cooldown firing. The per-shot cooldown paces shots inside a
    /// burst; the burst cooldown re-arms after the third shot. The shot
    /// attempt that overruns the burst spends a shot-cooldown cycle on
    /// re-arming the burst instead of firing.
    fn fire_lasers(&mut self, input: &InputState, now_ms: u64, effects: &mut PlayerEffects) {
        if !self.burst_cool_down.is_ready(now_ms) {
            return;
        }
        if self.shoot_cool_down.is_ready(now_ms) && input.fire {
            self.shoot_cool_down.reset(now_ms);
            self.shots_fired += 1;
            if self.shots_fired <= MAX_SHOTS_PER_BURST {
                let muzzle = self.position + heading_vector(self.rotation) * LASER_SPAWN_OFFSET;
                effects.fired = Some((muzzle, self.rotation));
            } else {
                self.burst_cool_down.reset(now_ms);
                self.shots_fired = 0;
            }
        }
    }

    /// Begin the death sequence. Shielded players never reach this.
    pub fn start_dying(&mut self, now_ms: u64) {
        if self.death_state == DeathState::Alive {
            self.death_state = DeathState::Dying(0);
            self.dying_timer.reset(now_ms);
        }
    }

    /// Advance the explosion animation; flips to Dead after the last frame.
    pub fn advance_dying(&mut self, now_ms: u64) {
        if let DeathState::Dying(counter) = self.death_state {
            if self.dying_timer.trigger_repeating(now_ms) {
                let next = counter + 1;
                if next == DYING_FRAMES {
                    self.death_state = DeathState::Dead;
                } else {
                    self.death_state = DeathState::Dying(next);
                }
            }
        }
    }
}
