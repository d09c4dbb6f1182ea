//! The playing scene
//!
//! Owns the player, the meteor and laser maps, the shared spatial index,
//! and every cadence timer. One `update` call advances a full logical tick
//! in a fixed order: player, visual effects, death resolution, spawning,
//! entity motion, difficulty ramp, collisions, cleanup, beat cadence,
//! level-complete check.

use std::collections::BTreeMap;

#[cfg(test)]
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::Cue;
use crate::consts::*;
use crate::scenes::{SceneAction, SceneContext};
use crate::sim::{
    ColliderHandle, ColliderKind, DeathState, EntityId, Exhaust, Laser, Meteor, MeteorSize, Shape,
    Shield, SpatialGrid, Star, TickClock, Timer, entity::generate_stars, player::Player,
};
use crate::snapshot::{
    FrameSnapshot, LaserView, MeteorView, PlayerSprite, PlayerView, PoseView, SceneMode,
};
use crate::{screen_center, wrap_position};

pub struct GameScene {
    clock: TickClock,
    rng: Pcg32,
    player: Player,
    base_velocity: f32,
    /// Meteors spawned this level (splits included); the spawn gate and the
    /// level-complete check both read this.
    meteor_count: u32,
    meteors_for_level: u32,
    meteors: BTreeMap<EntityId, Meteor>,
    lasers: BTreeMap<EntityId, Laser>,
    next_entity_id: EntityId,
    space: SpatialGrid,
    score: u32,
    current_level: u32,
    meteor_spawn_timer: Timer,
    velocity_timer: Timer,
    clean_up_timer: Timer,
    beat_timer: Timer,
    beat_wait_ms: u64,
    play_beat_one: bool,
    stars: Vec<Star>,
    exhaust: Option<Exhaust>,
    shield: Option<Shield>,
}

impl GameScene {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = generate_stars(NUMBER_OF_STARS, &mut rng);
        let mut space = SpatialGrid::new();
        let mut player = Player::new(STARTING_LIVES);
        player.collider = Some(space.insert(
            Shape::Circle {
                center: player.position,
                radius: player.radius(),
            },
            ColliderKind::Player,
        ));

        // The first beat waits out a fixed delay; spawn, speed-up and
        // cleanup cadences fire on the first tick.
        let mut beat_timer = Timer::from_millis(FIRST_BEAT_DELAY_MS);
        beat_timer.reset(0);

        Self {
            clock: TickClock::new(),
            rng,
            player,
            base_velocity: BASE_METEOR_VELOCITY,
            meteor_count: 0,
            meteors_for_level: 2,
            meteors: BTreeMap::new(),
            lasers: BTreeMap::new(),
            next_entity_id: 1,
            space,
            score: 0,
            current_level: 1,
            meteor_spawn_timer: Timer::from_millis(METEOR_SPAWN_MS),
            velocity_timer: Timer::from_millis(METEOR_SPEED_UP_MS),
            clean_up_timer: Timer::from_millis(CLEAN_UP_EXPLOSION_MS),
            beat_timer,
            beat_wait_ms: BASE_BEAT_WAIT_MS,
            play_beat_one: true,
            stars,
            exhaust: None,
            shield: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn lives_remaining(&self) -> u32 {
        self.player.lives_remaining
    }

    pub fn live_meteors(&self) -> usize {
        self.meteors.len()
    }

    fn next_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Advance one logical tick.
    pub fn update(&mut self, ctx: &mut SceneContext) -> SceneAction {
        self.clock.advance();
        let now = self.clock.now_ms();

        self.update_player(ctx, now);
        self.update_exhaust_and_shield();
        self.player.advance_dying(now);
        if let Some(action) = self.resolve_player_death(ctx) {
            return action;
        }

        self.spawn_meteors(now);
        self.update_meteors();
        self.update_lasers();
        self.speed_up_meteors(now);

        self.player_vs_meteors(ctx, now);
        self.lasers_vs_meteors(ctx);

        self.clean_up_meteors(now);
        self.beat_sound(ctx, now);

        ctx.high_score.observe(self.score);

        self.check_level_complete()
    }

    fn update_player(&mut self, ctx: &mut SceneContext, now: u64) {
        // A dying player no longer answers the controls.
        if !self.player.is_alive() {
            self.exhaust = None;
            return;
        }
        let fx = self.player.update(ctx.input, now, &mut self.rng);

        if let Some(collider) = self.player.collider {
            self.space.set_position(collider, self.player.position);
        }

        if fx.thrusting {
            self.exhaust = Some(Exhaust::behind_player(
                self.player.position,
                self.player.rotation,
            ));
            if !ctx.audio.is_playing(Cue::Thrust) {
                ctx.audio.play(Cue::Thrust);
            }
        } else {
            self.exhaust = None;
        }
        if fx.thrust_released {
            ctx.audio.stop(Cue::Thrust);
        }

        if let Some((muzzle, rotation)) = fx.fired {
            let laser = Laser::new(muzzle, rotation);
            let (a, b) = laser.segment();
            let id = self.next_id();
            let mut laser = laser;
            laser.collider = Some(self.space.insert(Shape::Segment { a, b }, ColliderKind::Laser));
            self.lasers.insert(id, laser);
            ctx.audio.play(Cue::Laser);
        }

        if fx.shield_raised {
            ctx.audio.play(Cue::ShieldUp);
        }
    }

    fn update_exhaust_and_shield(&mut self) {
        if let Some(exhaust) = &mut self.exhaust {
            *exhaust = Exhaust::behind_player(self.player.position, self.player.rotation);
        }
        self.shield = if self.player.is_shielded {
            Some(Shield {
                position: self.player.position,
                rotation: self.player.rotation,
            })
        } else {
            None
        };
    }

    /// When the death animation has finished, spend a life: game over at
    /// zero (persisting a beaten high score), soft reset otherwise.
    fn resolve_player_death(&mut self, ctx: &mut SceneContext) -> Option<SceneAction> {
        if self.player.death_state != DeathState::Dead {
            return None;
        }
        self.player.lives_remaining -= 1;
        if self.player.lives_remaining == 0 {
            ctx.high_score.maybe_record(self.score);
            Some(SceneAction::ToGameOver)
        } else {
            self.soft_reset();
            None
        }
    }

    /// Discard all transient entities and recreate the player, preserving
    /// score, remaining lives, remaining shields, and the star field.
    fn soft_reset(&mut self) {
        let lives = self.player.lives_remaining;
        let shields = self.player.shields_remaining;

        self.space.clear();
        self.meteors.clear();
        self.lasers.clear();
        self.meteor_count = 0;
        self.base_velocity = BASE_METEOR_VELOCITY;
        self.exhaust = None;
        self.shield = None;

        let now = self.clock.now_ms();
        self.meteor_spawn_timer.reset(now);
        self.velocity_timer.reset(now);

        let mut player = Player::new(lives);
        player.shields_remaining = shields;
        player.collider = Some(self.space.insert(
            Shape::Circle {
                center: player.position,
                radius: player.radius(),
            },
            ColliderKind::Player,
        ));
        self.player = player;
    }

    /// Admit a new large meteor on the spawn cadence while both gates hold:
    /// live meteors below the level quota, and total spawned this level
    /// below the quota.
    fn spawn_meteors(&mut self, now: u64) {
        if self.meteor_spawn_timer.trigger_repeating(now)
            && (self.meteors.len() as u32) < self.meteors_for_level
            && self.meteor_count < self.meteors_for_level
        {
            let mut meteor = Meteor::new_large(self.base_velocity, &mut self.rng);
            meteor.collider = Some(self.space.insert(
                Shape::Circle {
                    center: meteor.position,
                    radius: meteor.radius(),
                },
                ColliderKind::Meteor(MeteorSize::Large),
            ));
            self.meteor_count += 1;
            let id = self.next_id();
            self.meteors.insert(id, meteor);
        }
    }

    fn update_meteors(&mut self) {
        for meteor in self.meteors.values_mut() {
            meteor.update();
            if let Some(collider) = meteor.collider {
                self.space.set_position(collider, meteor.position);
            }
        }
    }

    fn update_lasers(&mut self) {
        let ids: Vec<EntityId> = self.lasers.keys().copied().collect();
        for id in ids {
            let Some(laser) = self.lasers.get_mut(&id) else {
                continue;
            };
            laser.update();
            if laser.is_off_screen() {
                if let Some(collider) = laser.collider {
                    self.space.remove(collider);
                }
                self.lasers.remove(&id);
            } else {
                let (a, b) = laser.segment();
                if let Some(collider) = laser.collider {
                    self.space.set_segment(collider, a, b);
                }
            }
        }
    }

    /// Difficulty ramp: newly spawned meteors get faster over time.
    fn speed_up_meteors(&mut self, now: u64) {
        if self.velocity_timer.trigger_repeating(now) {
            self.base_velocity += METEOR_SPEED_UP_AMOUNT;
        }
    }

    /// Look up the meteor owning a collider returned by a grid query.
    fn meteor_by_collider(&self, handle: ColliderHandle) -> Option<EntityId> {
        self.meteors
            .iter()
            .find(|(_, m)| m.collider == Some(handle))
            .map(|(&id, _)| id)
    }

    /// Player-vs-meteor, resolved through the broad phase. Unshielded: the
    /// first intersecting meteor kills, and evaluation stops for the tick.
    /// Shielded: every intersecting meteor bounces radially outward from
    /// screen center at the current base velocity; the charge is not
    /// consumed by the bounce.
    fn player_vs_meteors(&mut self, ctx: &mut SceneContext, now: u64) {
        let Some(player_collider) = self.player.collider else {
            return;
        };
        for (handle, kind) in self.space.intersections(player_collider) {
            match kind {
                ColliderKind::Meteor(_) => {}
                ColliderKind::Player | ColliderKind::Laser => continue,
            }
            if !self.player.is_shielded {
                self.player.start_dying(now);
                ctx.audio.stop(Cue::Thrust);
                if !ctx.audio.is_playing(Cue::Explosion) {
                    ctx.audio.play(Cue::Explosion);
                }
                break;
            }
            let Some(id) = self.meteor_by_collider(handle) else {
                continue;
            };
            let Some(meteor) = self.meteors.get_mut(&id) else {
                continue;
            };
            let outward = (meteor.position - screen_center()).normalize_or_zero();
            meteor.movement = outward * self.base_velocity;
        }
    }

    /// Laser-vs-meteor, resolved through the broad phase. Each laser dies
    /// on the first meteor its query turns up: the meteor is marked
    /// exploding and scores +1. Two lasers reaching one meteor in the same
    /// tick both count. Large meteors split into up to three smalls, staged
    /// and merged after the sweep so the new meteors are invisible to this
    /// pass.
    fn lasers_vs_meteors(&mut self, ctx: &mut SceneContext) {
        let laser_ids: Vec<EntityId> = self.lasers.keys().copied().collect();
        let mut pending_smalls: Vec<Meteor> = Vec::new();

        for l_id in laser_ids {
            let Some(laser_collider) = self.lasers.get(&l_id).and_then(|l| l.collider) else {
                continue;
            };
            for (handle, kind) in self.space.intersections(laser_collider) {
                let size = match kind {
                    ColliderKind::Meteor(size) => size,
                    ColliderKind::Player | ColliderKind::Laser => continue,
                };
                let Some(m_id) = self.meteor_by_collider(handle) else {
                    continue;
                };

                self.score += 1;
                if !ctx.audio.is_playing(Cue::Explosion) {
                    ctx.audio.play(Cue::Explosion);
                }

                let Some(meteor) = self.meteors.get_mut(&m_id) else {
                    continue;
                };
                let parent_position = meteor.position;
                meteor.mark_exploding();

                if size == MeteorSize::Large {
                    // Splits bypass the spawn gate; bursts past the level
                    // cap are intended.
                    let num_to_spawn = self.rng.random_range(0..SMALLS_PER_LARGE_METEOR);
                    for _ in 0..num_to_spawn {
                        let small =
                            Meteor::new_small(BASE_METEOR_VELOCITY, parent_position, &mut self.rng);
                        pending_smalls.push(small);
                    }
                }

                if let Some(laser) = self.lasers.remove(&l_id) {
                    if let Some(collider) = laser.collider {
                        self.space.remove(collider);
                    }
                }
                break;
            }
        }

        for mut small in pending_smalls {
            small.position = wrap_position(small.position);
            small.collider = Some(self.space.insert(
                Shape::Circle {
                    center: small.position,
                    radius: small.radius(),
                },
                ColliderKind::Meteor(MeteorSize::Small),
            ));
            self.meteor_count += 1;
            let id = self.next_id();
            self.meteors.insert(id, small);
        }
    }

    /// Sweep exploded meteors out of the map and the index together.
    fn clean_up_meteors(&mut self, now: u64) {
        if !self.clean_up_timer.trigger_once(now) {
            return;
        }
        let exploded: Vec<EntityId> = self
            .meteors
            .iter()
            .filter(|(_, m)| m.is_exploding())
            .map(|(&id, _)| id)
            .collect();
        for id in exploded {
            if let Some(meteor) = self.meteors.remove(&id) {
                if let Some(collider) = meteor.collider {
                    self.space.remove(collider);
                }
            }
        }
        self.clean_up_timer.reset(now);
    }

    /// Two-beat background cadence whose interval shrinks 25 ms per beat
    /// down to a floor, modelling rising tension.
    fn beat_sound(&mut self, ctx: &mut SceneContext, now: u64) {
        if !self.beat_timer.trigger_once(now) {
            return;
        }
        let cue = if self.play_beat_one {
            Cue::BeatOne
        } else {
            Cue::BeatTwo
        };
        ctx.audio.play(cue);
        self.play_beat_one = !self.play_beat_one;

        if self.beat_wait_ms > MIN_BEAT_WAIT_MS {
            self.beat_wait_ms -= BEAT_SPEED_UP_MS;
        }
        self.beat_timer.rearm_with_duration(self.beat_wait_ms, now);
    }

    /// A level ends when the spawn quota has been used up and no meteor is
    /// left alive. Every fifth level grants a bonus life up to the cap.
    fn check_level_complete(&mut self) -> SceneAction {
        if self.meteor_count >= self.meteors_for_level && self.meteors.is_empty() {
            self.base_velocity = BASE_METEOR_VELOCITY;
            self.current_level += 1;

            if self.current_level % BONUS_LIFE_LEVEL_INTERVAL == 0
                && self.player.lives_remaining < MAX_LIVES
            {
                self.player.lives_remaining += 1;
            }

            self.beat_wait_ms = BASE_BEAT_WAIT_MS;
            SceneAction::ToLevelIntro
        } else {
            SceneAction::None
        }
    }

    /// Arm the next level after the intro pause: the quota grows with the
    /// level and the spawn counters restart.
    pub fn begin_next_level(&mut self) {
        let now = self.clock.now_ms();
        self.meteor_count = 0;
        self.meteors_for_level = self.current_level + 1;
        self.meteor_spawn_timer.reset(now);
        self.velocity_timer.reset(now);
        self.beat_timer.rearm_with_duration(self.beat_wait_ms, now);
    }

    pub fn snapshot(&self, high_score: u32) -> FrameSnapshot {
        let now = self.clock.now_ms();
        let sprite = match self.player.death_state {
            DeathState::Alive => PlayerSprite::Ship,
            DeathState::Dying(frame) => PlayerSprite::ExplosionFrame(frame),
            DeathState::Dead => PlayerSprite::ExplosionFrame(DYING_FRAMES - 1),
        };
        FrameSnapshot {
            mode: SceneMode::Playing,
            score: self.score,
            high_score: high_score.max(self.score),
            level: self.current_level,
            lives_remaining: self.player.lives_remaining,
            shields_remaining: self.player.shields_remaining,
            hyperspace_ready: self.player.hyperspace_ready(now),
            player: Some(PlayerView {
                position: self.player.position,
                rotation: self.player.rotation,
                sprite,
                is_shielded: self.player.is_shielded,
            }),
            meteors: self.meteors.values().map(meteor_view).collect(),
            lasers: self
                .lasers
                .values()
                .map(|l| LaserView {
                    position: l.position,
                    rotation: l.rotation,
                })
                .collect(),
            stars: self.stars.clone(),
            exhaust: self.exhaust.map(|e| PoseView {
                position: e.position,
                rotation: e.rotation,
            }),
            shield: self.shield.map(|s| PoseView {
                position: s.position,
                rotation: s.rotation,
            }),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Test hooks for the invariants the scene must uphold.
    #[cfg(test)]
    pub(crate) fn collider_count(&self) -> usize {
        self.space.len()
    }

    #[cfg(test)]
    pub(crate) fn force_meteor_at(&mut self, position: Vec2, size: MeteorSize) -> EntityId {
        let mut meteor = Meteor::new_large(self.base_velocity, &mut self.rng);
        meteor.size = size;
        meteor.position = position;
        meteor.movement = Vec2::ZERO;
        meteor.collider = Some(self.space.insert(
            Shape::Circle {
                center: position,
                radius: meteor.radius(),
            },
            ColliderKind::Meteor(size),
        ));
        self.meteor_count += 1;
        let id = self.next_id();
        self.meteors.insert(id, meteor);
        id
    }

    #[cfg(test)]
    pub(crate) fn meteor(&self, id: EntityId) -> Option<&Meteor> {
        self.meteors.get(&id)
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[cfg(test)]
    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub(crate) fn meteors_spawned(&self) -> u32 {
        self.meteor_count
    }
}

fn meteor_view(m: &Meteor) -> MeteorView {
    MeteorView {
        position: m.position,
        rotation: m.rotation,
        size: m.size,
        sprite_state: m.sprite_state,
        sprite_variant: m.sprite_variant,
    }
}
