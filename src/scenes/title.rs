//! Title scene: star field and drifting meteors behind the menu text.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::scenes::{SceneAction, SceneContext};
use crate::sim::{Meteor, Star, TickClock, Timer, entity::generate_stars};
use crate::snapshot::{FrameSnapshot, MeteorView, SceneMode};

pub struct TitleScene {
    clock: TickClock,
    rng: Pcg32,
    stars: Vec<Star>,
    meteors: Vec<Meteor>,
    spawn_timer: Timer,
}

impl TitleScene {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = generate_stars(NUMBER_OF_STARS, &mut rng);
        Self {
            clock: TickClock::new(),
            rng,
            stars,
            meteors: Vec::new(),
            spawn_timer: Timer::from_millis(METEOR_SPAWN_MS),
        }
    }

    pub fn update(&mut self, ctx: &mut SceneContext) -> SceneAction {
        self.clock.advance();
        let now = self.clock.now_ms();

        // Decorative meteors only; nothing here carries a collider.
        if self.spawn_timer.trigger_repeating(now) && self.meteors.len() < TITLE_METEOR_COUNT {
            self.meteors
                .push(Meteor::new_large(BASE_METEOR_VELOCITY, &mut self.rng));
        }
        for meteor in &mut self.meteors {
            meteor.update();
        }

        if ctx.input.start {
            SceneAction::StartGame
        } else {
            SceneAction::None
        }
    }

    pub fn snapshot(&self, high_score: u32) -> FrameSnapshot {
        let mut snapshot = FrameSnapshot::empty(SceneMode::Title);
        snapshot.high_score = high_score;
        snapshot.stars = self.stars.clone();
        snapshot.meteors = self
            .meteors
            .iter()
            .map(|m| MeteorView {
                position: m.position,
                rotation: m.rotation,
                size: m.size,
                sprite_state: m.sprite_state,
                sprite_variant: m.sprite_variant,
            })
            .collect();
        snapshot
    }
}
