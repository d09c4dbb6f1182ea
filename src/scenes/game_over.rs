//! Game over: final score and level over the star field, with a few
//! decorative meteors drifting behind the text.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::scenes::{GameScene, SceneAction, SceneContext};
use crate::sim::{Meteor, Star, TickClock, Timer};
use crate::snapshot::{FrameSnapshot, MeteorView, SceneMode};

pub struct GameOverScene {
    clock: TickClock,
    rng: Pcg32,
    final_score: u32,
    final_level: u32,
    stars: Vec<Star>,
    meteors: Vec<Meteor>,
    spawn_timer: Timer,
}

impl GameOverScene {
    /// Built from the game that just ended; keeps its star field so the
    /// backdrop does not visibly change at the moment of death.
    pub fn from_game(game: &GameScene, seed: u64) -> Self {
        Self {
            clock: TickClock::new(),
            rng: Pcg32::seed_from_u64(seed),
            final_score: game.score(),
            final_level: game.current_level(),
            stars: game.stars().to_vec(),
            meteors: Vec::new(),
            spawn_timer: Timer::from_millis(METEOR_SPAWN_MS),
        }
    }

    pub fn update(&mut self, ctx: &mut SceneContext) -> SceneAction {
        self.clock.advance();
        let now = self.clock.now_ms();

        if self.spawn_timer.trigger_repeating(now) && self.meteors.len() < GAME_OVER_METEOR_COUNT {
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
        let mut snapshot = FrameSnapshot::empty(SceneMode::GameOver);
        snapshot.score = self.final_score;
        snapshot.high_score = high_score;
        snapshot.level = self.final_level;
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
