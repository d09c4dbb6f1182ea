//! Level intro: a short banner pause between levels.
//!
//! Carries the playing scene by value so score, lives, shields, and the
//! star field survive the pause untouched. The carried game does not tick
//! while the banner is up.

use crate::consts::NEXT_LEVEL_DELAY_MS;
use crate::scenes::{GameScene, SceneAction, SceneContext};
use crate::sim::{TickClock, Timer};
use crate::snapshot::{FrameSnapshot, SceneMode};

pub struct LevelIntroScene {
    game: GameScene,
    clock: TickClock,
    delay: Timer,
}

impl LevelIntroScene {
    pub fn new(game: GameScene) -> Self {
        let mut delay = Timer::from_millis(NEXT_LEVEL_DELAY_MS);
        delay.reset(0);
        Self {
            game,
            clock: TickClock::new(),
            delay,
        }
    }

    pub fn update(&mut self, _ctx: &mut SceneContext) -> SceneAction {
        self.clock.advance();
        if self.delay.is_ready(self.clock.now_ms()) {
            SceneAction::ResumeGame
        } else {
            SceneAction::None
        }
    }

    /// Hand the game back, armed for the next level.
    pub fn into_game(mut self) -> GameScene {
        self.game.begin_next_level();
        self.game
    }

    pub fn snapshot(&self, high_score: u32) -> FrameSnapshot {
        let mut snapshot = self.game.snapshot(high_score);
        snapshot.mode = SceneMode::LevelIntro;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::consts::TICKS_PER_SECOND;
    use crate::highscore::HighScoreStore;
    use crate::input::InputState;

    fn tick(scene: &mut LevelIntroScene) -> SceneAction {
        let input = InputState::default();
        let mut audio = RecordingAudio::default();
        let mut store = HighScoreStore::in_memory(0);
        let mut ctx = SceneContext {
            input: &input,
            audio: &mut audio,
            high_score: &mut store,
        };
        scene.update(&mut ctx)
    }

    #[test]
    fn waits_the_full_delay_then_resumes() {
        let mut scene = LevelIntroScene::new(GameScene::new(1));
        let delay_ticks = NEXT_LEVEL_DELAY_MS * TICKS_PER_SECOND / 1000;
        for _ in 0..delay_ticks - 1 {
            assert_eq!(tick(&mut scene), SceneAction::None);
        }
        assert_eq!(tick(&mut scene), SceneAction::ResumeGame);
    }

    #[test]
    fn snapshot_shows_the_intro_banner_over_the_game() {
        let scene = LevelIntroScene::new(GameScene::new(1));
        let snap = scene.snapshot(0);
        assert_eq!(snap.mode, SceneMode::LevelIntro);
        assert!(snap.player.is_some());
    }

    #[test]
    fn into_game_arms_the_next_level() {
        let mut game = GameScene::new(1);
        game.begin_next_level();
        let level = game.current_level();
        let scene = LevelIntroScene::new(game);
        let game = scene.into_game();
        assert_eq!(game.current_level(), level);
        assert_eq!(game.live_meteors(), 0);
    }
}
