//! Scene state machine
//!
//! Four scenes: title, playing, level intro, game over. Each scene's
//! `update` returns a [`SceneAction`] and the [`SceneManager`] performs the
//! transition. The playing scene is moved by value through the level intro
//! and back, so a level pause never loses game state.

pub mod game;
pub mod game_over;
pub mod level_start;
pub mod title;

pub use game::GameScene;
pub use game_over::GameOverScene;
pub use level_start::LevelIntroScene;
pub use title::TitleScene;

use crate::audio::AudioOutput;
use crate::highscore::HighScoreStore;
use crate::input::InputState;
use crate::snapshot::FrameSnapshot;

/// What a scene needs from the outside world for one tick.
pub struct SceneContext<'a> {
    pub input: &'a InputState,
    pub audio: &'a mut dyn AudioOutput,
    pub high_score: &'a mut HighScoreStore,
}

/// Transition requested by a scene at the end of its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneAction {
    None,
    /// Title or game over: begin a fresh game.
    StartGame,
    /// Playing: the level was cleared, pause before the next one.
    ToLevelIntro,
    /// Level intro: the pause is over, resume the carried game.
    ResumeGame,
    /// Playing: the last life was spent.
    ToGameOver,
}

enum ActiveScene {
    Title(TitleScene),
    Playing(GameScene),
    LevelIntro(LevelIntroScene),
    GameOver(GameOverScene),
    /// Transient placeholder while a transition moves the previous scene
    /// out; never observable between `update` calls.
    Swapping,
}

pub struct SceneManager {
    active: ActiveScene,
    master_seed: u64,
    games_started: u64,
}

impl SceneManager {
    pub fn new(master_seed: u64) -> Self {
        Self {
            active: ActiveScene::Title(TitleScene::new(master_seed)),
            master_seed,
            games_started: 0,
        }
    }

    /// Per-game seed stream: distinct seeds for successive games, stable
    /// for a fixed master seed.
    fn next_game_seed(&mut self) -> u64 {
        self.games_started += 1;
        self.master_seed ^ self.games_started.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Advance the active scene one tick and apply any transition.
    pub fn update(&mut self, ctx: &mut SceneContext) {
        let action = match &mut self.active {
            ActiveScene::Title(scene) => scene.update(ctx),
            ActiveScene::Playing(scene) => scene.update(ctx),
            ActiveScene::LevelIntro(scene) => scene.update(ctx),
            ActiveScene::GameOver(scene) => scene.update(ctx),
            ActiveScene::Swapping => SceneAction::None,
        };
        self.apply(action);
    }

    fn apply(&mut self, action: SceneAction) {
        if action == SceneAction::None {
            return;
        }
        let prev = std::mem::replace(&mut self.active, ActiveScene::Swapping);
        self.active = match (action, prev) {
            (SceneAction::StartGame, _) => {
                let seed = self.next_game_seed();
                log::info!("starting new game (seed {seed})");
                ActiveScene::Playing(GameScene::new(seed))
            }
            (SceneAction::ToLevelIntro, ActiveScene::Playing(game)) => {
                log::debug!("level {} cleared", game.current_level() - 1);
                ActiveScene::LevelIntro(LevelIntroScene::new(game))
            }
            (SceneAction::ResumeGame, ActiveScene::LevelIntro(intro)) => {
                ActiveScene::Playing(intro.into_game())
            }
            (SceneAction::ToGameOver, ActiveScene::Playing(game)) => {
                log::info!(
                    "game over at level {} with score {}",
                    game.current_level(),
                    game.score()
                );
                let seed = self.next_game_seed();
                ActiveScene::GameOver(GameOverScene::from_game(&game, seed))
            }
            (_, prev) => prev,
        };
    }

    pub fn snapshot(&self, high_score: u32) -> FrameSnapshot {
        match &self.active {
            ActiveScene::Title(scene) => scene.snapshot(high_score),
            ActiveScene::Playing(scene) => scene.snapshot(high_score),
            ActiveScene::LevelIntro(scene) => scene.snapshot(high_score),
            ActiveScene::GameOver(scene) => scene.snapshot(high_score),
            ActiveScene::Swapping => unreachable!("no scene active outside update"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::snapshot::SceneMode;

    fn tick(manager: &mut SceneManager, input: InputState) -> SceneMode {
        let mut audio = RecordingAudio::default();
        let mut store = HighScoreStore::in_memory(0);
        let mut ctx = SceneContext {
            input: &input,
            audio: &mut audio,
            high_score: &mut store,
        };
        manager.update(&mut ctx);
        manager.snapshot(store.best()).mode
    }

    #[test]
    fn starts_on_title() {
        let manager = SceneManager::new(1);
        assert_eq!(manager.snapshot(0).mode, SceneMode::Title);
    }

    #[test]
    fn start_moves_title_to_playing() {
        let mut manager = SceneManager::new(1);
        let mode = tick(
            &mut manager,
            InputState {
                start: true,
                ..InputState::default()
            },
        );
        assert_eq!(mode, SceneMode::Playing);
    }

    #[test]
    fn title_ignores_other_input() {
        let mut manager = SceneManager::new(1);
        let mode = tick(
            &mut manager,
            InputState {
                fire: true,
                thrust: true,
                ..InputState::default()
            },
        );
        assert_eq!(mode, SceneMode::Title);
    }

    #[test]
    fn successive_games_get_distinct_seeds() {
        let mut manager = SceneManager::new(9);
        let a = manager.next_game_seed();
        let b = manager.next_game_seed();
        assert_ne!(a, b);
    }
}
