//! Read-only frame snapshots for an external renderer
//!
//! The core performs no drawing. Once per frame the driver asks for a
//! snapshot of everything visible; the renderer turns it into pixels.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{MeteorSize, SpriteState, Star};

/// Which scene produced the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SceneMode {
    Title,
    Playing,
    LevelIntro,
    GameOver,
}

/// Player sprite to show: the ship, or one of the explosion frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayerSprite {
    Ship,
    ExplosionFrame(u32),
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub position: Vec2,
    pub rotation: f32,
    pub sprite: PlayerSprite,
    pub is_shielded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeteorView {
    pub position: Vec2,
    pub rotation: f32,
    pub size: MeteorSize,
    pub sprite_state: SpriteState,
    pub sprite_variant: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaserView {
    pub position: Vec2,
    pub rotation: f32,
}

/// Position + rotation for the exhaust and shield overlays.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PoseView {
    pub position: Vec2,
    pub rotation: f32,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub mode: SceneMode,
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub lives_remaining: u32,
    pub shields_remaining: u32,
    pub hyperspace_ready: bool,
    pub player: Option<PlayerView>,
    pub meteors: Vec<MeteorView>,
    pub lasers: Vec<LaserView>,
    pub stars: Vec<Star>,
    pub exhaust: Option<PoseView>,
    pub shield: Option<PoseView>,
}

impl FrameSnapshot {
    /// An empty snapshot for a scene mode; scenes fill in what they show.
    pub fn empty(mode: SceneMode) -> Self {
        Self {
            mode,
            score: 0,
            high_score: 0,
            level: 1,
            lives_remaining: 0,
            shields_remaining: 0,
            hyperspace_ready: false,
            player: None,
            meteors: Vec::new(),
            lasers: Vec::new(),
            stars: Vec::new(),
            exhaust: None,
            shield: None,
        }
    }
}
