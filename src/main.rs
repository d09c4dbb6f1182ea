//! Meteor Storm entry point
//!
//! The simulation core has no renderer of its own, so the native binary
//! runs a short scripted session headless: start a game from the title,
//! hold fire and thrust for a while, and report what happened. A real
//! driver would embed [`meteor_storm::App`] behind a window instead.

use std::time::{SystemTime, UNIX_EPOCH};

use meteor_storm::audio::NullAudio;
use meteor_storm::consts::TICKS_PER_SECOND;
use meteor_storm::highscore::HighScoreStore;
use meteor_storm::{App, InputState, UpdateOutcome};

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });

    let high_score = HighScoreStore::load("high-score.json");
    let mut app = App::new(seed, Box::new(NullAudio), high_score);

    // Press start on the title screen
    app.update(&InputState {
        start: true,
        ..InputState::default()
    });

    // Thirty simulated seconds of spinning and shooting
    let script = InputState {
        thrust: true,
        turn_right: true,
        fire: true,
        ..InputState::default()
    };
    for _ in 0..30 * TICKS_PER_SECOND {
        if app.update(&script) == UpdateOutcome::Terminate {
            break;
        }
    }

    let frame = app.draw();
    println!(
        "seed {seed}: finished in {:?} at level {} with score {} (high score {})",
        frame.mode, frame.level, frame.score, frame.high_score
    );
}
