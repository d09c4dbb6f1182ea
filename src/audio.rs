//! Audio cue signalling
//!
//! The core never decodes or mixes sound. It signals discrete cues to an
//! external player through `AudioOutput`, guarding each play with a
//! "don't restart a cue that's already playing" check at the call site.

/// Discrete sound cues the simulation can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Engine rumble while thrusting (looping; explicitly stopped)
    Thrust,
    /// Laser shot
    Laser,
    /// Meteor or player explosion
    Explosion,
    /// Shield raised
    ShieldUp,
    /// Background beat, first of the two-beat cadence
    BeatOne,
    /// Background beat, second of the two-beat cadence
    BeatTwo,
}

/// External audio player contract.
pub trait AudioOutput {
    /// Rewind and play a cue.
    fn play(&mut self, cue: Cue);
    /// Stop a cue (used for the looping thrust rumble).
    fn stop(&mut self, cue: Cue);
    /// Whether a cue is still audible. Call sites use this to avoid
    /// restarting a playing cue every tick.
    fn is_playing(&self, cue: Cue) -> bool;
}

/// Output that swallows every cue. Used headless and as a default.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioOutput for NullAudio {
    fn play(&mut self, _cue: Cue) {}
    fn stop(&mut self, _cue: Cue) {}
    fn is_playing(&self, _cue: Cue) -> bool {
        false
    }
}

/// Test double that records every play/stop and lets tests mark cues as
/// still playing.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<Cue>,
    pub stopped: Vec<Cue>,
    pub playing: Vec<Cue>,
}

impl AudioOutput for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue);
    }

    fn stop(&mut self, cue: Cue) {
        self.stopped.push(cue);
    }

    fn is_playing(&self, cue: Cue) -> bool {
        self.playing.contains(&cue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_audio_tracks_plays() {
        let mut audio = RecordingAudio::default();
        audio.play(Cue::Laser);
        audio.play(Cue::Explosion);
        audio.stop(Cue::Thrust);
        assert_eq!(audio.played, vec![Cue::Laser, Cue::Explosion]);
        assert_eq!(audio.stopped, vec![Cue::Thrust]);
        assert!(!audio.is_playing(Cue::Laser));
        audio.playing.push(Cue::Explosion);
        assert!(audio.is_playing(Cue::Explosion));
    }
}
