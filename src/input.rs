//! Logical input state for one tick
//!
//! The core only consumes boolean "held" and "just-pressed" action states;
//! polling a real input device is the driver's job.

/// Input for a single tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Held: rotate counter-clockwise
    pub turn_left: bool,
    /// Held: rotate clockwise
    pub turn_right: bool,
    /// Held: forward thrust
    pub thrust: bool,
    /// Just released this tick (stops the thrust cue)
    pub thrust_released: bool,
    /// Held: fire lasers
    pub fire: bool,
    /// Just pressed: start / restart
    pub start: bool,
    /// Just pressed: raise the shield
    pub shield: bool,
    /// Just pressed: hyperspace jump
    pub hyperspace: bool,
    /// Just pressed: quit the game
    pub quit: bool,
}
