//! Countdown timers on the scene clock
//!
//! Every time-gated behavior in the game (spawn cadence, cooldowns, death
//! animation, beat tempo) runs off one of these. Timers are plain values,
//! owned by exactly one entity, and measure scene time in milliseconds.

use crate::consts::TICKS_PER_SECOND;

/// Convert a tick count into scene milliseconds.
#[inline]
pub fn ticks_to_millis(ticks: u64) -> u64 {
    ticks * 1000 / TICKS_PER_SECOND
}

/// A countdown timer.
///
/// A freshly constructed timer has no scheduled expiry and reports ready,
/// so the first check of a cadence fires immediately (meteors spawn on the
/// first tick of a scene). `reset` schedules the next expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    duration_ms: u64,
    target_ms: Option<u64>,
}

impl Timer {
    pub fn from_millis(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            target_ms: None,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Schedule the next expiry at `now_ms + duration`.
    pub fn reset(&mut self, now_ms: u64) {
        self.target_ms = Some(now_ms + self.duration_ms);
    }

    /// True once the scheduled expiry has passed, and before the first reset.
    pub fn is_ready(&self, now_ms: u64) -> bool {
        match self.target_ms {
            None => true,
            Some(target) => now_ms >= target,
        }
    }

    /// Repeating trigger: fires and re-arms in the same call.
    ///
    /// Returns true at most once per elapsed duration.
    pub fn trigger_repeating(&mut self, now_ms: u64) -> bool {
        if self.is_ready(now_ms) {
            self.reset(now_ms);
            true
        } else {
            false
        }
    }

    /// One-shot trigger: fires without re-arming.
    ///
    /// A fired timer stays ready and keeps returning true every call until
    /// something resets it; callers that want the repeat-until-reset idiom
    /// (continuous states like an expired cooldown gate) rely on this.
    pub fn trigger_once(&self, now_ms: u64) -> bool {
        self.is_ready(now_ms)
    }

    /// Replace the countdown duration and re-arm from `now_ms`.
    pub fn rearm_with_duration(&mut self, duration_ms: u64, now_ms: u64) {
        self.duration_ms = duration_ms;
        self.reset(now_ms);
    }
}

/// The scene clock: counts logical ticks, exposes milliseconds.
///
/// The core never reads wall time; the driver advances this once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickClock {
    ticks: u64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn now_ms(&self) -> u64 {
        ticks_to_millis(self.ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_timer_is_ready_before_first_reset() {
        let t = Timer::from_millis(100);
        assert!(t.is_ready(0));
        assert!(t.is_ready(1));
    }

    #[test]
    fn reset_then_ready_only_after_duration() {
        let mut t = Timer::from_millis(100);
        t.reset(0);
        assert!(!t.is_ready(0));
        assert!(!t.is_ready(99));
        assert!(t.is_ready(100));
        assert!(t.is_ready(250));
    }

    #[test]
    fn trigger_repeating_rearms() {
        let mut t = Timer::from_millis(100);
        assert!(t.trigger_repeating(0));
        assert!(!t.trigger_repeating(50));
        assert!(t.trigger_repeating(100));
        assert!(!t.trigger_repeating(150));
    }

    #[test]
    fn trigger_once_keeps_firing_until_reset() {
        let mut t = Timer::from_millis(100);
        t.reset(0);
        assert!(!t.trigger_once(50));
        assert!(t.trigger_once(100));
        assert!(t.trigger_once(101));
        t.reset(101);
        assert!(!t.trigger_once(150));
    }

    #[test]
    fn rearm_with_duration_changes_interval() {
        let mut t = Timer::from_millis(1600);
        t.rearm_with_duration(400, 1000);
        assert_eq!(t.duration_ms(), 400);
        assert!(!t.is_ready(1399));
        assert!(t.is_ready(1400));
    }

    #[test]
    fn clock_converts_exact_tick_boundaries() {
        let mut c = TickClock::new();
        for _ in 0..6 {
            c.advance();
        }
        assert_eq!(c.now_ms(), 100);
        for _ in 0..3 {
            c.advance();
        }
        assert_eq!(c.now_ms(), 150);
    }

    proptest! {
        #[test]
        fn ready_stays_ready_until_next_reset(
            duration in 1u64..5000,
            start in 0u64..100_000,
            extra in 0u64..100_000,
        ) {
            let mut t = Timer::from_millis(duration);
            t.reset(start);
            prop_assert!(t.is_ready(start + duration));
            prop_assert!(t.is_ready(start + duration + extra));
        }
    }
}
