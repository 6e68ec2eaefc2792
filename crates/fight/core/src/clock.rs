//! Simulation clock: time dilation and the match-wide pause.
//!
//! The dilation factor is accumulated once per outer tick; the integer part
//! of the running total is the number of inner updates to run. Fractional
//! updates never happen, so slow motion only changes how often the
//! simulation steps.

use tracing::warn;

use crate::state::EntityHandle;

/// Match-wide freeze (super-pause). Only `mover`, if any, keeps advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalPause {
    pub remaining: u32,
    pub mover: Option<EntityHandle>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Clock {
    speed: f64,
    accumulated: f64,
    inner_updates: u32,
    global_pause: Option<GlobalPause>,
}

impl Clock {
    /// Highest dilation factor; caps the inner updates a single tick can run.
    pub const MAX_SPEED: f64 = 8.0;

    pub fn new(speed: f64) -> Self {
        let mut clock = Self {
            speed: 1.0,
            accumulated: 0.0,
            inner_updates: 0,
            global_pause: None,
        };
        clock.set_speed(speed);
        clock
    }

    /// Sets the dilation factor. Negative or non-finite values stop time and
    /// values above [`Clock::MAX_SPEED`] are capped.
    pub fn set_speed(&mut self, factor: f64) {
        if !factor.is_finite() || factor < 0.0 {
            warn!(factor, "invalid speed factor, clamping to 0");
            self.speed = 0.0;
        } else if factor > Self::MAX_SPEED {
            warn!(factor, max = Self::MAX_SPEED, "speed factor too high, clamping");
            self.speed = Self::MAX_SPEED;
        } else {
            self.speed = factor;
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Fraction of an inner update carried over to the next outer tick.
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Inner updates granted to the current outer tick.
    pub fn inner_updates(&self) -> u32 {
        self.inner_updates
    }

    /// Starts an outer tick and returns how many inner updates it runs.
    pub fn begin_tick(&mut self) -> u32 {
        self.accumulated += self.speed;
        let whole = self.accumulated.floor();
        self.accumulated -= whole;
        self.inner_updates = whole as u32;
        self.inner_updates
    }

    /// Clears accumulated time and any pause, keeping the dilation factor.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.inner_updates = 0;
        self.global_pause = None;
    }

    pub fn pause_all(&mut self, duration: u32, mover: Option<EntityHandle>) {
        self.global_pause = (duration > 0).then_some(GlobalPause {
            remaining: duration,
            mover,
        });
    }

    pub fn resume_all(&mut self) {
        self.global_pause = None;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.global_pause.is_some()
    }

    pub fn global_pause(&self) -> Option<GlobalPause> {
        self.global_pause
    }

    /// Returns true if `entity` may advance during the current inner update.
    pub fn can_advance(&self, entity: EntityHandle) -> bool {
        match self.global_pause {
            None => true,
            Some(pause) => pause.mover == Some(entity),
        }
    }

    /// Counts down the global pause once per inner update.
    pub fn advance_pause(&mut self) {
        if let Some(pause) = self.global_pause.as_mut() {
            pause.remaining = pause.remaining.saturating_sub(1);
            if pause.remaining == 0 {
                self.global_pause = None;
            }
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_speed_runs_one_update_per_tick() {
        let mut clock = Clock::new(1.0);
        for _ in 0..5 {
            assert_eq!(clock.begin_tick(), 1);
        }
    }

    #[test]
    fn half_speed_alternates() {
        let mut clock = Clock::new(0.5);
        let updates: Vec<u32> = (0..6).map(|_| clock.begin_tick()).collect();
        assert_eq!(updates, vec![0, 1, 0, 1, 0, 1]);
        assert_eq!(clock.accumulated(), 0.0);
    }

    #[test]
    fn double_speed_runs_two_updates() {
        let mut clock = Clock::new(2.0);
        assert_eq!(clock.begin_tick(), 2);
    }

    #[test]
    fn negative_speed_stops_time() {
        let mut clock = Clock::new(-1.0);
        assert_eq!(clock.speed(), 0.0);
        assert_eq!(clock.begin_tick(), 0);
    }

    #[test]
    fn huge_speed_is_capped() {
        let mut clock = Clock::new(1e12);
        assert_eq!(clock.speed(), Clock::MAX_SPEED);
        assert_eq!(clock.begin_tick(), 8);
    }

    #[test]
    fn global_pause_counts_down() {
        let mut clock = Clock::default();
        clock.pause_all(2, None);
        assert!(clock.is_paused());
        clock.advance_pause();
        assert!(clock.is_paused());
        clock.advance_pause();
        assert!(!clock.is_paused());
    }
}
