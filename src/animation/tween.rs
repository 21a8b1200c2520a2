//! Time-driven interpolation of a single value
//!
//! A [`Tween`] is a pure function of time: it records where it starts on the
//! shared clock and answers "what is the value now?" for any timestamp. Nothing
//! is stepped incrementally, so sampling the same time twice always yields the
//! same value and tests can jump straight to any point of an animation.

use super::ease::Ease;

/// How many extra cycles a tween plays after the first one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Never,
    Times(u32),
    Forever,
}

/// Interpolation from one value to another over a fixed duration
///
/// Supports a start delay, repeats and yo-yo playback (every odd cycle runs
/// backwards, easing included).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    start: f32,
    duration: f32,
    delay: f32,
    ease: Ease,
    repeat: Repeat,
    yoyo: bool,
}

impl Tween {
    /// Creates a tween starting at clock time 0 with the default ease
    ///
    /// # Arguments
    /// * `from` - Value before the tween starts
    /// * `to` - Value at the end of the first cycle
    /// * `duration` - Length of one cycle in seconds
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            start: 0.0,
            duration: duration.max(0.0),
            delay: 0.0,
            ease: Ease::default(),
            repeat: Repeat::Never,
            yoyo: false,
        }
    }

    /// Anchors the tween on the clock (builder pattern)
    pub fn starting_at(mut self, start: f32) -> Self {
        self.start = start;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    fn total_cycles(&self) -> Option<u32> {
        match self.repeat {
            Repeat::Never => Some(1),
            Repeat::Times(extra) => Some(extra.saturating_add(1)),
            Repeat::Forever => None,
        }
    }

    /// Clock time at which the tween settles, `None` for endless tweens
    pub fn end_time(&self) -> Option<f32> {
        self.total_cycles()
            .map(|cycles| self.start + self.delay + self.duration * cycles as f32)
    }

    /// Returns true once the last cycle has played out
    pub fn is_complete(&self, now: f32) -> bool {
        self.end_time().is_some_and(|end| now >= end)
    }

    /// Eased progress in `[0, 1]` at clock time `now`
    pub fn progress(&self, now: f32) -> f32 {
        let local = now - self.start - self.delay;
        if local <= 0.0 {
            return 0.0;
        }

        let final_progress = |cycles: u32| {
            let last_cycle_reversed = self.yoyo && (cycles - 1) % 2 == 1;
            if last_cycle_reversed {
                0.0
            } else {
                1.0
            }
        };

        if self.duration <= f32::EPSILON {
            return final_progress(self.total_cycles().unwrap_or(1));
        }

        let cycle = (local / self.duration).floor();
        if let Some(cycles) = self.total_cycles() {
            if cycle >= cycles as f32 {
                return final_progress(cycles);
            }
        }

        let linear = (local - cycle * self.duration) / self.duration;
        let reversed = self.yoyo && (cycle as u64) % 2 == 1;
        if reversed {
            self.ease.apply(1.0 - linear)
        } else {
            self.ease.apply(linear)
        }
    }

    /// Interpolated value at clock time `now`
    pub fn value_at(&self, now: f32) -> f32 {
        self.from + (self.to - self.from) * self.progress(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn holds_start_value_until_delay_elapses() {
        let tween = Tween::new(1.0, 3.0, 2.0).starting_at(10.0).with_delay(1.0);
        assert_eq!(tween.value_at(0.0), 1.0);
        assert_eq!(tween.value_at(11.0), 1.0);
        assert!(tween.value_at(11.5) > 1.0);
    }

    #[test]
    fn linear_tween_reaches_target_and_completes() {
        let tween = Tween::new(0.0, 10.0, 2.0).with_ease(Ease::Linear);
        assert_relative_eq!(tween.value_at(1.0), 5.0);
        assert_relative_eq!(tween.value_at(2.0), 10.0);
        assert_relative_eq!(tween.value_at(50.0), 10.0);
        assert!(!tween.is_complete(1.99));
        assert!(tween.is_complete(2.0));
    }

    #[test]
    fn single_yoyo_repeat_returns_to_start() {
        let squash = Tween::new(1.5, 0.7, 0.6)
            .with_ease(Ease::Power1InOut)
            .with_yoyo(true)
            .with_repeat(Repeat::Times(1));

        assert_relative_eq!(squash.value_at(0.6), 0.7, epsilon = 1e-5);
        assert_relative_eq!(squash.value_at(0.9), 1.1, epsilon = 1e-5);
        assert_relative_eq!(squash.value_at(1.2), 1.5, epsilon = 1e-5);
        assert_eq!(squash.end_time(), Some(1.2));
        assert_relative_eq!(squash.value_at(5.0), 1.5);
    }

    #[test]
    fn endless_yoyo_oscillates_between_bounds() {
        let bob = Tween::new(2.0, 2.5, 3.0)
            .with_ease(Ease::SineInOut)
            .with_yoyo(true)
            .with_repeat(Repeat::Forever);

        assert!(bob.end_time().is_none());
        assert!(!bob.is_complete(1.0e6));
        assert_relative_eq!(bob.value_at(3.0), 2.5, epsilon = 1e-4);
        assert_relative_eq!(bob.value_at(6.0), 2.0, epsilon = 1e-4);
        for step in 0..200 {
            let value = bob.value_at(step as f32 * 0.37);
            assert!((2.0..=2.5).contains(&value));
        }
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let tween = Tween::new(4.0, 0.0, 0.0).starting_at(1.0);
        assert_eq!(tween.value_at(0.5), 4.0);
        assert_eq!(tween.value_at(1.01), 0.0);
    }
}
