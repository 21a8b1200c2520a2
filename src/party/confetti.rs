//! Confetti particle cloud
//!
//! A fixed cloud of 200 coloured points hanging invisible above the table. A
//! trigger fades it in, drops every particle by the same distance, fades it out
//! and puts every particle back where it was.

use cgmath::Vector3;
use rand::Rng;

use crate::animation::{Ease, Tween};

use super::rgb;

pub const CONFETTI_COUNT: usize = 200;
pub const CONFETTI_PALETTE: [u32; 5] = [0xff4b5c, 0xffd700, 0x25ccf7, 0x9b59b6, 0x2ecc71];
/// Edge length of one particle quad in world units
pub const CONFETTI_SIZE: f32 = 0.1;

pub const FADE_IN_SECONDS: f32 = 0.5;
pub const FALL_SECONDS: f32 = 3.0;
pub const FALL_DISTANCE: f32 = 3.0;
pub const FADE_OUT_SECONDS: f32 = 1.0;

/// Phases of one burst, laid end to end from the trigger time
#[derive(Debug, Clone)]
struct Burst {
    rest_y: Vec<f32>,
    fade_in: Tween,
    fall: Tween,
    fade_out: Tween,
}

impl Burst {
    fn new(rest_y: Vec<f32>, now: f32) -> Self {
        let fade_in = Tween::new(0.0, 1.0, FADE_IN_SECONDS)
            .with_ease(Ease::Power2In)
            .starting_at(now);
        let fall = Tween::new(0.0, -FALL_DISTANCE, FALL_SECONDS)
            .with_ease(Ease::Power3Out)
            .starting_at(now + FADE_IN_SECONDS);
        let fade_out = Tween::new(1.0, 0.0, FADE_OUT_SECONDS)
            .starting_at(now + FADE_IN_SECONDS + FALL_SECONDS);

        Self {
            rest_y,
            fade_in,
            fall,
            fade_out,
        }
    }

    fn end_time(&self) -> f32 {
        self.fade_out.end_time().unwrap_or(f32::INFINITY)
    }

    fn opacity(&self, now: f32) -> f32 {
        if !self.fall.is_complete(now) {
            self.fade_in.value_at(now)
        } else {
            self.fade_out.value_at(now)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfettiCloud {
    positions: Vec<Vector3<f32>>,
    colors: Vec<[f32; 3]>,
    opacity: f32,
    burst: Option<Burst>,
}

impl ConfettiCloud {
    /// Scatters the particles over the volume above the table
    pub fn scatter<R: Rng>(rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(CONFETTI_COUNT);
        let mut colors = Vec::with_capacity(CONFETTI_COUNT);

        for _ in 0..CONFETTI_COUNT {
            positions.push(Vector3::new(
                rng.random_range(-5.0..5.0),
                rng.random_range(2.0..7.0),
                rng.random_range(-5.0..5.0),
            ));
            let pick = rng.random_range(0..CONFETTI_PALETTE.len());
            colors.push(rgb(CONFETTI_PALETTE[pick]));
        }

        Self {
            positions,
            colors,
            opacity: 0.0,
            burst: None,
        }
    }

    pub fn positions(&self) -> &[Vector3<f32>] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_bursting(&self) -> bool {
        self.burst.is_some()
    }

    /// Starts a burst at clock time `now`
    ///
    /// Returns false, leaving the running burst untouched, if one is already
    /// in flight.
    pub fn trigger(&mut self, now: f32) -> bool {
        if self.burst.is_some() {
            log::debug!("Confetti already falling, trigger at {now:.2}s ignored");
            return false;
        }

        let rest_y = self.positions.iter().map(|p| p.y).collect();
        self.burst = Some(Burst::new(rest_y, now));
        log::debug!("Confetti burst started at {now:.2}s");
        true
    }

    /// Applies the running burst, if any, at clock time `now`
    pub fn update(&mut self, now: f32) {
        let Some(burst) = &self.burst else {
            return;
        };

        if now >= burst.end_time() {
            for (position, &rest) in self.positions.iter_mut().zip(&burst.rest_y) {
                position.y = rest;
            }
            self.opacity = 0.0;
            self.burst = None;
            log::debug!("Confetti burst finished");
            return;
        }

        let offset = burst.fall.value_at(now);
        for (position, &rest) in self.positions.iter_mut().zip(&burst.rest_y) {
            position.y = rest + offset;
        }
        self.opacity = burst.opacity(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cloud() -> ConfettiCloud {
        ConfettiCloud::scatter(&mut StdRng::seed_from_u64(2024))
    }

    #[test]
    fn cloud_has_exact_count_and_palette_colors() {
        let cloud = cloud();
        assert_eq!(cloud.positions().len(), CONFETTI_COUNT);
        assert_eq!(cloud.colors().len(), CONFETTI_COUNT);

        let palette: Vec<[f32; 3]> = CONFETTI_PALETTE.iter().map(|&hex| rgb(hex)).collect();
        assert!(cloud.colors().iter().all(|c| palette.contains(c)));
        assert_eq!(cloud.opacity(), 0.0);

        for p in cloud.positions() {
            assert!((-5.0..5.0).contains(&p.x));
            assert!((2.0..7.0).contains(&p.y));
            assert!((-5.0..5.0).contains(&p.z));
        }
    }

    #[test]
    fn burst_restores_every_particle_height() {
        let mut cloud = cloud();
        let before: Vec<f32> = cloud.positions().iter().map(|p| p.y).collect();

        assert!(cloud.trigger(10.0));
        let mut t = 10.0;
        while t < 16.0 {
            cloud.update(t);
            t += 1.0 / 60.0;
        }
        cloud.update(16.0);

        assert!(!cloud.is_bursting());
        assert_eq!(cloud.opacity(), 0.0);
        let after: Vec<f32> = cloud.positions().iter().map(|p| p.y).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn phases_run_one_after_another() {
        let mut cloud = cloud();
        let first_y = cloud.positions()[0].y;
        cloud.trigger(0.0);

        cloud.update(0.25);
        assert!(cloud.opacity() > 0.0 && cloud.opacity() < 1.0);
        assert_relative_eq!(cloud.positions()[0].y, first_y);

        cloud.update(0.5);
        assert_relative_eq!(cloud.opacity(), 1.0);

        cloud.update(3.5);
        assert_relative_eq!(cloud.positions()[0].y, first_y - FALL_DISTANCE, epsilon = 1e-4);
        assert_relative_eq!(cloud.opacity(), 1.0);

        cloud.update(4.0);
        assert!(cloud.opacity() < 1.0 && cloud.opacity() > 0.0);
        assert_relative_eq!(cloud.positions()[0].y, first_y - FALL_DISTANCE, epsilon = 1e-4);
    }

    #[test]
    fn retrigger_during_burst_is_ignored() {
        let mut cloud = cloud();
        assert!(cloud.trigger(0.0));
        cloud.update(1.0);
        assert!(!cloud.trigger(1.0));
        cloud.update(4.5);
        assert!(!cloud.is_bursting());
        assert!(cloud.trigger(5.0));
    }
}
