//! Floating balloons
//!
//! Balloons are placed around the cake on fixed angular slots with a little
//! random jitter, then bob up and down forever on their own tween.

use cgmath::Vector3;
use rand::Rng;

use crate::animation::{Ease, Repeat, Tween};

use super::rgb;

pub const BALLOON_COLORS: [u32; 5] = [0xff416c, 0xff4b2b, 0xffff6e, 0x42f5b3, 0x6e5fff];
pub const BALLOON_RADIUS: f32 = 0.3;
pub const BALLOON_SEGMENTS: u32 = 16;
pub const BALLOON_ROUGHNESS: f32 = 0.4;
pub const BALLOON_METALNESS: f32 = 0.3;

/// Angle between neighbouring slots, in radians
pub const SLOT_ANGLE_STEP: f32 = 1.5;
pub const SLOT_RADIUS: f32 = 2.0;
/// Half-width of the horizontal placement jitter
pub const JITTER: f32 = 0.15;
pub const BOB_HEIGHT: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Balloon {
    pub color: [f32; 3],
    /// Position at creation; the bob moves y away from this
    pub rest_position: Vector3<f32>,
    bob: Tween,
}

impl Balloon {
    /// Position at clock time `now`
    pub fn position(&self, now: f32) -> Vector3<f32> {
        Vector3::new(
            self.rest_position.x,
            self.bob.value_at(now),
            self.rest_position.z,
        )
    }

    pub fn bob(&self) -> &Tween {
        &self.bob
    }
}

/// Horizontal centre of slot `index`
pub fn slot_center(index: usize) -> (f32, f32) {
    let angle = index as f32 * SLOT_ANGLE_STEP;
    (angle.sin() * SLOT_RADIUS, angle.cos() * SLOT_RADIUS)
}

/// Creates one balloon per palette colour, bobbing from clock time `now`
pub fn spawn_balloons<R: Rng>(rng: &mut R, now: f32) -> Vec<Balloon> {
    BALLOON_COLORS
        .iter()
        .enumerate()
        .map(|(index, &color)| {
            let (slot_x, slot_z) = slot_center(index);
            let x = slot_x + rng.random_range(-JITTER..JITTER);
            let z = slot_z + rng.random_range(-JITTER..JITTER);
            let y = 1.5 + rng.random::<f32>() * 0.8;
            let duration = 3.0 + rng.random::<f32>() * 2.0;
            let delay = rng.random::<f32>() * 2.0;

            let bob = Tween::new(y, y + BOB_HEIGHT, duration)
                .starting_at(now)
                .with_delay(delay)
                .with_ease(Ease::SineInOut)
                .with_yoyo(true)
                .with_repeat(Repeat::Forever);

            Balloon {
                color: rgb(color),
                rest_position: Vector3::new(x, y, z),
                bob,
            }
        })
        .collect()
}
