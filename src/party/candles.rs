//! Candle point lights
//!
//! One light per candle node found in the cake model. While the candles are lit
//! each light flickers on its own phase; blowing them out starts a one-way fade
//! to zero.

use cgmath::Vector3;

use crate::animation::{Ease, Tween};

use super::rgb;

/// Warm flame colour
pub const CANDLE_COLOR: u32 = 0xffeeaa;
/// Intensity before the first flicker update
pub const CANDLE_BASE_INTENSITY: f32 = 1.2;
/// Distance at which a candle's light reaches zero
pub const CANDLE_RANGE: f32 = 3.0;
/// Seconds for the blow-out fade
pub const CANDLE_FADE_SECONDS: f32 = 2.0;

/// Flicker intensity for a lit candle
///
/// `1 + 0.3 * sin(elapsed_ms * 0.01 + phase)`
pub fn flicker_intensity(elapsed_ms: f32, phase: f32) -> f32 {
    1.0 + 0.3 * (elapsed_ms * 0.01 + phase).sin()
}

#[derive(Debug, Clone)]
pub struct CandleLight {
    pub name: String,
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub range: f32,
    pub intensity: f32,
    phase: f32,
    fade: Option<Tween>,
}

impl CandleLight {
    /// # Arguments
    /// * `name` - Name of the candle node the light belongs to
    /// * `position` - Candle node position in model space
    /// * `phase` - Random phase offset in `[0, 1)`, fixed for the light's lifetime
    pub fn new(name: impl Into<String>, position: Vector3<f32>, phase: f32) -> Self {
        Self {
            name: name.into(),
            position,
            color: rgb(CANDLE_COLOR),
            range: CANDLE_RANGE,
            intensity: CANDLE_BASE_INTENSITY,
            phase,
            fade: None,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Recomputes the flicker for the current frame
    pub fn flicker(&mut self, now: f32) {
        self.intensity = flicker_intensity(now * 1000.0, self.phase);
    }

    /// Starts fading from the current intensity down to zero
    pub fn blow_out(&mut self, now: f32) {
        self.fade = Some(
            Tween::new(self.intensity, 0.0, CANDLE_FADE_SECONDS)
                .with_ease(Ease::Power1Out)
                .starting_at(now),
        );
    }

    /// Advances the blow-out fade, if one is running
    pub fn update_fade(&mut self, now: f32) {
        if let Some(fade) = &self.fade {
            self.intensity = fade.value_at(now);
        }
    }
}
