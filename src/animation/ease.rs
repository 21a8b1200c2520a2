//! Easing curves
//!
//! Maps linear progress in `[0, 1]` onto an eased progress. The named curves
//! follow the usual "power" family: power1 is quadratic, power2 cubic and
//! power3 quartic.

use std::f32::consts::PI;

/// Easing curve applied to tween progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out, the default for camera moves and light fades
    #[default]
    Power1Out,
    Power1InOut,
    Power2In,
    Power3Out,
    SineInOut,
}

impl Ease {
    /// Applies the curve to `t`, clamping the input to `[0, 1]`
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t).powi(2),
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::Power2In => t.powi(3),
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Ease; 6] = [
        Ease::Linear,
        Ease::Power1Out,
        Ease::Power1InOut,
        Ease::Power2In,
        Ease::Power3Out,
        Ease::SineInOut,
    ];

    #[test]
    fn curves_are_anchored_at_both_ends() {
        for ease in ALL {
            assert_relative_eq!(ease.apply(0.0), 0.0, epsilon = 1e-6);
            assert_relative_eq!(ease.apply(1.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::Power3Out.apply(-1.0), 0.0);
        assert_eq!(Ease::Power2In.apply(4.0), 1.0);
    }

    #[test]
    fn midpoints_match_curve_shape() {
        assert_relative_eq!(Ease::Linear.apply(0.5), 0.5);
        assert_relative_eq!(Ease::Power1Out.apply(0.5), 0.75);
        assert_relative_eq!(Ease::Power1InOut.apply(0.5), 0.5);
        assert_relative_eq!(Ease::Power2In.apply(0.5), 0.125);
        assert_relative_eq!(Ease::Power3Out.apply(0.5), 0.9375);
        assert_relative_eq!(Ease::SineInOut.apply(0.5), 0.5, epsilon = 1e-6);
    }
}
