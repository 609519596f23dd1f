// extensions/easing.rs
//
// Easing curves for offset interpolation.
// Pure math: no dependency on tiles, rows or the clock.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Easing curve applied to the normalized progress of a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Stronger slow end.
    CubicOut,
    SineOut,
    /// Exponential deceleration (dramatic).
    ExpoOut,
    /// Overshoot then settle.
    BackOut,
}

impl Easing {
    /// Apply the curve to a normalized time value `t` in [0, 1].
    /// The result is typically in [0, 1] but overshoots for `BackOut`.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f64.powf(-10.0 * t) }
            }
            Easing::BackOut => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f64, b: f64, t: f64, easing: Easing) -> f64 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::CubicOut,
        Easing::SineOut,
        Easing::ExpoOut,
        Easing::BackOut,
    ];

    #[test]
    fn every_curve_hits_both_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-9, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{:?} at 1", easing);
        }
    }

    #[test]
    fn out_curves_lead_linear() {
        for easing in [Easing::QuadOut, Easing::CubicOut, Easing::SineOut, Easing::ExpoOut] {
            assert!(easing.apply(0.5) > 0.5, "{:?} should decelerate", easing);
        }
        assert!(Easing::QuadIn.apply(0.5) < 0.5);
    }

    #[test]
    fn back_out_overshoots_before_settling() {
        let peak = (1..100)
            .map(|i| Easing::BackOut.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0, "BackOut should overshoot, peak was {}", peak);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn ease_interpolates_between_values() {
        let result = ease(4.0, 14.0, 0.5, Easing::Linear);
        assert!((result - 9.0).abs() < 1e-9);
    }

    #[test]
    fn parses_snake_case_names() {
        let easing: Easing = serde_json::from_str("\"back_out\"").unwrap();
        assert_eq!(easing, Easing::BackOut);
    }
}
