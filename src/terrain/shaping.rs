//! Per-biome noise shaping curves

use serde::{Deserialize, Serialize};

/// How a biome bends raw simplex output (roughly [-1, 1]) into a height.
///
/// Every curve starts from `(sin(raw) + offset) / 2`, which folds the noise
/// into a soft [0, 1] band, then reshapes the upper part of the band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapingCurve {
    /// Plain sine fold
    Sine { offset: f64 },
    /// Rolling hills: values above `threshold` gain `exp(v / divisor) - 1`
    Hills { threshold: f64, divisor: f64 },
    /// Mesa cliffs: values at or above `threshold` become `exp(v - shift)`;
    /// anything reaching 1 is knocked down by up to `ceiling_jitter`
    Cliffs { threshold: f64, shift: f64, ceiling_jitter: f64 },
    /// Caves: values at or above `threshold` are multiplied by `gain`
    Caverns { offset: f64, threshold: f64, gain: f64 },
}

impl ShapingCurve {
    /// Shape a raw noise value.
    ///
    /// `random` is a per-texel value in [0, 1) used by curves with a
    /// randomized component; callers derive it deterministically.
    pub fn apply(&self, raw: f64, random: f64) -> f64 {
        match *self {
            ShapingCurve::Sine { offset } => fold(raw, offset),
            ShapingCurve::Hills { threshold, divisor } => {
                let mut v = fold(raw, 1.0);
                if v > threshold {
                    v += (v / divisor).exp() - 1.0;
                }
                v
            }
            ShapingCurve::Cliffs { threshold, shift, ceiling_jitter } => {
                let mut v = fold(raw, 1.0);
                if v >= threshold {
                    v = (v - shift).exp();
                    if v >= 1.0 {
                        v = 1.0 - random * ceiling_jitter;
                    }
                }
                v
            }
            ShapingCurve::Caverns { offset, threshold, gain } => {
                let mut v = fold(raw, offset);
                if v >= threshold {
                    v *= gain;
                }
                v
            }
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ShapingCurve::Sine { .. } => "sine",
            ShapingCurve::Hills { .. } => "hills",
            ShapingCurve::Cliffs { .. } => "cliffs",
            ShapingCurve::Caverns { .. } => "caverns",
        }
    }
}

fn fold(raw: f64, offset: f64) -> f64 {
    (raw.sin() + offset) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const HILLS: ShapingCurve = ShapingCurve::Hills { threshold: 0.5, divisor: 5.0 };
    const CLIFFS: ShapingCurve = ShapingCurve::Cliffs { threshold: 0.55, shift: 0.6, ceiling_jitter: 0.1 };

    #[test]
    fn test_sine_fold() {
        let curve = ShapingCurve::Sine { offset: 1.0 };
        assert!((curve.apply(0.0, 0.0) - 0.5).abs() < 1e-12);
        assert!((curve.apply(1.0, 0.0) - (1.0f64.sin() + 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_hills_boost_above_threshold() {
        // Below threshold: untouched
        let low = HILLS.apply(-0.5, 0.0);
        assert!((low - ((-0.5f64).sin() + 1.0) / 2.0).abs() < 1e-12);

        // Above threshold: boosted
        let v = (0.8f64.sin() + 1.0) / 2.0;
        let high = HILLS.apply(0.8, 0.0);
        assert!((high - (v + (v / 5.0).exp() - 1.0)).abs() < 1e-12);
        assert!(high > v);
    }

    #[test]
    fn test_cliffs_ceiling_jitter() {
        // sin(1.0) folds to ~0.92, exp(0.92 - 0.6) > 1, so the ceiling applies
        assert!((CLIFFS.apply(1.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((CLIFFS.apply(1.0, 0.5) - 0.95).abs() < 1e-12);
        assert!(CLIFFS.apply(1.0, 0.999) > 0.9);
    }

    #[test]
    fn test_cliffs_below_threshold_untouched() {
        let v = CLIFFS.apply(-1.0, 0.7);
        assert!((v - ((-1.0f64).sin() + 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_caverns_gain() {
        let curve = ShapingCurve::Caverns { offset: 0.9, threshold: 0.65, gain: 1.25 };
        let v = (1.2f64.sin() + 0.9) / 2.0;
        assert!(v >= 0.65);
        assert!((curve.apply(1.2, 0.0) - v * 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&HILLS).unwrap();
        assert!(json.contains("\"kind\":\"hills\""));
        let back: ShapingCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, HILLS);
    }
}
