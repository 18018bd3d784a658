use serde::{Deserialize, Serialize};

use crate::{Curve, CurveError, CurveResult, Result, Timeline};

/// Straight ramp from `initial_value` on the first frame to `final_value` on
/// the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearCurve {
    pub initial_value: f64,
    pub final_value: f64,
}

impl Default for LinearCurve {
    fn default() -> Self {
        Self {
            initial_value: 0.0,
            final_value: 100.0,
        }
    }
}

impl LinearCurve {
    pub fn new(initial_value: f64, final_value: f64) -> Self {
        Self {
            initial_value,
            final_value,
        }
    }

    pub fn value_at_progress(&self, progress: f64) -> f64 {
        self.initial_value + progress * (self.final_value - self.initial_value)
    }
}

impl Curve for LinearCurve {
    fn evaluate(&self, timeline: &Timeline) -> Result<CurveResult> {
        let progress = timeline.progress().ok_or(CurveError::UndefinedProgress)?;
        Ok(CurveResult::new(self.value_at_progress(progress)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_initial_to_final() {
        let curve = LinearCurve::new(-4.0, 12.0);
        let first = Timeline::with_total(0, 24.0, 9).unwrap();
        let last = first.incremented(8);

        assert_eq!(curve.evaluate(&first).unwrap().value, -4.0);
        assert_eq!(curve.evaluate(&last).unwrap().value, 12.0);
        assert_eq!(curve.evaluate(&first.incremented(4)).unwrap().value, 4.0);
    }

    #[test]
    fn is_monotonic_for_rising_ramps() {
        let curve = LinearCurve::default();
        let mut previous = f64::NEG_INFINITY;
        for frame in 0..30 {
            let timeline = Timeline::with_total(frame, 12.0, 25).unwrap();
            let value = curve.evaluate(&timeline).unwrap().value;
            assert!(value >= previous);
            previous = value;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn unknown_length_is_an_error() {
        let timeline = Timeline::new(3, 24.0).unwrap();
        let err = LinearCurve::default().evaluate(&timeline).unwrap_err();
        assert!(matches!(err, CurveError::UndefinedProgress));
    }
}
