use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{Curve, CurveError, CurveResult, Result, Timeline};

/// Sine wave oscillating between `min_value` and `max_value`.
///
/// The phase is expressed in seconds and is added to the timeline's time
/// before the angular frequency is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SineCurve {
    pub max_value: f64,
    pub min_value: f64,
    pub periodicity_seconds: f64,
    pub phase: f64,
}

impl Default for SineCurve {
    fn default() -> Self {
        Self {
            max_value: 1.0,
            min_value: 0.0,
            periodicity_seconds: 10.0,
            phase: 0.0,
        }
    }
}

impl SineCurve {
    pub fn new(max_value: f64, min_value: f64, periodicity_seconds: f64, phase: f64) -> Self {
        Self {
            max_value,
            min_value,
            periodicity_seconds,
            phase,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.periodicity_seconds.is_finite() || self.periodicity_seconds <= 0.0 {
            return Err(CurveError::configuration(format!(
                "sine periodicity must be a positive number of seconds, got {}",
                self.periodicity_seconds
            )));
        }
        Ok(())
    }

    /// Samples the wave at an absolute time in seconds.
    pub fn value_at(&self, seconds: f64) -> Result<f64> {
        self.validate()?;

        let amplitude = (self.max_value - self.min_value) * 0.5;
        let angular = 2.0 * PI / self.periodicity_seconds;
        let offset = (self.max_value + self.min_value) * 0.5;
        Ok(amplitude * (angular * (seconds + self.phase)).sin() + offset)
    }
}

impl Curve for SineCurve {
    fn evaluate(&self, timeline: &Timeline) -> Result<CurveResult> {
        self.value_at(timeline.current_time_in_seconds())
            .map(CurveResult::new)
    }
}
