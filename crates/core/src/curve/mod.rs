use serde::{Deserialize, Serialize};

use crate::{BeatCurve, LinearCurve, Result, SineCurve, TimeSeriesCurve, Timeline};

/// Value produced by a curve for one frame, alongside its integer form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveResult {
    pub value: f64,
    pub rounded: i64,
}

impl CurveResult {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            rounded: round_half_even(value),
        }
    }
}

impl Default for CurveResult {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Rounds to the nearest integer, resolving exact halves towards the even
/// neighbour. Out of range values saturate and NaN maps to zero.
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Shared interface implemented by every curve generator.
pub trait Curve {
    /// Evaluates the curve at the position described by `timeline`.
    fn evaluate(&self, timeline: &Timeline) -> Result<CurveResult>;
}

/// Serializable description of one of the supported curve kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveSpec {
    Sine(SineCurve),
    Linear(LinearCurve),
    Beat(BeatCurve),
    TimeSeries(TimeSeriesCurve),
}

impl CurveSpec {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sine(_) => "sine",
            Self::Linear(_) => "linear",
            Self::Beat(_) => "beat",
            Self::TimeSeries(_) => "time_series",
        }
    }
}

impl Curve for CurveSpec {
    fn evaluate(&self, timeline: &Timeline) -> Result<CurveResult> {
        match self {
            Self::Sine(curve) => curve.evaluate(timeline),
            Self::Linear(curve) => curve.evaluate(timeline),
            Self::Beat(curve) => curve.evaluate(timeline),
            Self::TimeSeries(curve) => curve.evaluate(timeline),
        }
    }
}
