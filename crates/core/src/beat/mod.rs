//! Rhythmic envelope driven by tempo and a pattern of accented beats.
//!
//! Every accented beat contributes a pulse that starts at 1.0 on the first
//! frame of the beat and decays linearly to 0.0 by the start of the next one.
//! Pulses are shaped by `power` and summed without clamping. The final value
//! is an affine map of the envelope onto `[low_value, high_value]`, so an
//! inverted or offset envelope may leave that range.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{curve::round_half_even, Curve, CurveError, CurveResult, Result, Timeline};

/// Set of accented beat indices, counted from 1 within a measure.
///
/// Any integer is accepted; indices outside the measure are ignored when
/// the curve is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccentSet(BTreeSet<i64>);

impl AccentSet {
    pub fn new(accents: impl IntoIterator<Item = i64>) -> Self {
        Self(accents.into_iter().collect())
    }

    /// Accents that fall inside a measure of `measure_length` beats. Anything
    /// else is dropped silently.
    pub fn within(&self, measure_length: u32) -> impl Iterator<Item = i64> + '_ {
        self.0.range(1..=i64::from(measure_length)).copied()
    }
}

impl FromIterator<i64> for AccentSet {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[derive(Debug, Clone, Copy)]
struct BeatGrid {
    frames_per_beat: f64,
    frames_per_measure: f64,
}

impl BeatGrid {
    fn new(frames_per_second: f64, bpm: f64, measure_length: u32) -> Self {
        let frames_per_beat = frames_per_second * 60.0 / bpm;
        Self {
            frames_per_beat,
            frames_per_measure: frames_per_beat * f64::from(measure_length),
        }
    }

    /// Position of `frame` inside its measure, always non-negative.
    fn measure_position(&self, frame: i64) -> f64 {
        (frame as f64).rem_euclid(self.frames_per_measure)
    }

    /// Decaying pulse of `accent` at `position`, zero outside its beat.
    fn pulse(&self, accent: i64, position: f64) -> f64 {
        let start = (accent - 1) as f64 * self.frames_per_beat;
        let end = accent as f64 * self.frames_per_beat;
        if position >= start && position < end {
            1.0 - (position - start) / self.frames_per_beat
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeatCurve {
    pub bpm: f64,
    /// Shift applied before locating the beat, in seconds.
    pub time_offset: f64,
    /// Beats per measure.
    pub measure_length: u32,
    pub low_value: f64,
    pub high_value: f64,
    pub invert: bool,
    pub power: f64,
    pub accents: AccentSet,
}

impl Default for BeatCurve {
    fn default() -> Self {
        Self {
            bpm: 100.0,
            time_offset: 0.0,
            measure_length: 4,
            low_value: 0.0,
            high_value: 1.0,
            invert: false,
            power: 2.0,
            accents: AccentSet::new([1, 3]),
        }
    }
}

impl BeatCurve {
    pub fn validate(&self) -> Result<()> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(CurveError::configuration(format!(
                "bpm must be a positive number, got {}",
                self.bpm
            )));
        }
        if self.measure_length == 0 {
            return Err(CurveError::configuration(
                "measure length must be at least one beat",
            ));
        }
        // 0^0 is 1, so a zero power lights every accent at full strength.
        if self.power.is_nan() || self.power < 0.0 {
            return Err(CurveError::configuration(format!(
                "power must not be negative, got {}",
                self.power
            )));
        }
        Ok(())
    }

    /// Summed accent envelope before inversion and mapping.
    fn envelope(&self, timeline: &Timeline) -> f64 {
        let frames_per_second = timeline.frames_per_second();
        let grid = BeatGrid::new(frames_per_second, self.bpm, self.measure_length);
        let frame_offset = round_half_even(self.time_offset * frames_per_second);
        let frame = i64::try_from(timeline.current_frame())
            .unwrap_or(i64::MAX)
            .saturating_add(frame_offset);
        let position = grid.measure_position(frame);

        self.accents
            .within(self.measure_length)
            .map(|accent| grid.pulse(accent, position).powf(self.power))
            .sum()
    }
}

impl Curve for BeatCurve {
    fn evaluate(&self, timeline: &Timeline) -> Result<CurveResult> {
        self.validate()?;

        let mut envelope = self.envelope(timeline);
        if self.invert {
            envelope = 1.0 - envelope;
        }

        let value = self.low_value + envelope * (self.high_value - self.low_value);
        tracing::trace!(
            frame = timeline.current_frame(),
            envelope,
            value,
            "evaluated beat curve"
        );
        Ok(CurveResult::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    /// 10 frames per beat at 10 fps and 60 bpm.
    fn pulse_curve(accents: &[i64], measure_length: u32) -> BeatCurve {
        BeatCurve {
            bpm: 60.0,
            time_offset: 0.0,
            measure_length,
            low_value: 10.0,
            high_value: 20.0,
            invert: false,
            power: 1.0,
            accents: accents.iter().copied().collect(),
        }
    }

    fn at(curve: &BeatCurve, frame: u64) -> f64 {
        let timeline = Timeline::new(frame, 10.0).unwrap();
        curve.evaluate(&timeline).unwrap().value
    }

    #[test]
    fn single_accent_decays_and_wraps() {
        let curve = pulse_curve(&[1], 1);
        assert!((at(&curve, 0) - 20.0).abs() < EPSILON);
        assert!((at(&curve, 9) - 11.0).abs() < EPSILON);
        assert!((at(&curve, 10) - 20.0).abs() < EPSILON);
        assert!((at(&curve, 15) - 15.0).abs() < EPSILON);
    }

    #[test]
    fn accent_is_silent_outside_its_beat() {
        let curve = pulse_curve(&[2], 4);
        assert!((at(&curve, 0) - 10.0).abs() < EPSILON);
        assert!((at(&curve, 10) - 20.0).abs() < EPSILON);
        assert!((at(&curve, 25) - 10.0).abs() < EPSILON);
        assert!((at(&curve, 50) - 20.0).abs() < EPSILON);
    }

    #[test]
    fn power_shapes_the_pulse() {
        let mut curve = pulse_curve(&[1], 1);
        curve.power = 2.0;
        // pulse 0.5 squared
        assert!((at(&curve, 5) - 12.5).abs() < EPSILON);
    }

    #[test]
    fn out_of_range_and_duplicate_accents_are_ignored() {
        let curve = pulse_curve(&[-3, 0, 1, 1, 5, 99], 4);
        assert_eq!(curve.accents.within(4).collect::<Vec<_>>(), vec![1]);
        assert!((at(&curve, 0) - 20.0).abs() < EPSILON);
    }

    #[test]
    fn empty_accents_rest_at_low_or_high() {
        let mut curve = pulse_curve(&[], 4);
        assert_eq!(at(&curve, 3), 10.0);

        curve.invert = true;
        assert_eq!(at(&curve, 3), 20.0);
    }

    #[test]
    fn every_accent_forms_a_sawtooth() {
        let curve = pulse_curve(&[1, 2, 3], 3);
        let timeline = |frame| Timeline::new(frame, 10.0).unwrap();
        for frame in 0..60 {
            let expected = 1.0 - (frame % 10) as f64 / 10.0;
            let envelope = curve.envelope(&timeline(frame));
            assert!((envelope - expected).abs() < EPSILON, "frame {frame}");
        }
    }

    #[test]
    fn fractional_beats_keep_windows_disjoint() {
        // 10.5 frames per beat, so frame 10 is the tail of the first beat and
        // frame 11 the head of the second.
        let mut curve = pulse_curve(&[1, 2], 2);
        curve.bpm = 600.0 / 10.5;
        let envelope = |frame| curve.envelope(&Timeline::new(frame, 10.0).unwrap());

        assert!((envelope(10) - (1.0 - 10.0 / 10.5)).abs() < EPSILON);
        assert!((envelope(11) - (1.0 - 0.5 / 10.5)).abs() < EPSILON);
        // 21 frames per measure
        assert!((envelope(22) - (1.0 - 1.0 / 10.5)).abs() < EPSILON);
    }

    #[test]
    fn zero_power_sums_accents_past_high_value() {
        let mut curve = BeatCurve {
            power: 0.0,
            low_value: 0.0,
            high_value: 1.0,
            ..pulse_curve(&[1, 2, 3], 4)
        };
        assert_eq!(at(&curve, 0), 3.0);
        assert_eq!(at(&curve, 35), 3.0);

        curve.invert = true;
        assert_eq!(at(&curve, 0), -2.0);
        assert_eq!(curve.evaluate(&Timeline::new(0, 10.0).unwrap()).unwrap().rounded, -2);
    }

    #[test]
    fn inversion_flips_the_pulse() {
        let mut curve = pulse_curve(&[1], 1);
        curve.invert = true;
        assert!((at(&curve, 0) - 10.0).abs() < EPSILON);
        assert!((at(&curve, 5) - 15.0).abs() < EPSILON);
    }

    #[test]
    fn negative_offsets_wrap_backwards() {
        let mut curve = pulse_curve(&[1], 2);
        curve.time_offset = -0.5;
        // frame 0 shifted by -5 frames lands at position 15 of a 20 frame measure
        assert!((at(&curve, 0) - 10.0).abs() < EPSILON);
        // frame 5 shifted lands on the first frame of the measure
        assert!((at(&curve, 5) - 20.0).abs() < EPSILON);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let timeline = Timeline::new(0, 24.0).unwrap();
        let invalid = [
            BeatCurve { bpm: 0.0, ..BeatCurve::default() },
            BeatCurve { measure_length: 0, ..BeatCurve::default() },
            BeatCurve { power: -1.0, ..BeatCurve::default() },
            BeatCurve { power: f64::NAN, ..BeatCurve::default() },
        ];
        for curve in invalid {
            assert!(matches!(
                curve.evaluate(&timeline),
                Err(CurveError::Configuration(_))
            ));
        }
    }
}
