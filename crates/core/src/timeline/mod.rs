use crate::{CurveError, Result};

/// Position of a single frame within an animation run.
///
/// A timeline is built fresh by the host for every rendered frame and handed
/// to exactly one curve. It never changes after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    current_frame: u64,
    frames_per_second: f64,
    total_frames: Option<u64>,
    time_override: Option<f64>,
}

impl Timeline {
    /// Creates a timeline of unknown length positioned at `current_frame`.
    pub fn new(current_frame: u64, frames_per_second: f64) -> Result<Self> {
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(CurveError::configuration(format!(
                "frames per second must be a positive number, got {frames_per_second}"
            )));
        }

        Ok(Self {
            current_frame,
            frames_per_second,
            total_frames: None,
            time_override: None,
        })
    }

    /// Creates a timeline for a run of known length.
    pub fn with_total(current_frame: u64, frames_per_second: f64, total_frames: u64) -> Result<Self> {
        Ok(Self::new(current_frame, frames_per_second)?.with_total_frames(total_frames))
    }

    /// Returns a copy with the total frame count set.
    pub fn with_total_frames(mut self, total_frames: u64) -> Self {
        self.total_frames = Some(total_frames);
        self
    }

    /// Returns a copy whose time in seconds is the host-supplied value rather
    /// than one derived from the frame index.
    pub fn with_time_in_seconds(mut self, seconds: f64) -> Self {
        self.time_override = Some(seconds);
        self
    }

    /// Returns the same run shifted by `amount` frames, saturating at frame 0.
    pub fn incremented(&self, amount: i64) -> Self {
        let current_frame = if amount.is_negative() {
            self.current_frame.saturating_sub(amount.unsigned_abs())
        } else {
            self.current_frame.saturating_add(amount.unsigned_abs())
        };

        Self {
            current_frame,
            time_override: None,
            ..*self
        }
    }

    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    pub fn total_frames(&self) -> Option<u64> {
        self.total_frames
    }

    pub fn current_time_in_seconds(&self) -> f64 {
        self.time_override
            .unwrap_or(self.current_frame as f64 / self.frames_per_second)
    }

    pub fn total_time_in_seconds(&self) -> Option<f64> {
        self.total_frames
            .map(|total| total as f64 / self.frames_per_second)
    }

    pub fn remaining_frames(&self) -> Option<u64> {
        self.total_frames
            .map(|total| total.saturating_sub(self.current_frame))
    }

    /// Fraction of the run completed, in `[0, 1]`.
    ///
    /// Returns `None` when the total frame count is unknown. A run of a
    /// single frame reports a progress of zero.
    pub fn progress(&self) -> Option<f64> {
        self.total_frames.map(|total| {
            let last = total.max(2) - 1;
            (self.current_frame as f64 / last as f64).clamp(0.0, 1.0)
        })
    }

    pub fn is_first_frame(&self) -> bool {
        self.current_frame == 0
    }

    /// True when this is exactly the last frame of a run of known length.
    pub fn is_final_frame(&self) -> bool {
        self.total_frames
            .map(|total| self.current_frame.saturating_add(1) == total)
            .unwrap_or(false)
    }

    /// True when the frame lies past the end of a run of known length.
    pub fn is_after_last_frame(&self) -> bool {
        self.total_frames
            .map(|total| self.current_frame >= total)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_frame_rates() {
        assert!(Timeline::new(0, 0.0).is_err());
        assert!(Timeline::new(0, -24.0).is_err());
        assert!(Timeline::new(0, f64::NAN).is_err());
        assert!(Timeline::new(0, 24.0).is_ok());
    }

    #[test]
    fn derives_time_from_frame_index() {
        let timeline = Timeline::new(50, 25.0).unwrap();
        assert!((timeline.current_time_in_seconds() - 2.0).abs() < 1e-12);

        let overridden = timeline.with_time_in_seconds(7.5);
        assert_eq!(overridden.current_time_in_seconds(), 7.5);
    }

    #[test]
    fn progress_requires_known_length() {
        let open = Timeline::new(3, 10.0).unwrap();
        assert_eq!(open.progress(), None);
        assert_eq!(open.remaining_frames(), None);

        let closed = Timeline::with_total(5, 10.0, 11).unwrap();
        assert_eq!(closed.progress(), Some(0.5));
        assert_eq!(closed.remaining_frames(), Some(6));
        assert_eq!(closed.total_time_in_seconds(), Some(1.1));
    }

    #[test]
    fn progress_is_clamped() {
        let past = Timeline::with_total(40, 10.0, 11).unwrap();
        assert_eq!(past.progress(), Some(1.0));

        let single = Timeline::with_total(0, 10.0, 1).unwrap();
        assert_eq!(single.progress(), Some(0.0));
    }

    #[test]
    fn flags_distinguish_last_and_past_last() {
        let first = Timeline::with_total(0, 24.0, 3).unwrap();
        assert!(first.is_first_frame());
        assert!(!first.is_final_frame());

        let last = first.incremented(2);
        assert!(last.is_final_frame());
        assert!(!last.is_after_last_frame());

        let past = last.incremented(1);
        assert!(!past.is_final_frame());
        assert!(past.is_after_last_frame());

        let open = Timeline::new(100, 24.0).unwrap();
        assert!(!open.is_final_frame());
        assert!(!open.is_after_last_frame());
    }

    #[test]
    fn incrementing_saturates_at_zero() {
        let timeline = Timeline::new(2, 24.0).unwrap().with_time_in_seconds(9.0);
        let rewound = timeline.incremented(-5);
        assert_eq!(rewound.current_frame(), 0);
        assert_eq!(rewound.current_time_in_seconds(), 0.0);
    }
}
