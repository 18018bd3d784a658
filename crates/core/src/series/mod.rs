//! Curves driven by an external `position,value` time series.
//!
//! The series is streamed from its source on every evaluation through a two
//! row window, so no state survives between frames. Rows are trusted to be
//! ordered by position.

mod dialect;
mod rows;

use std::{fs::File, io::Read, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Curve, CurveError, CurveResult, Result, Timeline};

pub use dialect::CsvDialect;
pub use rows::{ColumnUnit, RowWindow, SeriesRows, TimeSeriesRow, Windows};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeriesCurve {
    pub path: PathBuf,
    pub first_column: ColumnUnit,
    /// Blend linearly between samples instead of holding the earlier one.
    pub interpolate: bool,
    pub dialect: CsvDialect,
}

impl Default for TimeSeriesCurve {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            first_column: ColumnUnit::Seconds,
            interpolate: true,
            dialect: CsvDialect::Excel,
        }
    }
}

impl TimeSeriesCurve {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_first_column(mut self, unit: ColumnUnit) -> Self {
        self.first_column = unit;
        self
    }

    pub fn with_interpolation(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    pub fn with_dialect(mut self, dialect: CsvDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Evaluates the series read from an arbitrary source rather than from
    /// `path`.
    pub fn evaluate_reader<R: Read>(
        &self,
        source: R,
        source_name: &str,
        timeline: &Timeline,
    ) -> Result<CurveResult> {
        let reader = self.dialect.reader_builder()?.from_reader(source);
        let windows = SeriesRows::new(reader, source_name).windows();
        self.lookup(windows, timeline)
    }

    fn lookup<I>(&self, windows: I, timeline: &Timeline) -> Result<CurveResult>
    where
        I: Iterator<Item = Result<RowWindow>>,
    {
        let fps = timeline.frames_per_second();
        let to_frame = |row: &TimeSeriesRow| self.first_column.to_frame(row.position, fps);
        let query = i64::try_from(timeline.current_frame()).unwrap_or(i64::MAX);

        for window in windows {
            match window? {
                RowWindow::Leading(first) => {
                    if query < to_frame(&first) {
                        tracing::trace!(query, "frame precedes the series");
                        return Ok(CurveResult::new(first.value));
                    }
                }
                RowWindow::Pair(left, right) => {
                    let (frame1, frame2) = (to_frame(&left), to_frame(&right));
                    if frame1 <= query && query < frame2 {
                        let value = if self.interpolate {
                            let offset =
                                (query as f64 - frame1 as f64) / (frame2 as f64 - frame1 as f64);
                            left.value * (1.0 - offset) + right.value * offset
                        } else {
                            left.value
                        };
                        return Ok(CurveResult::new(value));
                    }
                }
                RowWindow::Trailing(last) => {
                    tracing::trace!(query, "frame follows the series");
                    return Ok(CurveResult::new(last.value));
                }
            }
        }

        tracing::debug!(query, "time series has no usable rows");
        Ok(CurveResult::default())
    }
}

impl Curve for TimeSeriesCurve {
    fn evaluate(&self, timeline: &Timeline) -> Result<CurveResult> {
        let source_name = self.path.display().to_string();
        let file = File::open(&self.path)
            .map_err(|err| CurveError::source_unavailable(source_name.clone(), err))?;
        tracing::debug!(source = %source_name, frame = timeline.current_frame(), "reading time series");
        self.evaluate_reader(file, &source_name, timeline)
    }
}
