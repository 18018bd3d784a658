//! Core library for evaluating per-frame animation curves.
//!
//! A host builds a [`Timeline`] for every rendered frame and evaluates one
//! curve against it, receiving a [`CurveResult`] that carries both the raw
//! value and its integer rounding. Four curve kinds are provided: a sine
//! oscillator, a linear ramp over the run, a beat accent envelope and a curve
//! read from a `position,value` time series file. A [`SeriesRecorder`]
//! writes such files from evaluated values.

pub mod beat;
pub mod config;
pub mod curve;
pub mod error;
pub mod linear;
pub mod periodic;
pub mod record;
pub mod series;
pub mod timeline;

pub use beat::{AccentSet, BeatCurve};
pub use config::{AppConfig, TimelineConfig};
pub use curve::{round_half_even, Curve, CurveResult, CurveSpec};
pub use error::{CurveError, Result};
pub use linear::LinearCurve;
pub use periodic::SineCurve;
pub use record::{RecordingSettings, SeriesRecorder};
pub use series::{ColumnUnit, CsvDialect, RowWindow, SeriesRows, TimeSeriesCurve, TimeSeriesRow};
pub use timeline::Timeline;
