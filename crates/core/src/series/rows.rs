use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{curve::round_half_even, CurveError, Result};

/// Unit of the first column of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnUnit {
    #[default]
    Seconds,
    Frames,
}

impl ColumnUnit {
    /// Converts a position in this unit to a frame index.
    pub fn to_frame(self, position: f64, frames_per_second: f64) -> i64 {
        match self {
            Self::Seconds => round_half_even(position * frames_per_second),
            Self::Frames => round_half_even(position),
        }
    }
}

/// One accepted `(position, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesRow {
    pub position: f64,
    pub value: f64,
}

impl TimeSeriesRow {
    /// Accepts records of exactly two numeric fields.
    fn from_record(record: &csv::ByteRecord) -> Option<Self> {
        if record.len() != 2 {
            return None;
        }
        Some(Self {
            position: parse_field(record.get(0)?)?,
            value: parse_field(record.get(1)?)?,
        })
    }
}

/// Parses a finite real. Underscores are accepted only between two digits.
fn parse_field(field: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(field).ok()?.trim();
    let value: f64 = if text.contains('_') {
        let bytes = text.as_bytes();
        let grouped = bytes.iter().enumerate().all(|(i, byte)| {
            *byte != b'_'
                || (i > 0
                    && bytes[i - 1].is_ascii_digit()
                    && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
        });
        if !grouped {
            return None;
        }
        text.replace('_', "").parse().ok()?
    } else {
        text.parse().ok()?
    };
    value.is_finite().then_some(value)
}

/// Lazy sequence of accepted rows read from a delimited source.
///
/// Records that are not exactly two numbers are skipped. Read failures end
/// the sequence with [`CurveError::SourceUnavailable`].
pub struct SeriesRows<R> {
    reader: csv::Reader<R>,
    record: csv::ByteRecord,
    source_name: String,
    done: bool,
}

impl<R: Read> SeriesRows<R> {
    pub fn new(reader: csv::Reader<R>, source_name: impl Into<String>) -> Self {
        Self {
            reader,
            record: csv::ByteRecord::new(),
            source_name: source_name.into(),
            done: false,
        }
    }

    /// Pairs every row with its predecessor.
    pub fn windows(self) -> Windows<Self> {
        Windows::new(self)
    }
}

impl<R: Read> Iterator for SeriesRows<R> {
    type Item = Result<TimeSeriesRow>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.reader.read_byte_record(&mut self.record) {
                Ok(false) => self.done = true,
                Ok(true) => {
                    if let Some(row) = TimeSeriesRow::from_record(&self.record) {
                        return Some(Ok(row));
                    }
                    tracing::trace!(
                        source = %self.source_name,
                        line = self.record.position().map(|p| p.line()),
                        "skipping time series record"
                    );
                }
                Err(err) => match err.into_kind() {
                    csv::ErrorKind::Io(io) => {
                        self.done = true;
                        return Some(Err(CurveError::source_unavailable(
                            self.source_name.clone(),
                            io,
                        )));
                    }
                    other => {
                        tracing::trace!(source = %self.source_name, error = ?other, "skipping unreadable record");
                    }
                },
            }
        }
        None
    }
}

/// Sliding view of the previous and current row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowWindow {
    /// The first accepted row, with nothing before it.
    Leading(TimeSeriesRow),
    /// Two consecutive rows, earliest first.
    Pair(TimeSeriesRow, TimeSeriesRow),
    /// The last accepted row, emitted once the source is exhausted.
    Trailing(TimeSeriesRow),
}

pub struct Windows<I> {
    rows: I,
    previous: Option<TimeSeriesRow>,
    finished: bool,
}

impl<I> Windows<I> {
    pub fn new(rows: I) -> Self {
        Self {
            rows,
            previous: None,
            finished: false,
        }
    }
}

impl<I> Iterator for Windows<I>
where
    I: Iterator<Item = Result<TimeSeriesRow>>,
{
    type Item = Result<RowWindow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.rows.next() {
            Some(Ok(row)) => {
                let window = match self.previous.replace(row) {
                    Some(previous) => RowWindow::Pair(previous, row),
                    None => RowWindow::Leading(row),
                };
                Some(Ok(window))
            }
            Some(Err(err)) => {
                self.finished = true;
                Some(Err(err))
            }
            None => {
                self.finished = true;
                self.previous.take().map(|last| Ok(RowWindow::Trailing(last)))
            }
        }
    }
}
