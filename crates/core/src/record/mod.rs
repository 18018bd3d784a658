use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::{CsvDialect, CurveError, Result, Timeline};

const HEADER: [&str; 2] = ["Frame", "Value"];

/// Configuration options for the series recorder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingSettings {
    pub output_path: PathBuf,
    pub dialect: CsvDialect,
}

/// Writes one `(frame, value)` row per evaluated frame so that a run can be
/// replayed later through a frames-based [`crate::TimeSeriesCurve`].
///
/// The first frame of a run truncates the file and writes a header. Later
/// frames append.
#[derive(Debug, Clone)]
pub struct SeriesRecorder {
    settings: RecordingSettings,
}

impl SeriesRecorder {
    pub fn new(settings: RecordingSettings) -> Self {
        Self { settings }
    }

    pub fn record(&self, timeline: &Timeline, value: f64) -> Result<()> {
        let path = &self.settings.output_path;
        if path.as_os_str().is_empty() {
            return Err(CurveError::configuration(
                "recorder output path must not be empty",
            ));
        }

        let starts_run = timeline.is_first_frame();
        let file = if starts_run {
            tracing::debug!(path = %path.display(), "starting new series recording");
            File::create(path)?
        } else {
            OpenOptions::new().create(true).append(true).open(path)?
        };

        self.write_row(file, starts_run, timeline.current_frame(), value)
    }

    fn write_row<W: Write>(&self, sink: W, header: bool, frame: u64, value: f64) -> Result<()> {
        let mut writer = self.settings.dialect.writer_builder()?.from_writer(sink);
        if header {
            writer.write_record(HEADER)?;
        }
        writer.write_record([frame.to_string(), format!("{value:?}")])?;
        writer.flush()?;
        Ok(())
    }
}
