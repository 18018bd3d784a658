use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CurveSpec, Result, SineCurve, Timeline};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub timeline: TimelineConfig,
    pub curve: CurveSpec,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeline: TimelineConfig::default(),
            curve: CurveSpec::Sine(SineCurve::default()),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Shape of the animation run the configured curve is sampled over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub frames_per_second: f64,
    pub total_frames: Option<u64>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 25.0,
            total_frames: None,
        }
    }
}

impl TimelineConfig {
    /// Builds the timeline for one frame of the run.
    pub fn timeline_at(&self, frame: u64) -> Result<Timeline> {
        let timeline = Timeline::new(frame, self.frames_per_second)?;
        Ok(match self.total_frames {
            Some(total) => timeline.with_total_frames(total),
            None => timeline,
        })
    }
}
