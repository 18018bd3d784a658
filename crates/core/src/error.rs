/// Result alias that carries the custom [`CurveError`] type.
pub type Result<T> = std::result::Result<T, CurveError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    /// A static curve or timeline parameter is outside its valid domain. The
    /// evaluation that detected it produces no value.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A progress-driven curve was evaluated on a timeline with no known
    /// total frame count.
    #[error("timeline progress is undefined without a total frame count")]
    UndefinedProgress,
    /// The backing time series could not be opened or read.
    #[error("time series source `{source_name}` is unavailable: {source}")]
    SourceUnavailable {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Failure while writing delimited rows.
    #[error("{0}")]
    Csv(#[from] csv::Error),
    /// Failure while decoding a JSON configuration.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl CurveError {
    /// Creates a configuration error that wraps the provided message.
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn source_unavailable(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            source,
        }
    }
}
