use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CurveError, Result};

/// Delimiter and quoting conventions for time series files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CsvDialect {
    /// Comma separated, CRLF line endings, quotes only where needed.
    #[default]
    Excel,
    /// Tab separated variant of [`CsvDialect::Excel`].
    ExcelTab,
    /// Comma separated, LF line endings, every field quoted.
    Unix,
    Custom { delimiter: char, quote: char },
}

impl CsvDialect {
    pub fn delimiter(&self) -> Result<u8> {
        match self {
            Self::Excel | Self::Unix => Ok(b','),
            Self::ExcelTab => Ok(b'\t'),
            Self::Custom { delimiter, .. } => ascii_byte("delimiter", *delimiter),
        }
    }

    pub fn quote(&self) -> Result<u8> {
        match self {
            Self::Custom { quote, .. } => ascii_byte("quote", *quote),
            _ => Ok(b'"'),
        }
    }

    /// Reader configured to yield every record, including headers and rows
    /// of unexpected width, so that filtering stays with the caller.
    pub fn reader_builder(&self) -> Result<csv::ReaderBuilder> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .double_quote(true)
            .delimiter(self.delimiter()?)
            .quote(self.quote()?);
        Ok(builder)
    }

    pub fn writer_builder(&self) -> Result<csv::WriterBuilder> {
        let (style, terminator) = match self {
            Self::Unix => (csv::QuoteStyle::Always, csv::Terminator::Any(b'\n')),
            _ => (csv::QuoteStyle::Necessary, csv::Terminator::CRLF),
        };

        let mut builder = csv::WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .double_quote(true)
            .delimiter(self.delimiter()?)
            .quote(self.quote()?)
            .quote_style(style)
            .terminator(terminator);
        Ok(builder)
    }
}

impl FromStr for CsvDialect {
    type Err = CurveError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "excel" => Ok(Self::Excel),
            "excel-tab" => Ok(Self::ExcelTab),
            "unix" => Ok(Self::Unix),
            other => Err(CurveError::configuration(format!(
                "unknown csv dialect `{other}`, expected excel, excel-tab or unix"
            ))),
        }
    }
}

fn ascii_byte(role: &str, value: char) -> Result<u8> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(CurveError::configuration(format!(
            "csv {role} must be an ASCII character, got `{value}`"
        )))
    }
}
