//! JSON and CSV renderings of a [`Report`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ReportError;
use crate::report::{Report, CSV_COLUMNS};

/// Output format for a serialized report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// MIME type for HTTP responses.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("unsupported format '{s}', expected 'json' or 'csv'")),
        }
    }
}

/// Serialize a report in the requested format.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] if the encoder fails.
pub fn render(report: &Report, format: OutputFormat) -> Result<Vec<u8>, ReportError> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Csv => to_csv(report),
    }
}

/// Pretty-printed JSON: report metadata plus a `posts` array.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] if encoding fails.
pub fn to_json(report: &Report) -> Result<Vec<u8>, ReportError> {
    let mut out =
        serde_json::to_vec_pretty(report).map_err(|e| ReportError::Serialize(e.to_string()))?;
    out.push(b'\n');
    Ok(out)
}

/// RFC 4180 CSV: a header row followed by one row per post.
///
/// The header is written even when the report has no rows.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] if encoding fails.
pub fn to_csv(report: &Report) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_COLUMNS)
        .map_err(|e| ReportError::Serialize(e.to_string()))?;
    for row in report.posts() {
        writer
            .serialize(row)
            .map_err(|e| ReportError::Serialize(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Serialize(e.to_string()))
}
