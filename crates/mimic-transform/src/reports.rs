//! ECG machine report flattening.
//!
//! Machine measurement extracts spread one report over numbered line columns
//! (`report_0`, `report_1`, ...). Line order is clinically meaningful, so the
//! lines are gathered left to right into a single `full_report` list.

use polars::prelude::{BooleanChunked, DataFrame, DataType, NewChunkedArray};
use tracing::{debug, info};

use mimic_common::{column_names, string_list_series};

use crate::error::Result;
use crate::normalization::normalize_column_types;

/// Prefix shared by the per-line report columns.
pub const REPORT_PREFIX: &str = "report";

/// Name of the flattened report column.
pub const FULL_REPORT_COLUMN: &str = "full_report";

/// Machine messages that mark a report as unusable.
pub const DEFAULT_INVALID_PHRASES: [&str; 2] =
    ["Uncertain rhythm: review", "All 12 leads are missing"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// A record is dropped when one of its lines equals one of these.
    pub invalid_phrases: Vec<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            invalid_phrases: DEFAULT_INVALID_PHRASES
                .iter()
                .map(|phrase| (*phrase).to_string())
                .collect(),
        }
    }
}

impl ReportOptions {
    pub fn with_invalid_phrases(phrases: Vec<String>) -> Self {
        Self {
            invalid_phrases: phrases,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub input_records: usize,
    pub kept_records: usize,
    pub dropped_records: usize,
    pub report_columns: usize,
}

/// Flattened report table plus what happened to it.
#[derive(Debug, Clone)]
pub struct FlattenedReports {
    pub data: DataFrame,
    pub stats: ReportStats,
}

/// Per-line report columns, in frame order.
pub fn report_columns(df: &DataFrame) -> Vec<String> {
    column_names(df)
        .into_iter()
        .filter(|name| name.starts_with(REPORT_PREFIX))
        .collect()
}

/// Trim each line and drop null or blank ones, keeping order.
pub fn flatten_report_lines<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    lines
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when any line is exactly one of the invalid phrases.
pub fn contains_invalid_phrase(lines: &[String], phrases: &[String]) -> bool {
    lines
        .iter()
        .any(|line| phrases.iter().any(|phrase| phrase == line))
}

/// Normalize types, gather the report lines into `full_report`, drop the
/// line columns and discard records carrying an invalid machine phrase.
pub fn flatten_reports(df: &DataFrame, options: &ReportOptions) -> Result<FlattenedReports> {
    let df = normalize_column_types(df)?;
    let line_columns = report_columns(&df);
    let height = df.height();

    let mut texts = Vec::with_capacity(line_columns.len());
    for name in &line_columns {
        texts.push(df.column(name)?.cast(&DataType::String)?);
    }
    let mut chunks = Vec::with_capacity(texts.len());
    for text in &texts {
        chunks.push(text.str()?);
    }

    let mut reports: Vec<Option<Vec<Option<String>>>> = Vec::with_capacity(height);
    let mut keep: Vec<bool> = Vec::with_capacity(height);
    for idx in 0..height {
        let lines = flatten_report_lines(chunks.iter().map(|chunk| chunk.get(idx)));
        keep.push(!contains_invalid_phrase(&lines, &options.invalid_phrases));
        reports.push(Some(lines.into_iter().map(Some).collect()));
    }

    let mut out = df.clone();
    for name in &line_columns {
        out = out.drop(name)?;
    }
    out.with_column(string_list_series(FULL_REPORT_COLUMN, reports)?)?;

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let out = out.filter(&mask)?;

    let stats = ReportStats {
        input_records: height,
        kept_records: out.height(),
        dropped_records: height - out.height(),
        report_columns: line_columns.len(),
    };
    debug!(columns = ?line_columns, "flattened report columns");
    info!(
        input = stats.input_records,
        kept = stats.kept_records,
        dropped = stats.dropped_records,
        "filtered ECG reports"
    );
    Ok(FlattenedReports { data: out, stats })
}
