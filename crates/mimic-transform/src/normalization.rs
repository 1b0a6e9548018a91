//! Column type normalization.
//!
//! Every extract goes through the same coercion before it is used:
//!
//! - columns whose name mentions `date`, `time` or `dod` become timestamps,
//!   with unparseable cells turned into nulls;
//! - text columns, including categoricals read from Parquet, become nullable
//!   strings, so null and `""` remain distinct;
//! - numeric and boolean columns are left alone.
//!
//! The coercion is idempotent: timestamp columns are skipped on a second pass.

use polars::prelude::{AnyValue, Column, DataFrame, DataType, NamedFrom, Series};
use tracing::debug;

use mimic_common::any_to_datetime;

use crate::error::Result;

const TIME_KEYWORDS: [&str; 3] = ["date", "time", "dod"];

/// Canonical type a column is normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Timestamp,
    Text,
    Passthrough,
}

/// True when the column name marks a timestamp column.
///
/// ```
/// use mimic_transform::normalization::is_time_column;
///
/// assert!(is_time_column("hosp_admittime"));
/// assert!(is_time_column("DOD"));
/// assert!(!is_time_column("subject_id"));
/// ```
pub fn is_time_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    TIME_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Decide how a column is normalized from its name and current type.
pub fn classify_column(name: &str, dtype: &DataType) -> ColumnKind {
    if is_time_column(name) {
        ColumnKind::Timestamp
    } else if matches!(
        dtype,
        DataType::String | DataType::Null | DataType::Categorical(..) | DataType::Enum(..)
    ) {
        ColumnKind::Text
    } else {
        ColumnKind::Passthrough
    }
}

/// Coerce every column of `df` to its canonical type.
pub fn normalize_column_types(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    for column in df.get_columns() {
        let name = column.name().to_string();
        match classify_column(&name, column.dtype()) {
            ColumnKind::Timestamp => {
                if matches!(column.dtype(), DataType::Datetime(_, _)) {
                    continue;
                }
                let (series, unparsed) = parse_timestamp_column(&name, column);
                if unparsed > 0 {
                    debug!(column = %name, unparsed, "coerced unparseable timestamps to null");
                }
                out.with_column(series)?;
            }
            ColumnKind::Text => {
                if column.dtype() != &DataType::String {
                    let text = column.cast(&DataType::String)?;
                    out.with_column(text)?;
                }
            }
            ColumnKind::Passthrough => {}
        }
    }
    Ok(out)
}

/// Parse a column cell by cell; returns the timestamp series and the number
/// of non-null cells that could not be parsed.
fn parse_timestamp_column(name: &str, column: &Column) -> (Series, usize) {
    let mut values = Vec::with_capacity(column.len());
    let mut unparsed = 0usize;
    for idx in 0..column.len() {
        let cell = column.get(idx).unwrap_or(AnyValue::Null);
        let was_null = matches!(cell, AnyValue::Null);
        let parsed = any_to_datetime(cell);
        if parsed.is_none() && !was_null {
            unparsed += 1;
        }
        values.push(parsed);
    }
    (Series::new(name.into(), values), unparsed)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use polars::prelude::{Categories, IntoColumn};

    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("subject_id".into(), vec![1i64, 2, 3]).into_column(),
            Series::new(
                "admittime".into(),
                vec![Some("2180-05-06 22:23:00"), Some("garbage"), None],
            )
            .into_column(),
            Series::new("race".into(), vec![Some("WHITE"), Some(""), None]).into_column(),
            Series::new("los".into(), vec![1.5f64, 2.0, 0.25]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn classifies_by_name_then_type() {
        assert_eq!(
            classify_column("ecg_time", &DataType::String),
            ColumnKind::Timestamp
        );
        assert_eq!(
            classify_column("chartDate", &DataType::Int64),
            ColumnKind::Timestamp
        );
        assert_eq!(classify_column("race", &DataType::String), ColumnKind::Text);
        assert_eq!(
            classify_column("los", &DataType::Float64),
            ColumnKind::Passthrough
        );
    }

    #[test]
    fn parses_time_columns_and_nulls_garbage() {
        let df = normalize_column_types(&sample()).unwrap();
        let admit = df.column("admittime").unwrap();
        assert!(matches!(admit.dtype(), DataType::Datetime(_, _)));
        assert_eq!(admit.null_count(), 2);
        let expected = NaiveDate::from_ymd_opt(2180, 5, 6)
            .unwrap()
            .and_hms_opt(22, 23, 0)
            .unwrap();
        assert_eq!(
            any_to_datetime(admit.get(0).unwrap()),
            Some(expected)
        );
    }

    #[test]
    fn keeps_empty_text_distinct_from_null() {
        let df = normalize_column_types(&sample()).unwrap();
        let race = df.column("race").unwrap().str().unwrap();
        assert_eq!(race.get(1), Some(""));
        assert_eq!(race.get(2), None);
    }

    #[test]
    fn categorical_text_becomes_string() {
        let race = Series::new("race".into(), vec![Some("WHITE"), Some(""), None])
            .cast(&DataType::from_categories(Categories::global()))
            .unwrap();
        assert_eq!(classify_column("race", race.dtype()), ColumnKind::Text);

        let df = normalize_column_types(&DataFrame::new(vec![race.into_column()]).unwrap())
            .unwrap();
        let race = df.column("race").unwrap();
        assert_eq!(race.dtype(), &DataType::String);
        let race = race.str().unwrap();
        assert_eq!(race.get(0), Some("WHITE"));
        assert_eq!(race.get(1), Some(""));
        assert_eq!(race.get(2), None);
    }

    #[test]
    fn numeric_columns_pass_through() {
        let df = normalize_column_types(&sample()).unwrap();
        assert_eq!(df.column("los").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("subject_id").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_column_types(&sample()).unwrap();
        let twice = normalize_column_types(&once).unwrap();
        assert!(once.equals_missing(&twice));
    }
}
