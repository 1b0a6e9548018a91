//! DataFrame construction and inspection helpers shared by the stages.
//!
//! List-valued columns are built from owned Rust vectors; a `None` row
//! becomes a null list, `Some(vec![])` an empty one.

use polars::prelude::{AnyValue, DataFrame, DataType, NamedFrom, PolarsResult, Series};

use crate::polars::any_to_string;

/// Owned column names of a frame, in column order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// True when the frame has a column with this exact name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|column| column.as_str() == name)
}

fn list_series(name: &str, inner: DataType, rows: Vec<Option<Series>>) -> PolarsResult<Series> {
    let target = DataType::List(Box::new(inner));
    if rows.iter().all(Option::is_none) {
        return Ok(Series::full_null(name.into(), rows.len(), &target));
    }
    Series::new(name.into(), rows).cast(&target)
}

/// Build a `List(String)` column.
pub fn string_list_series(
    name: &str,
    rows: Vec<Option<Vec<Option<String>>>>,
) -> PolarsResult<Series> {
    let inner: Vec<Option<Series>> = rows
        .into_iter()
        .map(|row| row.map(|values| Series::new("".into(), values)))
        .collect();
    list_series(name, DataType::String, inner)
}

/// Build a `List(Int64)` column.
pub fn i64_list_series(name: &str, rows: Vec<Option<Vec<i64>>>) -> PolarsResult<Series> {
    let inner: Vec<Option<Series>> = rows
        .into_iter()
        .map(|row| row.map(|values| Series::new("".into(), values)))
        .collect();
    list_series(name, DataType::Int64, inner)
}

/// Build a `List(Float64)` column.
pub fn f64_list_series(
    name: &str,
    rows: Vec<Option<Vec<Option<f64>>>>,
) -> PolarsResult<Series> {
    let inner: Vec<Option<Series>> = rows
        .into_iter()
        .map(|row| row.map(|values| Series::new("".into(), values)))
        .collect();
    list_series(name, DataType::Float64, inner)
}

/// Read a list cell as text fragments; null elements stay `None`.
///
/// Returns `None` when the cell itself is not a list.
pub fn any_to_string_list(value: AnyValue<'_>) -> Option<Vec<Option<String>>> {
    let AnyValue::List(series) = value else {
        return None;
    };
    let mut values = Vec::with_capacity(series.len());
    for idx in 0..series.len() {
        let element = series.get(idx).unwrap_or(AnyValue::Null);
        if matches!(element, AnyValue::Null) {
            values.push(None);
        } else {
            values.push(Some(any_to_string(element)));
        }
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use polars::prelude::IntoColumn;

    use super::*;

    #[test]
    fn builds_string_lists_with_null_rows() {
        let series = string_list_series(
            "codes",
            vec![
                Some(vec![Some("I10".to_string()), None]),
                None,
                Some(Vec::new()),
            ],
        )
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.dtype(), &DataType::List(Box::new(DataType::String)));
        assert_eq!(
            any_to_string_list(series.get(0).unwrap()),
            Some(vec![Some("I10".to_string()), None])
        );
        assert_eq!(any_to_string_list(series.get(1).unwrap()), None);
        assert_eq!(any_to_string_list(series.get(2).unwrap()), Some(Vec::new()));
    }

    #[test]
    fn all_null_and_empty_inputs_keep_the_list_type() {
        let nulls = i64_list_series("ids", vec![None, None]).unwrap();
        assert_eq!(nulls.dtype(), &DataType::List(Box::new(DataType::Int64)));
        assert_eq!(nulls.null_count(), 2);

        let empty = f64_list_series("los", Vec::new()).unwrap();
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.dtype(), &DataType::List(Box::new(DataType::Float64)));
    }

    #[test]
    fn column_lookup_is_exact() {
        let df = DataFrame::new(vec![
            Series::new("subject_id".into(), vec![1i64]).into_column(),
        ])
        .unwrap();
        assert!(has_column(&df, "subject_id"));
        assert!(!has_column(&df, "SUBJECT_ID"));
        assert_eq!(column_names(&df), vec!["subject_id".to_string()]);
    }
}
