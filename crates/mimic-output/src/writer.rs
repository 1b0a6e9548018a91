//! Table writers.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use polars::prelude::{
    AnyValue, Column, CsvWriter, DataFrame, DataType, IntoColumn, NamedFrom, ParquetWriter,
    SerWriter, Series,
};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::info;

use mimic_common::any_to_string;
use mimic_model::TableFormat;

use crate::error::{OutputError, Result};

/// Create the parent directory of `path` when it is missing.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn json_element(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(flag) => Value::Bool(flag),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => Value::from(f64::from(v)),
        AnyValue::Float64(v) => Value::from(v),
        other => Value::String(any_to_string(other)),
    }
}

/// Render a list column as JSON array text; null lists stay null.
fn list_to_json(column: &Column) -> Result<Column> {
    let mut values: Vec<Option<String>> = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::List(inner) => {
                let items: Vec<Value> = (0..inner.len())
                    .map(|i| json_element(inner.get(i).unwrap_or(AnyValue::Null)))
                    .collect();
                values.push(Some(serde_json::to_string(&items)?));
            }
            _ => values.push(None),
        }
    }
    Ok(Series::new(column.name().clone(), values).into_column())
}

/// Copy of `df` with every list column rendered as JSON text.
pub fn lists_as_json(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    for column in df.get_columns() {
        if matches!(column.dtype(), DataType::List(_)) {
            out.with_column(list_to_json(column)?)?;
        }
    }
    Ok(out)
}

/// Write `df` to `path`; the extension picks Parquet or CSV.
///
/// CSV cannot hold nested values, so list columns are written as JSON
/// arrays. The table is written to a temporary file next to `path` and
/// renamed into place once complete, so a failed write leaves any previous
/// file untouched.
pub fn write_table(df: &DataFrame, path: &Path) -> Result<TableFormat> {
    let format = TableFormat::from_path(path).ok_or_else(|| OutputError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    ensure_parent_dir(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(|source| OutputError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    let write_error = |message: String| OutputError::Write {
        path: path.to_path_buf(),
        message,
    };

    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        match format {
            TableFormat::Parquet => {
                let mut out = df.clone();
                ParquetWriter::new(&mut writer)
                    .finish(&mut out)
                    .map_err(|err| write_error(err.to_string()))?;
            }
            TableFormat::Csv => {
                let mut out = lists_as_json(df)?;
                CsvWriter::new(&mut writer)
                    .include_header(true)
                    .finish(&mut out)
                    .map_err(|err| write_error(err.to_string()))?;
            }
        }
        writer.flush().map_err(|err| write_error(err.to_string()))?;
    }
    staged.persist(path).map_err(|err| OutputError::Persist {
        path: path.to_path_buf(),
        source: err.error,
    })?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "wrote table"
    );
    Ok(format)
}
