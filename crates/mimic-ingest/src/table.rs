//! Reading CSV and Parquet tables into Polars frames.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;
use tracing::debug;

use mimic_model::TableFormat;

use crate::error::{IngestError, Result};

/// Number of rows Polars looks at when inferring CSV column types.
const INFER_SCHEMA_ROWS: usize = 100;

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Column names from the header row, trimmed and without a BOM.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let file = open_file(path)?;
    let mut reader = ::csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers = reader.headers().map_err(|e| IngestError::CsvHeader {
        path: path.to_path_buf(),
        source: e,
    })?;
    let columns: Vec<String> = headers
        .iter()
        .map(|name| name.trim_matches('\u{feff}').trim().to_string())
        .collect();
    if columns.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(columns)
}

/// Read a CSV file; the listed columns are forced to strings when present.
pub fn read_csv_table(path: &Path, text_columns: &[&str]) -> Result<DataFrame> {
    let headers = read_csv_headers(path)?;
    let mut overwrite = Schema::with_capacity(text_columns.len());
    for column in text_columns {
        if headers.iter().any(|header| header == column) {
            overwrite.with_column((*column).into(), DataType::String);
        }
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_schema_overwrite(Some(Arc::new(overwrite)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read CSV");
    Ok(df)
}

/// Read a Parquet file.
pub fn read_parquet_table(path: &Path) -> Result<DataFrame> {
    let file = open_file(path)?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| IngestError::ParquetRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read Parquet");
    Ok(df)
}

/// Read a table, choosing the reader from the file extension.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    read_table_with_text(path, &[])
}

pub(crate) fn read_table_with_text(path: &Path, text_columns: &[&str]) -> Result<DataFrame> {
    match TableFormat::from_path(path) {
        Some(TableFormat::Csv) => read_csv_table(path, text_columns),
        Some(TableFormat::Parquet) => read_parquet_table(path),
        None => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
