//! Error types for extract ingestion.

use std::path::PathBuf;

use mimic_transform::TransformError;
use thiserror::Error;

/// Errors that can occur while loading configuration or source extracts.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Configuration Errors ===
    /// Configuration file does not exist.
    #[error("configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file exists but could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid JSON for the expected shape.
    #[error("invalid configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration has no path for this source.
    #[error("no path configured for the {table} extract")]
    SourceNotConfigured { table: &'static str },

    // === File System Errors ===
    /// Source table not found.
    #[error("table not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read a table.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension is neither CSV nor Parquet.
    #[error("unsupported table format: {path}")]
    UnsupportedFormat { path: PathBuf },

    // === Parsing Errors ===
    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Failed to read the CSV header with the csv reader.
    #[error("failed to read CSV header of {path}: {source}")]
    CsvHeader {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to read a Parquet file.
    #[error("failed to read Parquet {path}: {message}")]
    ParquetRead { path: PathBuf, message: String },

    // === Schema Errors ===
    /// Required columns absent after preprocessing.
    #[error("{table} extract {path} is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        table: &'static str,
        path: PathBuf,
        columns: Vec<String>,
    },

    // === Frame Errors ===
    /// Preprocessing of a source frame failed.
    #[error("failed to preprocess {table} extract: {source}")]
    Preprocess {
        table: &'static str,
        #[source]
        source: TransformError,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
