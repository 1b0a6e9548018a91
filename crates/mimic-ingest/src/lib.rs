//! Extract ingestion for the flattening pipelines.
//!
//! # Features
//!
//! - **Configuration**: JSON pipeline configs with typed errors
//! - **Tables**: CSV (Polars reader, `csv` header inspection) and Parquet
//! - **Sources**: per-source preprocessing and required-column checks
//! - **Records**: conversion of preprocessed frames into typed records
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use mimic_ingest::{load_static_config, load_static_inputs};
//!
//! let config = load_static_config(Path::new("configs/static_preprocessing.json"))?;
//! let inputs = load_static_inputs(&config)?;
//! println!("{} admissions", inputs.admissions.len());
//! ```

mod config;
mod error;
mod records;
mod source;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Configuration ===
pub use config::{
    DEFAULT_STATIC_CONFIG, DEFAULT_TEMPORAL_CONFIG, load_static_config, load_temporal_config,
};

// === Table Reading ===
pub use table::{read_csv_headers, read_csv_table, read_parquet_table, read_table};

// === Sources ===
pub use source::{LoadedSource, check_schema, load_report_source, load_source, load_static_inputs};

// === Typed Records ===
pub use records::{
    admissions_from_frame, diagnoses_from_frame, drg_from_frame, ecg_records_from_frame,
    ed_stays_from_frame, icu_stays_from_frame, patients_from_frame,
};
