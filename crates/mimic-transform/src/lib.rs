//! Frame-level transformations shared by both pipelines.
//!
//! - **normalization**: name-driven column type coercion
//! - **preprocess**: per-source drops and renames
//! - **reports**: ECG report line flattening and filtering

pub mod error;
pub mod normalization;
pub mod preprocess;
pub mod reports;

pub use error::{Result, TransformError};
pub use normalization::{ColumnKind, classify_column, normalize_column_types};
pub use preprocess::preprocess_source;
pub use reports::{
    DEFAULT_INVALID_PHRASES, FULL_REPORT_COLUMN, FlattenedReports, REPORT_PREFIX, ReportOptions,
    ReportStats, flatten_reports,
};
