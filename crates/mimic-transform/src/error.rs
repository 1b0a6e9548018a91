use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while reshaping source frames.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("column '{column}' cannot be renamed to '{target}': target already exists")]
    RenameConflict { column: String, target: String },
}

pub type Result<T> = std::result::Result<T, TransformError>;
