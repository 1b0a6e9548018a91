use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("keyword '{keyword}' does not compile: {source}")]
    Pattern {
        keyword: String,
        #[source]
        source: regex::Error,
    },

    #[error("source column '{0}' not found")]
    MissingColumn(String),

    #[error("failed to serialize ED entities: {0}")]
    Json(#[from] serde_json::Error),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, EntityError>;
