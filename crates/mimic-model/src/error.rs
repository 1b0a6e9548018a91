use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown DRG type: {0}")]
    UnknownDrgType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
