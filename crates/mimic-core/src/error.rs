use thiserror::Error;

/// Join-integrity violations found while building the master table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    /// An admission references a patient that is not in the patient extract.
    #[error("admission {hadm_id} references unknown patient {subject_id}")]
    OrphanAdmission { subject_id: i64, hadm_id: i64 },

    /// A key that must be unique occurs more than once.
    #[error("duplicate {table} key {key}")]
    DuplicateKey { table: &'static str, key: String },
}

pub type Result<T> = std::result::Result<T, MergeError>;
