//! Merge engine of the static pipeline.
//!
//! - **aggregate**: per-key diagnosis, DRG and ICU aggregates
//! - **merge**: master table assembly and ED reconciliation
//! - **interval**: ECG-to-visit matching by smallest enclosing window
//! - **pipeline**: the stages in order, with timing spans

pub mod aggregate;
pub mod error;
pub mod interval;
pub mod merge;
pub mod pipeline;

pub use aggregate::{
    DiagnosisSource, GroupKey, aggregate_diagnoses, aggregate_icu_stays, flatten_drg,
};
pub use error::{MergeError, Result};
pub use interval::{MatchStats, assign_ecgs, enclosing_size};
pub use merge::{MergeStats, build_master_table};
pub use pipeline::{StaticOutcome, run_static_pipeline};
