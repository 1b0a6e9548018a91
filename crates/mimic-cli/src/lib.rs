//! Library side of the `mimic-flatten` binary.

pub mod logging;
pub mod pipeline;
pub mod types;
