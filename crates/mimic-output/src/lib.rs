//! Output generation for the flattened tables.
//!
//! - **frame**: the master table as a Polars frame
//! - **writer**: Parquet and CSV writers

pub mod error;
pub mod frame;
pub mod writer;

pub use error::{OutputError, Result};
pub use frame::build_master_frame;
pub use writer::{ensure_parent_dir, lists_as_json, write_table};
