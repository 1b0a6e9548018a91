//! Shared utilities for the MIMIC flattening crates.
//!
//! This crate provides common utilities used across the workspace,
//! including Polars `AnyValue` conversions and timestamp parsing.

pub mod frame;
pub mod polars;
pub mod time;

// Re-export commonly used functions at crate root for convenience
pub use frame::{
    any_to_string_list, column_names, f64_list_series, has_column, i64_list_series,
    string_list_series,
};
pub use polars::{
    any_to_f64, any_to_i64, any_to_string, any_to_string_non_empty, format_numeric, parse_f64,
    parse_i64,
};
pub use time::{any_to_datetime, format_timestamp, parse_timestamp, timestamp_from_unit};
