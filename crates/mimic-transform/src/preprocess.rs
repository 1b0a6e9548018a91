//! Source-specific cleanup applied before any merge.

use polars::prelude::DataFrame;
use tracing::debug;

use mimic_common::has_column;
use mimic_model::SourceSchema;

use crate::error::{Result, TransformError};
use crate::normalization::normalize_column_types;

/// Drop the columns a source never contributes, apply its renames, then
/// normalize column types.
///
/// Drop and rename entries whose column is absent are skipped, so the same
/// schema serves extracts with and without optional columns.
pub fn preprocess_source(df: &DataFrame, schema: &SourceSchema) -> Result<DataFrame> {
    let mut out = df.clone();

    for column in schema.drop {
        if has_column(&out, column) {
            out = out.drop(column)?;
            debug!(source = ?schema.kind, column, "dropped column");
        }
    }

    for (from, to) in schema.rename {
        if !has_column(&out, from) {
            continue;
        }
        if has_column(&out, to) {
            return Err(TransformError::RenameConflict {
                column: (*from).to_string(),
                target: (*to).to_string(),
            });
        }
        out.rename(from, (*to).into())?;
        debug!(source = ?schema.kind, from, to, "renamed column");
    }

    normalize_column_types(&out)
}
