//! The static pipeline from typed inputs to the finished master table.

use std::time::Instant;

use tracing::{info, info_span};

use mimic_model::{MasterTable, StaticInputs};

use crate::error::Result;
use crate::interval::{MatchStats, assign_ecgs};
use crate::merge::{MergeStats, build_master_table};

/// Master table plus the statistics of each stage.
#[derive(Debug, Clone)]
pub struct StaticOutcome {
    pub table: MasterTable,
    pub merge: MergeStats,
    pub matching: MatchStats,
}

/// Merge every source into the master table and assign ECGs.
pub fn run_static_pipeline(inputs: &StaticInputs) -> Result<StaticOutcome> {
    let (table, merge) = {
        let span = info_span!("merge");
        let _guard = span.enter();
        let start = Instant::now();
        let (table, merge) = build_master_table(inputs)?;
        info!(
            rows = merge.rows,
            admissions = merge.admissions,
            ed_only = merge.ed_only,
            ed_attached = merge.ed_attached,
            duration_ms = start.elapsed().as_millis(),
            "built master table"
        );
        (table, merge)
    };

    let (table, matching) = {
        let span = info_span!("match_ecgs", ecgs = inputs.ecg_records.len());
        let _guard = span.enter();
        let start = Instant::now();
        let (table, matching) = assign_ecgs(table, &inputs.ecg_records);
        info!(
            matched = matching.matched,
            unmatched = matching.unmatched,
            without_time = matching.without_time,
            duration_ms = start.elapsed().as_millis(),
            "assigned ECGs to visits"
        );
        (table, matching)
    };

    Ok(StaticOutcome {
        table,
        merge,
        matching,
    })
}
