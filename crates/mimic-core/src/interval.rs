//! ECG-to-stay interval matching.
//!
//! An ECG belongs to the tightest visit of the same patient that encloses
//! its acquisition time. A row encloses the ECG when its hospital window or
//! its ED window contains the time (both bounds inclusive); the row's size
//! for that ECG is the shorter of the enclosing windows.
//!
//! Candidates from all rows are reconciled globally: sorted by
//! `(study_id, size)` and reduced to the first per study. Ties on size keep
//! the earlier row. Each study therefore lands in at most one row.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

use mimic_model::{EcgRecord, MasterRow, MasterTable};

/// Outcome of the matching pass, counted per distinct study.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub studies: usize,
    pub matched: usize,
    /// Studies with a time that no visit encloses.
    pub unmatched: usize,
    /// Studies without an acquisition time; never matched.
    pub without_time: usize,
    /// Enclosing (study, row) pairs considered before reconciliation.
    pub candidates: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    study_id: i64,
    size: TimeDelta,
    row: usize,
}

/// Size of the smallest window of `row` enclosing `at`, if any does.
pub fn enclosing_size(row: &MasterRow, at: NaiveDateTime) -> Option<TimeDelta> {
    [row.hospital_window(), row.ed_window()]
        .into_iter()
        .flatten()
        .filter(|window| window.contains(at))
        .map(|window| window.duration())
        .min()
}

/// Assign every timed ECG to its tightest enclosing row.
///
/// Returns the table with `ecg_study_ids` filled (ascending per row).
pub fn assign_ecgs(table: MasterTable, ecgs: &[EcgRecord]) -> (MasterTable, MatchStats) {
    let mut table = table;
    let mut rows_by_subject: HashMap<i64, Vec<usize>> = HashMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        rows_by_subject.entry(row.subject_id).or_default().push(idx);
    }

    let mut stats = MatchStats::default();
    let mut timed = BTreeSet::new();
    let mut untimed = BTreeSet::new();
    let mut candidates = Vec::new();

    for ecg in ecgs {
        let Some(at) = ecg.ecg_time else {
            untimed.insert(ecg.study_id);
            continue;
        };
        timed.insert(ecg.study_id);
        let Some(rows) = rows_by_subject.get(&ecg.subject_id) else {
            continue;
        };
        for &row in rows {
            if let Some(size) = enclosing_size(&table.rows[row], at) {
                candidates.push(Candidate {
                    study_id: ecg.study_id,
                    size,
                    row,
                });
            }
        }
    }
    stats.candidates = candidates.len();

    candidates.sort_by_key(|candidate| (candidate.study_id, candidate.size));
    let mut winners: BTreeMap<i64, usize> = BTreeMap::new();
    for candidate in candidates {
        winners.entry(candidate.study_id).or_insert(candidate.row);
    }

    for row in &mut table.rows {
        row.ecg_study_ids.clear();
    }
    // BTreeMap iteration is ascending by study, so each row's list is sorted.
    for (study_id, row) in &winners {
        table.rows[*row].ecg_study_ids.push(*study_id);
    }

    stats.matched = winners.len();
    stats.without_time = untimed.difference(&timed).count();
    stats.studies = timed.union(&untimed).count();
    stats.unmatched = timed.len() - stats.matched;
    debug!(
        candidates = stats.candidates,
        matched = stats.matched,
        unmatched = stats.unmatched,
        without_time = stats.without_time,
        "reconciled ECG candidates"
    );
    (table, stats)
}
