//! Pre-aggregation of the one-to-many sources.
//!
//! Every aggregate is keyed by `(subject_id, group id)` and holds exactly one
//! value per key, so joining it onto the admissions never fans out.

use std::collections::BTreeMap;

use tracing::debug;

use mimic_model::{
    AprDrg, DiagnosisList, DiagnosisRecord, DrgRecord, DrgSummary, DrgType, HcfaDrg, IcuStay,
    IcuSummary,
};

/// `(subject_id, hadm_id)` or `(subject_id, ed_stay_id)`.
pub type GroupKey = (i64, i64);

/// Which diagnosis extract a list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisSource {
    Hospital,
    Ed,
}

impl DiagnosisSource {
    pub fn codes_column(self) -> &'static str {
        match self {
            Self::Hospital => "hosp_icd_codes_diagnosis",
            Self::Ed => "ed_icd_codes_diagnosis",
        }
    }

    pub fn titles_column(self) -> &'static str {
        match self {
            Self::Hospital => "hosp_diagnosis",
            Self::Ed => "ed_diagnosis",
        }
    }
}

/// Collect codes and titles per group, ordered by `seq_num`.
///
/// The sort is stable, so repeated `seq_num` values keep source order.
pub fn aggregate_diagnoses(records: &[DiagnosisRecord]) -> BTreeMap<GroupKey, DiagnosisList> {
    let mut sorted: Vec<&DiagnosisRecord> = records.iter().collect();
    sorted.sort_by_key(|record| (record.subject_id, record.group_id, record.seq_num));

    let mut groups: BTreeMap<GroupKey, DiagnosisList> = BTreeMap::new();
    for record in sorted {
        groups
            .entry((record.subject_id, record.group_id))
            .or_default()
            .push(record.icd_code.clone(), record.title.clone());
    }
    groups
}

/// Pivot long-format DRG rows into one summary per admission.
///
/// The first row of each (admission, type) wins.
pub fn flatten_drg(records: &[DrgRecord]) -> BTreeMap<GroupKey, DrgSummary> {
    let mut summaries: BTreeMap<GroupKey, DrgSummary> = BTreeMap::new();
    let mut duplicates = 0usize;
    for record in records {
        let summary = summaries
            .entry((record.subject_id, record.hadm_id))
            .or_default();
        match record.drg_type {
            DrgType::Apr if summary.apr.is_none() => {
                summary.apr = Some(AprDrg {
                    drg_code: record.drg_code.clone(),
                    description: record.description.clone(),
                    drg_severity: record.drg_severity,
                    drg_mortality: record.drg_mortality,
                });
            }
            DrgType::Hcfa if summary.hcfa.is_none() => {
                summary.hcfa = Some(HcfaDrg {
                    drg_code: record.drg_code.clone(),
                    description: record.description.clone(),
                });
            }
            _ => duplicates += 1,
        }
    }
    if duplicates > 0 {
        debug!(rows = duplicates, "ignored repeated DRG rows");
    }
    summaries
}

/// Per-admission ICU lists in source row order.
///
/// Admissions without ICU stays are absent from the result.
pub fn aggregate_icu_stays(stays: &[IcuStay]) -> BTreeMap<GroupKey, IcuSummary> {
    let mut summaries: BTreeMap<GroupKey, IcuSummary> = BTreeMap::new();
    for stay in stays {
        let summary = summaries.entry((stay.subject_id, stay.hadm_id)).or_default();
        summary.stay_ids.push(stay.stay_id);
        summary.first_careunits.push(stay.first_careunit.clone());
        summary.last_careunits.push(stay.last_careunit.clone());
        summary.los.push(stay.los);
    }
    summaries
}
