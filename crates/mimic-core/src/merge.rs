//! Master table assembly.
//!
//! The merge runs in a fixed order over pre-aggregated inputs:
//!
//! 1. admissions joined to patients (every admission needs its patient)
//! 2. `death_time` reconciled from `deathtime` and `dod`
//! 3. hospital diagnosis lists
//! 4. DRG summary
//! 5. ICU lists, empty for admissions without ICU care
//! 6. ED stays, full outer: unmatched stays become their own rows
//! 7. ED diagnosis lists
//!
//! Admission rows come first in source order, followed by standalone ED
//! rows in source order.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use mimic_model::{
    Demographics, DiagnosisList, EdStay, EdVisit, HospitalVisit, MasterRow, MasterTable, Patient,
    StaticInputs,
};

use crate::aggregate::{GroupKey, aggregate_diagnoses, aggregate_icu_stays, flatten_drg};
use crate::error::{MergeError, Result};

/// Counts describing how the master table was assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub admissions: usize,
    pub ed_stays: usize,
    /// ED stays attached to an admission row.
    pub ed_attached: usize,
    /// ED stays emitted as their own rows.
    pub ed_only: usize,
    /// ED stays that shared an admission with an earlier stay.
    pub ed_detached: usize,
    pub rows: usize,
}

/// Build the master table; ECG lists are left empty for the matcher.
pub fn build_master_table(inputs: &StaticInputs) -> Result<(MasterTable, MergeStats)> {
    let patients = index_patients(&inputs.patients)?;
    check_unique_admissions(inputs)?;

    let mut hosp_diagnoses = aggregate_diagnoses(&inputs.hosp_diagnoses);
    let mut drg = flatten_drg(&inputs.drg_codes);
    let mut icu = aggregate_icu_stays(&inputs.icu_stays);
    let mut ed_diagnoses = aggregate_diagnoses(&inputs.ed_diagnoses);
    let (mut attached, mut standalone, ed_detached) = partition_ed_stays(inputs);

    let mut rows = Vec::with_capacity(inputs.admissions.len() + standalone.len());
    let mut ed_attached = 0usize;

    for admission in &inputs.admissions {
        let key = (admission.subject_id, admission.hadm_id);
        let patient = patients
            .get(&admission.subject_id)
            .ok_or(MergeError::OrphanAdmission {
                subject_id: admission.subject_id,
                hadm_id: admission.hadm_id,
            })?;

        let death_time = admission.deathtime.or(patient.dod);
        let mut admission = admission.clone();
        admission.deathtime = None;

        let hospital = HospitalVisit {
            admission,
            demographics: Demographics {
                gender: patient.gender.clone(),
                anchor_age: patient.anchor_age,
            },
            death_time,
            diagnoses: hosp_diagnoses.remove(&key),
            drg: drg.remove(&key),
            icu: icu.remove(&key).unwrap_or_default(),
        };

        let ed = attached
            .remove(&key)
            .map(|(_, stay)| ed_visit(stay, &mut ed_diagnoses));
        if ed.is_some() {
            ed_attached += 1;
        }

        rows.push(MasterRow {
            subject_id: key.0,
            hadm_id: Some(key.1),
            hospital: Some(hospital),
            ed,
            ecg_study_ids: Vec::new(),
        });
    }

    // Stays naming an admission that does not exist stay standalone too.
    standalone.extend(attached.into_values());
    standalone.sort_by_key(|(position, _)| *position);
    let ed_only = standalone.len();
    for (_, stay) in standalone {
        rows.push(MasterRow {
            subject_id: stay.subject_id,
            hadm_id: stay.hadm_id,
            hospital: None,
            ed: Some(ed_visit(stay, &mut ed_diagnoses)),
            ecg_study_ids: Vec::new(),
        });
    }

    log_unused("hospital diagnosis", hosp_diagnoses.len());
    log_unused("DRG", drg.len());
    log_unused("ICU", icu.len());
    log_unused("ED diagnosis", ed_diagnoses.len());

    let stats = MergeStats {
        admissions: inputs.admissions.len(),
        ed_stays: inputs.ed_stays.len(),
        ed_attached,
        ed_only,
        ed_detached,
        rows: rows.len(),
    };
    let table = MasterTable {
        rows,
        icu_fields: inputs.icu_fields.clone(),
    };
    Ok((table, stats))
}

fn index_patients(patients: &[Patient]) -> Result<BTreeMap<i64, &Patient>> {
    let mut index = BTreeMap::new();
    for patient in patients {
        if index.insert(patient.subject_id, patient).is_some() {
            return Err(MergeError::DuplicateKey {
                table: "patients",
                key: patient.subject_id.to_string(),
            });
        }
    }
    Ok(index)
}

fn check_unique_admissions(inputs: &StaticInputs) -> Result<()> {
    let mut seen = BTreeSet::new();
    for admission in &inputs.admissions {
        if !seen.insert((admission.subject_id, admission.hadm_id)) {
            return Err(MergeError::DuplicateKey {
                table: "admissions",
                key: format!("{}/{}", admission.subject_id, admission.hadm_id),
            });
        }
    }
    Ok(())
}

type Positioned = (usize, EdStay);

/// Split ED stays into one candidate per admission key and standalone stays.
///
/// When several stays name the same admission the earliest (by `ed_intime`,
/// then stay id) is kept for the admission and the rest become standalone.
fn partition_ed_stays(
    inputs: &StaticInputs,
) -> (BTreeMap<GroupKey, Positioned>, Vec<Positioned>, usize) {
    let mut by_admission: BTreeMap<GroupKey, Positioned> = BTreeMap::new();
    let mut standalone: Vec<Positioned> = Vec::new();
    let mut detached = 0usize;

    for (position, stay) in inputs.ed_stays.iter().enumerate() {
        let Some(hadm_id) = stay.hadm_id else {
            standalone.push((position, stay.clone()));
            continue;
        };
        match by_admission.entry((stay.subject_id, hadm_id)) {
            Entry::Vacant(entry) => {
                entry.insert((position, stay.clone()));
            }
            Entry::Occupied(mut entry) => {
                detached += 1;
                warn!(
                    subject_id = stay.subject_id,
                    hadm_id,
                    ed_stay_id = stay.ed_stay_id,
                    "admission has several ED stays; keeping the earliest attached"
                );
                if ed_order(stay) < ed_order(&entry.get().1) {
                    let previous = entry.insert((position, stay.clone()));
                    standalone.push(previous);
                } else {
                    standalone.push((position, stay.clone()));
                }
            }
        }
    }

    (by_admission, standalone, detached)
}

fn ed_order(stay: &EdStay) -> (bool, Option<NaiveDateTime>, i64) {
    (stay.intime.is_none(), stay.intime, stay.ed_stay_id)
}

fn ed_visit(stay: EdStay, diagnoses: &mut BTreeMap<GroupKey, DiagnosisList>) -> EdVisit {
    let diagnoses = diagnoses.remove(&(stay.subject_id, stay.ed_stay_id));
    EdVisit { stay, diagnoses }
}

fn log_unused(what: &'static str, groups: usize) {
    if groups > 0 {
        debug!(source = what, groups, "aggregates without a matching row");
    }
}
