//! Conversion of preprocessed frames into typed records.
//!
//! Rows whose identifier cells are null or non-numeric cannot be joined and
//! are skipped with a warning. All other cells fail soft to `None`. Text
//! cells keep `""` distinct from null.

use chrono::NaiveDateTime;
use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::{debug, warn};

use mimic_common::{
    any_to_datetime, any_to_f64, any_to_i64, any_to_string, any_to_string_non_empty,
};
use mimic_model::{
    Admission, DiagnosisRecord, DrgRecord, DrgType, EcgRecord, EdStay, IcuStay, Patient,
};

/// Column accessor tolerant of optional columns.
struct Cells<'a> {
    df: &'a DataFrame,
}

impl<'a> Cells<'a> {
    fn new(df: &'a DataFrame) -> Self {
        Self { df }
    }

    fn column(&self, name: &str) -> Option<&'a Column> {
        self.df.column(name).ok()
    }

    fn value(&self, name: &str, idx: usize) -> AnyValue<'a> {
        self.column(name)
            .and_then(|column| column.get(idx).ok())
            .unwrap_or(AnyValue::Null)
    }

    fn int(&self, name: &str, idx: usize) -> Option<i64> {
        any_to_i64(self.value(name, idx))
    }

    fn float(&self, name: &str, idx: usize) -> Option<f64> {
        any_to_f64(self.value(name, idx))
    }

    fn text(&self, name: &str, idx: usize) -> Option<String> {
        match self.value(name, idx) {
            AnyValue::Null => None,
            value => Some(any_to_string(value)),
        }
    }

    /// Text where a blank cell means absent.
    fn label(&self, name: &str, idx: usize) -> Option<String> {
        any_to_string_non_empty(self.value(name, idx))
    }

    fn time(&self, name: &str, idx: usize) -> Option<NaiveDateTime> {
        any_to_datetime(self.value(name, idx))
    }
}

fn report_skipped(table: &'static str, skipped: usize) {
    if skipped > 0 {
        warn!(table, skipped, "skipped rows with missing identifiers");
    }
}

pub fn patients_from_frame(df: &DataFrame) -> Vec<Patient> {
    let cells = Cells::new(df);
    let mut out = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let Some(subject_id) = cells.int("subject_id", idx) else {
            skipped += 1;
            continue;
        };
        out.push(Patient {
            subject_id,
            gender: cells.text("gender", idx),
            anchor_age: cells.int("anchor_age", idx),
            dod: cells.time("dod", idx),
        });
    }
    report_skipped("patients", skipped);
    out
}

pub fn admissions_from_frame(df: &DataFrame) -> Vec<Admission> {
    let cells = Cells::new(df);
    let mut out = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let (Some(subject_id), Some(hadm_id)) =
            (cells.int("subject_id", idx), cells.int("hadm_id", idx))
        else {
            skipped += 1;
            continue;
        };
        out.push(Admission {
            subject_id,
            hadm_id,
            admittime: cells.time("hosp_admittime", idx),
            dischtime: cells.time("hosp_dischtime", idx),
            deathtime: cells.time("deathtime", idx),
            admission_type: cells.text("admission_type", idx),
            admit_provider_id: cells.text("admit_provider_id", idx),
            discharge_location: cells.text("discharge_location", idx),
            race: cells.text("race", idx),
            edregtime: cells.time("edregtime", idx),
            edouttime: cells.time("edouttime", idx),
        });
    }
    report_skipped("admissions", skipped);
    out
}

/// Diagnosis lines grouped by `group_column` (`hadm_id` or `ed_stay_id`).
pub fn diagnoses_from_frame(df: &DataFrame, group_column: &str) -> Vec<DiagnosisRecord> {
    let cells = Cells::new(df);
    let mut out = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let (Some(subject_id), Some(group_id), Some(seq_num)) = (
            cells.int("subject_id", idx),
            cells.int(group_column, idx),
            cells.int("seq_num", idx),
        ) else {
            skipped += 1;
            continue;
        };
        out.push(DiagnosisRecord {
            subject_id,
            group_id,
            seq_num,
            icd_code: cells.text("icd_code", idx),
            title: cells.text("title", idx),
        });
    }
    report_skipped("diagnoses", skipped);
    out
}

/// DRG rows; rows with an unrecognized `drg_type` are skipped.
pub fn drg_from_frame(df: &DataFrame) -> Vec<DrgRecord> {
    let cells = Cells::new(df);
    let mut out = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    let mut unknown_types = 0usize;
    for idx in 0..df.height() {
        let (Some(subject_id), Some(hadm_id)) =
            (cells.int("subject_id", idx), cells.int("hadm_id", idx))
        else {
            skipped += 1;
            continue;
        };
        let raw_type = cells.label("drg_type", idx).unwrap_or_default();
        let drg_type = match DrgType::parse(&raw_type) {
            Ok(drg_type) => drg_type,
            Err(err) => {
                debug!(hadm_id, error = %err, "skipping DRG row");
                unknown_types += 1;
                continue;
            }
        };
        out.push(DrgRecord {
            subject_id,
            hadm_id,
            drg_type,
            drg_code: cells.text("drg_code", idx),
            description: cells.text("description", idx),
            drg_severity: cells.int("drg_severity", idx),
            drg_mortality: cells.int("drg_mortality", idx),
        });
    }
    report_skipped("drgcodes", skipped);
    if unknown_types > 0 {
        debug!(rows = unknown_types, "skipped DRG rows with unknown type");
    }
    out
}

pub fn icu_stays_from_frame(df: &DataFrame) -> Vec<IcuStay> {
    let cells = Cells::new(df);
    let mut out = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let (Some(subject_id), Some(hadm_id), Some(stay_id)) = (
            cells.int("subject_id", idx),
            cells.int("hadm_id", idx),
            cells.int("stay_id", idx),
        ) else {
            skipped += 1;
            continue;
        };
        out.push(IcuStay {
            subject_id,
            hadm_id,
            stay_id,
            first_careunit: cells.text("first_careunit", idx),
            last_careunit: cells.text("last_careunit", idx),
            los: cells.float("los", idx),
        });
    }
    report_skipped("icustays", skipped);
    out
}

pub fn ed_stays_from_frame(df: &DataFrame) -> Vec<EdStay> {
    let cells = Cells::new(df);
    let mut out = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let (Some(subject_id), Some(ed_stay_id)) =
            (cells.int("subject_id", idx), cells.int("ed_stay_id", idx))
        else {
            skipped += 1;
            continue;
        };
        out.push(EdStay {
            subject_id,
            hadm_id: cells.int("hadm_id", idx),
            ed_stay_id,
            intime: cells.time("ed_intime", idx),
            outtime: cells.time("ed_outtime", idx),
            arrival_transport: cells.text("ed_arrival_transport", idx),
            disposition: cells.text("ed_disposition", idx),
        });
    }
    report_skipped("edstays", skipped);
    out
}

pub fn ecg_records_from_frame(df: &DataFrame) -> Vec<EcgRecord> {
    let cells = Cells::new(df);
    let mut out = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let (Some(subject_id), Some(study_id)) =
            (cells.int("subject_id", idx), cells.int("study_id", idx))
        else {
            skipped += 1;
            continue;
        };
        out.push(EcgRecord {
            subject_id,
            study_id,
            ecg_time: cells.time("ecg_time", idx),
        });
    }
    report_skipped("record_list", skipped);
    out
}
