//! Typed inputs of the static pipeline.

use crate::master::IcuField;
use crate::records::{Admission, DiagnosisRecord, DrgRecord, EcgRecord, EdStay, IcuStay, Patient};

/// Every static extract, loaded and converted to typed records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticInputs {
    pub patients: Vec<Patient>,
    pub admissions: Vec<Admission>,
    pub hosp_diagnoses: Vec<DiagnosisRecord>,
    pub drg_codes: Vec<DrgRecord>,
    pub icu_stays: Vec<IcuStay>,
    /// ICU columns present in the extract; only these become list columns.
    pub icu_fields: Vec<IcuField>,
    pub ed_stays: Vec<EdStay>,
    pub ed_diagnoses: Vec<DiagnosisRecord>,
    pub ecg_records: Vec<EcgRecord>,
}
