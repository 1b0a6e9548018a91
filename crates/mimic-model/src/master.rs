//! The denormalized master table.
//!
//! A [`MasterRow`] is one admission or one standalone ED visit. Every
//! optional relationship is an `Option`, so "no DRG coded" and "no ED visit"
//! are visible in the type rather than hidden in null columns.

use chrono::NaiveDateTime;

use crate::records::{Admission, EdStay, TimeWindow};

/// Index-aligned diagnosis codes and titles, ordered by `seq_num`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosisList {
    pub codes: Vec<Option<String>>,
    pub titles: Vec<Option<String>>,
}

impl DiagnosisList {
    pub fn push(&mut self, code: Option<String>, title: Option<String>) {
        self.codes.push(code);
        self.titles.push(title);
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Flattened APR-DRG fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AprDrg {
    pub drg_code: Option<String>,
    pub description: Option<String>,
    pub drg_severity: Option<i64>,
    pub drg_mortality: Option<i64>,
}

/// Flattened HCFA-DRG fields. HCFA carries no severity or mortality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HcfaDrg {
    pub drg_code: Option<String>,
    pub description: Option<String>,
}

/// One admission's DRG coding, one slot per scheme.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrgSummary {
    pub apr: Option<AprDrg>,
    pub hcfa: Option<HcfaDrg>,
}

/// ICU list columns that may be carried into the master table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IcuField {
    StayId,
    FirstCareunit,
    LastCareunit,
    Los,
}

impl IcuField {
    pub const ALL: [IcuField; 4] = [
        IcuField::StayId,
        IcuField::FirstCareunit,
        IcuField::LastCareunit,
        IcuField::Los,
    ];

    /// Column name in the ICU extract.
    pub fn source_column(self) -> &'static str {
        match self {
            Self::StayId => "stay_id",
            Self::FirstCareunit => "first_careunit",
            Self::LastCareunit => "last_careunit",
            Self::Los => "los",
        }
    }

    /// Column name in the master table.
    pub fn output_column(self) -> &'static str {
        match self {
            Self::StayId => "icu_stay_id",
            Self::FirstCareunit => "icu_first_careunit",
            Self::LastCareunit => "icu_last_careunit",
            Self::Los => "icu_los",
        }
    }
}

/// Parallel per-admission ICU lists, in source row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IcuSummary {
    pub stay_ids: Vec<i64>,
    pub first_careunits: Vec<Option<String>>,
    pub last_careunits: Vec<Option<String>>,
    pub los: Vec<Option<f64>>,
}

impl IcuSummary {
    /// Number of ICU stays; zero for an admission without ICU care.
    pub fn count(&self) -> usize {
        self.stay_ids.len()
    }
}

/// Patient attributes carried on every admission row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Demographics {
    pub gender: Option<String>,
    pub anchor_age: Option<i64>,
}

/// The hospital side of a master row.
#[derive(Debug, Clone, PartialEq)]
pub struct HospitalVisit {
    /// The admission with its `deathtime` already folded into `death_time`.
    pub admission: Admission,
    pub demographics: Demographics,
    pub death_time: Option<NaiveDateTime>,
    pub diagnoses: Option<DiagnosisList>,
    pub drg: Option<DrgSummary>,
    pub icu: IcuSummary,
}

/// The ED side of a master row.
#[derive(Debug, Clone, PartialEq)]
pub struct EdVisit {
    pub stay: EdStay,
    pub diagnoses: Option<DiagnosisList>,
}

/// One row of the master table.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterRow {
    pub subject_id: i64,
    /// Admission id; for a standalone ED visit, whatever the ED stay carries.
    pub hadm_id: Option<i64>,
    pub hospital: Option<HospitalVisit>,
    pub ed: Option<EdVisit>,
    /// ECG studies assigned to this visit. Never null, possibly empty.
    pub ecg_study_ids: Vec<i64>,
}

impl MasterRow {
    pub fn hospital_window(&self) -> Option<TimeWindow> {
        self.hospital.as_ref().and_then(|visit| visit.admission.window())
    }

    pub fn ed_window(&self) -> Option<TimeWindow> {
        self.ed.as_ref().and_then(|visit| visit.stay.window())
    }

    /// True for an ED visit that never became a hospital admission.
    pub fn is_ed_only(&self) -> bool {
        self.hospital.is_none()
    }
}

/// The merged table plus the ICU columns the source actually provided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterTable {
    pub rows: Vec<MasterRow>,
    pub icu_fields: Vec<IcuField>,
}

impl MasterTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ed_only_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_ed_only()).count()
    }
}
