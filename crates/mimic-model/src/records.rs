//! Typed source records.
//!
//! One struct per raw extract, after per-source preprocessing. Identifier
//! columns are required and therefore plain integers; every other attribute
//! is optional because extracts routinely leave them blank.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Patient demographics, keyed by `subject_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub subject_id: i64,
    pub gender: Option<String>,
    pub anchor_age: Option<i64>,
    /// Patient-level date of death.
    pub dod: Option<NaiveDateTime>,
}

/// One hospital admission, keyed by (`subject_id`, `hadm_id`).
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    pub subject_id: i64,
    pub hadm_id: i64,
    pub admittime: Option<NaiveDateTime>,
    pub dischtime: Option<NaiveDateTime>,
    /// In-hospital death time.
    pub deathtime: Option<NaiveDateTime>,
    pub admission_type: Option<String>,
    pub admit_provider_id: Option<String>,
    pub discharge_location: Option<String>,
    pub race: Option<String>,
    pub edregtime: Option<NaiveDateTime>,
    pub edouttime: Option<NaiveDateTime>,
}

impl Admission {
    /// The [admit, discharge] window, when both ends are known.
    pub fn window(&self) -> Option<TimeWindow> {
        TimeWindow::from_bounds(self.admittime, self.dischtime)
    }
}

/// One diagnosis line. `group_id` is the admission id for hospital
/// diagnoses and the ED stay id for ED diagnoses.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisRecord {
    pub subject_id: i64,
    pub group_id: i64,
    pub seq_num: i64,
    pub icd_code: Option<String>,
    pub title: Option<String>,
}

/// DRG coding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DrgType {
    /// All Patient Refined DRG.
    Apr,
    /// Health Care Financing Administration DRG.
    Hcfa,
}

impl DrgType {
    /// Parse the `drg_type` column value (case-insensitive).
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "APR" => Ok(Self::Apr),
            "HCFA" => Ok(Self::Hcfa),
            _ => Err(ModelError::UnknownDrgType(raw.to_string())),
        }
    }

    /// Lowercase suffix used in flattened column names.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Apr => "apr",
            Self::Hcfa => "hcfa",
        }
    }
}

impl fmt::Display for DrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apr => f.write_str("APR"),
            Self::Hcfa => f.write_str("HCFA"),
        }
    }
}

/// One DRG row in long format.
#[derive(Debug, Clone, PartialEq)]
pub struct DrgRecord {
    pub subject_id: i64,
    pub hadm_id: i64,
    pub drg_type: DrgType,
    pub drg_code: Option<String>,
    pub description: Option<String>,
    pub drg_severity: Option<i64>,
    pub drg_mortality: Option<i64>,
}

/// One ICU stay.
#[derive(Debug, Clone, PartialEq)]
pub struct IcuStay {
    pub subject_id: i64,
    pub hadm_id: i64,
    pub stay_id: i64,
    pub first_careunit: Option<String>,
    pub last_careunit: Option<String>,
    /// Length of stay in fractional days.
    pub los: Option<f64>,
}

/// One emergency-department visit. `hadm_id` is set only when the visit led
/// to a hospital admission.
#[derive(Debug, Clone, PartialEq)]
pub struct EdStay {
    pub subject_id: i64,
    pub hadm_id: Option<i64>,
    pub ed_stay_id: i64,
    pub intime: Option<NaiveDateTime>,
    pub outtime: Option<NaiveDateTime>,
    pub arrival_transport: Option<String>,
    pub disposition: Option<String>,
}

impl EdStay {
    /// The [in, out] window, when both ends are known.
    pub fn window(&self) -> Option<TimeWindow> {
        TimeWindow::from_bounds(self.intime, self.outtime)
    }
}

/// One ECG study from the record index.
#[derive(Debug, Clone, PartialEq)]
pub struct EcgRecord {
    pub subject_id: i64,
    pub study_id: i64,
    pub ecg_time: Option<NaiveDateTime>,
}

/// Closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Build a window only when both bounds are present.
    pub fn from_bounds(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Option<Self> {
        Some(Self::new(start?, end?))
    }

    /// Inclusive containment.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = TimeWindow::new(at(1, 0), at(5, 0));
        assert!(window.contains(at(1, 0)));
        assert!(window.contains(at(5, 0)));
        assert!(!window.contains(at(5, 1)));
        assert_eq!(window.duration(), TimeDelta::days(4));
    }

    #[test]
    fn window_requires_both_bounds() {
        assert!(TimeWindow::from_bounds(Some(at(1, 0)), None).is_none());
        assert!(TimeWindow::from_bounds(None, Some(at(1, 0))).is_none());
    }

    #[test]
    fn drg_type_parses_case_insensitively() {
        assert_eq!(DrgType::parse("APR").unwrap(), DrgType::Apr);
        assert_eq!(DrgType::parse(" hcfa ").unwrap(), DrgType::Hcfa);
        assert!(DrgType::parse("MS").is_err());
        assert_eq!(DrgType::Hcfa.suffix(), "hcfa");
    }
}
