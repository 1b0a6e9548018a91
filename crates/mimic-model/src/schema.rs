//! Per-source schema descriptors.
//!
//! Extract versions differ in which columns they carry. Each source declares
//! the columns it needs, the ones it can use when present, the columns to
//! discard and the renames that disambiguate it in the master table. Column
//! names in `required` and `optional` are the post-rename names; `text`
//! lists raw columns that must be read as strings even when every value
//! looks numeric (ICD and DRG codes keep their leading zeros).

use std::path::Path;

/// Static description of one raw extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSchema {
    pub kind: SourceKind,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub drop: &'static [&'static str],
    pub rename: &'static [(&'static str, &'static str)],
    pub text: &'static [&'static str],
}

impl SourceSchema {
    /// Required columns absent from `columns`.
    pub fn missing_required<S: AsRef<str>>(&self, columns: &[S]) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|name| !has_column(columns, name))
            .collect()
    }

    /// Optional columns present in `columns`, in declaration order.
    pub fn present_optional<S: AsRef<str>>(&self, columns: &[S]) -> Vec<&'static str> {
        self.optional
            .iter()
            .copied()
            .filter(|name| has_column(columns, name))
            .collect()
    }
}

fn has_column<S: AsRef<str>>(columns: &[S], name: &str) -> bool {
    columns.iter().any(|column| column.as_ref() == name)
}

/// The raw extracts the pipelines read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    Patients,
    Admissions,
    HospDiagnosis,
    DrgCodes,
    IcuStays,
    EdStays,
    EdDiagnosis,
    RecordList,
    MachineMeasurements,
}

impl SourceKind {
    /// Sources consumed by the static pipeline, in load order.
    pub const STATIC: [SourceKind; 8] = [
        SourceKind::Patients,
        SourceKind::Admissions,
        SourceKind::HospDiagnosis,
        SourceKind::DrgCodes,
        SourceKind::IcuStays,
        SourceKind::EdStays,
        SourceKind::EdDiagnosis,
        SourceKind::RecordList,
    ];

    /// Key naming this source in the configuration file.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Patients => "patients",
            Self::Admissions => "admissions",
            Self::HospDiagnosis => "hosp_diagnosis",
            Self::DrgCodes => "drgcodes",
            Self::IcuStays => "icustays",
            Self::EdStays => "edstays",
            Self::EdDiagnosis => "ed_diagnosis",
            Self::RecordList => "record_list",
            Self::MachineMeasurements => "machine_measurements",
        }
    }

    pub fn schema(self) -> &'static SourceSchema {
        match self {
            Self::Patients => &PATIENTS,
            Self::Admissions => &ADMISSIONS,
            Self::HospDiagnosis => &HOSP_DIAGNOSIS,
            Self::DrgCodes => &DRG_CODES,
            Self::IcuStays => &ICU_STAYS,
            Self::EdStays => &ED_STAYS,
            Self::EdDiagnosis => &ED_DIAGNOSIS,
            Self::RecordList => &RECORD_LIST,
            Self::MachineMeasurements => &MACHINE_MEASUREMENTS,
        }
    }
}

/// On-disk table format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// Format for a path; `None` for an unrecognized extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

pub const PATIENTS: SourceSchema = SourceSchema {
    kind: SourceKind::Patients,
    required: &["subject_id"],
    optional: &["gender", "anchor_age", "dod"],
    drop: &["anchor_year", "anchor_year_group"],
    rename: &[],
    text: &["gender"],
};

pub const ADMISSIONS: SourceSchema = SourceSchema {
    kind: SourceKind::Admissions,
    required: &["subject_id", "hadm_id", "hosp_admittime", "hosp_dischtime"],
    optional: &[
        "deathtime",
        "admission_type",
        "admit_provider_id",
        "discharge_location",
        "race",
        "edregtime",
        "edouttime",
    ],
    drop: &[
        "insurance",
        "admission_location",
        "marital_status",
        "hospital_expire_flag",
        "language",
    ],
    rename: &[
        ("admittime", "hosp_admittime"),
        ("dischtime", "hosp_dischtime"),
    ],
    text: &["admit_provider_id", "race"],
};

pub const HOSP_DIAGNOSIS: SourceSchema = SourceSchema {
    kind: SourceKind::HospDiagnosis,
    required: &["subject_id", "hadm_id", "seq_num", "icd_code", "title"],
    optional: &["icd_version"],
    drop: &[],
    rename: &[("long_title", "title")],
    text: &["icd_code", "icd_version"],
};

pub const DRG_CODES: SourceSchema = SourceSchema {
    kind: SourceKind::DrgCodes,
    required: &["subject_id", "hadm_id", "drg_type", "drg_code"],
    optional: &["description", "drg_severity", "drg_mortality"],
    drop: &[],
    rename: &[],
    text: &["drg_type", "drg_code"],
};

pub const ICU_STAYS: SourceSchema = SourceSchema {
    kind: SourceKind::IcuStays,
    required: &["subject_id", "hadm_id", "stay_id"],
    optional: &["first_careunit", "last_careunit", "los"],
    drop: &["intime", "outtime"],
    rename: &[],
    text: &["first_careunit", "last_careunit"],
};

pub const ED_STAYS: SourceSchema = SourceSchema {
    kind: SourceKind::EdStays,
    required: &["subject_id", "ed_stay_id", "ed_intime", "ed_outtime"],
    optional: &["hadm_id", "ed_arrival_transport", "ed_disposition"],
    drop: &["gender", "race"],
    rename: &[
        ("stay_id", "ed_stay_id"),
        ("intime", "ed_intime"),
        ("outtime", "ed_outtime"),
        ("arrival_transport", "ed_arrival_transport"),
        ("disposition", "ed_disposition"),
    ],
    text: &["arrival_transport", "disposition"],
};

pub const ED_DIAGNOSIS: SourceSchema = SourceSchema {
    kind: SourceKind::EdDiagnosis,
    required: &["subject_id", "ed_stay_id", "seq_num", "icd_code", "title"],
    optional: &["icd_version"],
    drop: &[],
    rename: &[("stay_id", "ed_stay_id"), ("icd_title", "title")],
    text: &["icd_code", "icd_version"],
};

pub const RECORD_LIST: SourceSchema = SourceSchema {
    kind: SourceKind::RecordList,
    required: &["subject_id", "study_id", "ecg_time"],
    optional: &["file_name", "path"],
    drop: &[],
    rename: &[],
    text: &["file_name", "path"],
};

pub const MACHINE_MEASUREMENTS: SourceSchema = SourceSchema {
    kind: SourceKind::MachineMeasurements,
    required: &["subject_id", "study_id"],
    optional: &["ecg_time", "cart_id"],
    drop: &[],
    rename: &[],
    text: &["cart_id"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_missing_required_columns() {
        let columns = ["subject_id", "hadm_id", "hosp_admittime"];
        assert_eq!(ADMISSIONS.missing_required(&columns), vec!["hosp_dischtime"]);
    }

    #[test]
    fn reports_present_optional_columns_in_order() {
        let columns = vec![
            "los".to_string(),
            "subject_id".to_string(),
            "first_careunit".to_string(),
        ];
        assert_eq!(
            ICU_STAYS.present_optional(&columns),
            vec!["first_careunit", "los"]
        );
    }

    #[test]
    fn table_format_follows_extension() {
        assert_eq!(
            TableFormat::from_path(Path::new("out/static.PARQUET")),
            Some(TableFormat::Parquet)
        );
        assert_eq!(
            TableFormat::from_path(Path::new("hosp/patients.csv")),
            Some(TableFormat::Csv)
        );
        assert_eq!(TableFormat::from_path(Path::new("hosp/patients.csv.gz")), None);
        assert_eq!(TableFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn every_source_round_trips_through_its_kind() {
        for kind in SourceKind::STATIC {
            assert_eq!(kind.schema().kind, kind);
        }
        assert_eq!(
            SourceKind::MachineMeasurements.schema().kind,
            SourceKind::MachineMeasurements
        );
    }
}
