//! Data model for the MIMIC flattening pipeline.

pub mod config;
pub mod error;
pub mod inputs;
pub mod master;
pub mod records;
pub mod schema;

pub use config::{
    EntityConfig, PathsConfig, StaticConfig, StaticSources, TemporalConfig, TemporalSources,
};
pub use error::{ModelError, Result};
pub use inputs::StaticInputs;
pub use master::{
    AprDrg, Demographics, DiagnosisList, DrgSummary, EdVisit, HcfaDrg, HospitalVisit, IcuField,
    IcuSummary, MasterRow, MasterTable,
};
pub use records::{
    Admission, DiagnosisRecord, DrgRecord, DrgType, EcgRecord, EdStay, IcuStay, Patient,
    TimeWindow,
};
pub use schema::{SourceKind, SourceSchema, TableFormat};

#[cfg(test)]
mod tests {
    use super::*;

    const STATIC_JSON: &str = r#"{
        "paths": { "in_dir": "data/raw", "out_path": "data/processed/static_features.parquet" },
        "static_sources": {
            "patients": "hosp/patients.csv",
            "admissions": "hosp/admissions.csv",
            "hosp_diagnosis": "hosp/diagnoses.csv",
            "drgcodes": "hosp/drgcodes.csv",
            "icustays": "icu/icustays.csv",
            "edstays": "ed/edstays.csv",
            "ed_diagnosis": "ed/diagnosis.csv",
            "record_list": "ecg/record_list.csv"
        }
    }"#;

    #[test]
    fn static_config_deserializes_with_default_entities() {
        let config: StaticConfig = serde_json::from_str(STATIC_JSON).expect("parse config");
        assert_eq!(config.entities, EntityConfig::default());
        assert_eq!(
            config.source_path(SourceKind::IcuStays),
            Some("data/raw/icu/icustays.csv".into())
        );
        assert_eq!(config.source_path(SourceKind::MachineMeasurements), None);
    }

    #[test]
    fn entities_path_defaults_next_to_static_output() {
        let config: StaticConfig = serde_json::from_str(STATIC_JSON).expect("parse config");
        assert_eq!(
            config.entities_out_path(),
            std::path::PathBuf::from("data/processed/static_features_entities.parquet")
        );
    }

    #[test]
    fn temporal_config_resolves_source() {
        let json = r#"{
            "paths": { "in_dir": "raw", "out_path": "out/temporal.parquet" },
            "temporal_sources": { "machine_measurements": "ecg/machine_measurements.csv" }
        }"#;
        let config: TemporalConfig = serde_json::from_str(json).expect("parse config");
        assert_eq!(
            config.source_path(),
            std::path::PathBuf::from("raw/ecg/machine_measurements.csv")
        );
        assert!(config.invalid_phrases.is_none());
    }
}
