//! Loading configured extracts: read, preprocess, check, convert.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use mimic_common::column_names;
use mimic_model::{IcuField, SourceKind, SourceSchema, StaticConfig, StaticInputs};
use mimic_transform::preprocess_source;

use crate::error::{IngestError, Result};
use crate::records::{
    admissions_from_frame, diagnoses_from_frame, drg_from_frame, ecg_records_from_frame,
    ed_stays_from_frame, icu_stays_from_frame, patients_from_frame,
};
use crate::table::read_table_with_text;

/// A preprocessed extract and the optional columns it turned out to carry.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub data: DataFrame,
    pub optional_present: Vec<&'static str>,
}

/// Verify required columns; returns the optional columns that are present.
pub fn check_schema(
    df: &DataFrame,
    schema: &SourceSchema,
    path: &Path,
) -> Result<Vec<&'static str>> {
    let columns = column_names(df);
    let missing = schema.missing_required(&columns);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            table: schema.kind.config_key(),
            path: path.to_path_buf(),
            columns: missing.into_iter().map(str::to_string).collect(),
        });
    }
    Ok(schema.present_optional(&columns))
}

/// Read one extract and bring it into its canonical shape.
pub fn load_source(path: &Path, schema: &SourceSchema) -> Result<LoadedSource> {
    let raw = read_table_with_text(path, schema.text)?;
    let data = preprocess_source(&raw, schema).map_err(|e| IngestError::Preprocess {
        table: schema.kind.config_key(),
        source: e,
    })?;
    let optional_present = check_schema(&data, schema, path)?;
    info!(
        table = schema.kind.config_key(),
        path = %path.display(),
        rows = data.height(),
        columns = data.width(),
        "loaded extract"
    );
    Ok(LoadedSource {
        kind: schema.kind,
        path: path.to_path_buf(),
        data,
        optional_present,
    })
}

fn load_configured(config: &StaticConfig, kind: SourceKind) -> Result<LoadedSource> {
    let path = config
        .source_path(kind)
        .ok_or(IngestError::SourceNotConfigured {
            table: kind.config_key(),
        })?;
    load_source(&path, kind.schema())
}

/// Load every static extract named by the configuration.
pub fn load_static_inputs(config: &StaticConfig) -> Result<StaticInputs> {
    let span = info_span!("load_static_inputs", in_dir = %config.paths.in_dir.display());
    let _guard = span.enter();

    let patients = load_configured(config, SourceKind::Patients)?;
    let admissions = load_configured(config, SourceKind::Admissions)?;
    let hosp_diagnoses = load_configured(config, SourceKind::HospDiagnosis)?;
    let drg_codes = load_configured(config, SourceKind::DrgCodes)?;
    let icu_stays = load_configured(config, SourceKind::IcuStays)?;
    let ed_stays = load_configured(config, SourceKind::EdStays)?;
    let ed_diagnoses = load_configured(config, SourceKind::EdDiagnosis)?;
    let record_list = load_configured(config, SourceKind::RecordList)?;

    let icu_fields = icu_fields_present(&icu_stays.optional_present);

    Ok(StaticInputs {
        patients: patients_from_frame(&patients.data),
        admissions: admissions_from_frame(&admissions.data),
        hosp_diagnoses: diagnoses_from_frame(&hosp_diagnoses.data, "hadm_id"),
        drg_codes: drg_from_frame(&drg_codes.data),
        icu_stays: icu_stays_from_frame(&icu_stays.data),
        icu_fields,
        ed_stays: ed_stays_from_frame(&ed_stays.data),
        ed_diagnoses: diagnoses_from_frame(&ed_diagnoses.data, "ed_stay_id"),
        ecg_records: ecg_records_from_frame(&record_list.data),
    })
}

/// `stay_id` is always present; the other ICU fields only when the
/// extract carries them.
fn icu_fields_present(optional_present: &[&str]) -> Vec<IcuField> {
    IcuField::ALL
        .into_iter()
        .filter(|field| {
            *field == IcuField::StayId || optional_present.contains(&field.source_column())
        })
        .collect()
}

/// Load the machine measurement extract for the temporal pipeline.
///
/// Only a schema check is applied here; type normalization happens in the
/// report flattener.
pub fn load_report_source(path: &Path) -> Result<DataFrame> {
    let schema = SourceKind::MachineMeasurements.schema();
    let data = read_table_with_text(path, schema.text)?;
    check_schema(&data, schema, path)?;
    info!(
        path = %path.display(),
        rows = data.height(),
        columns = data.width(),
        "loaded report extract"
    );
    Ok(data)
}
