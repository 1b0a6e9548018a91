//! Master table to DataFrame.
//!
//! Column order is fixed: identifiers, admission, demographics, hospital
//! diagnoses, DRG, ICU, ED visit, ED diagnoses, ECG studies. ICU list
//! columns follow the table's `icu_fields`.

use chrono::NaiveDateTime;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use mimic_common::{f64_list_series, i64_list_series, string_list_series};
use mimic_core::DiagnosisSource;
use mimic_model::{
    Admission, AprDrg, DiagnosisList, DrgType, EdStay, HcfaDrg, HospitalVisit, IcuField,
    IcuSummary, MasterRow, MasterTable,
};

use crate::error::Result;

fn scalar<T, F>(name: &str, rows: &[MasterRow], value: F) -> Column
where
    F: Fn(&MasterRow) -> Option<T>,
    Series: NamedFrom<Vec<Option<T>>, [Option<T>]>,
{
    let values: Vec<Option<T>> = rows.iter().map(value).collect();
    Series::new(name.into(), values).into_column()
}

fn hospital(row: &MasterRow) -> Option<&HospitalVisit> {
    row.hospital.as_ref()
}

fn admission(row: &MasterRow) -> Option<&Admission> {
    hospital(row).map(|visit| &visit.admission)
}

fn ed_stay(row: &MasterRow) -> Option<&EdStay> {
    row.ed.as_ref().map(|visit| &visit.stay)
}

fn apr(row: &MasterRow) -> Option<&AprDrg> {
    hospital(row)?.drg.as_ref()?.apr.as_ref()
}

fn hcfa(row: &MasterRow) -> Option<&HcfaDrg> {
    hospital(row)?.drg.as_ref()?.hcfa.as_ref()
}

fn admission_time(
    name: &str,
    rows: &[MasterRow],
    field: fn(&Admission) -> Option<NaiveDateTime>,
) -> Column {
    scalar(name, rows, |row| admission(row).and_then(field))
}

fn admission_text(
    name: &str,
    rows: &[MasterRow],
    field: fn(&Admission) -> &Option<String>,
) -> Column {
    scalar(name, rows, |row| admission(row).and_then(|adm| field(adm).clone()))
}

fn diagnosis_columns(
    source: DiagnosisSource,
    rows: &[MasterRow],
    lists: fn(&MasterRow) -> Option<&DiagnosisList>,
) -> Result<[Column; 2]> {
    let codes = rows
        .iter()
        .map(|row| lists(row).map(|list| list.codes.clone()))
        .collect();
    let titles = rows
        .iter()
        .map(|row| lists(row).map(|list| list.titles.clone()))
        .collect();
    Ok([
        string_list_series(source.codes_column(), codes)?.into_column(),
        string_list_series(source.titles_column(), titles)?.into_column(),
    ])
}

fn drg_columns(rows: &[MasterRow]) -> Vec<Column> {
    let apr_suffix = DrgType::Apr.suffix();
    let hcfa_suffix = DrgType::Hcfa.suffix();
    vec![
        scalar(&format!("drg_code_{apr_suffix}"), rows, |row| {
            apr(row).and_then(|drg| drg.drg_code.clone())
        }),
        scalar(&format!("description_{apr_suffix}"), rows, |row| {
            apr(row).and_then(|drg| drg.description.clone())
        }),
        scalar(&format!("drg_severity_{apr_suffix}"), rows, |row| {
            apr(row).and_then(|drg| drg.drg_severity)
        }),
        scalar(&format!("drg_mortality_{apr_suffix}"), rows, |row| {
            apr(row).and_then(|drg| drg.drg_mortality)
        }),
        scalar(&format!("drg_code_{hcfa_suffix}"), rows, |row| {
            hcfa(row).and_then(|drg| drg.drg_code.clone())
        }),
        scalar(&format!("description_{hcfa_suffix}"), rows, |row| {
            hcfa(row).and_then(|drg| drg.description.clone())
        }),
    ]
}

fn icu_columns(table: &MasterTable) -> Result<Vec<Column>> {
    let empty = IcuSummary::default();
    let summaries: Vec<&IcuSummary> = table
        .rows
        .iter()
        .map(|row| hospital(row).map_or(&empty, |visit| &visit.icu))
        .collect();

    let mut columns = Vec::with_capacity(table.icu_fields.len() + 1);
    for field in &table.icu_fields {
        let name = field.output_column();
        let series = match field {
            IcuField::StayId => i64_list_series(
                name,
                summaries.iter().map(|icu| Some(icu.stay_ids.clone())).collect(),
            )?,
            IcuField::FirstCareunit => string_list_series(
                name,
                summaries
                    .iter()
                    .map(|icu| Some(icu.first_careunits.clone()))
                    .collect(),
            )?,
            IcuField::LastCareunit => string_list_series(
                name,
                summaries
                    .iter()
                    .map(|icu| Some(icu.last_careunits.clone()))
                    .collect(),
            )?,
            IcuField::Los => f64_list_series(
                name,
                summaries.iter().map(|icu| Some(icu.los.clone())).collect(),
            )?,
        };
        columns.push(series.into_column());
    }
    let counts: Vec<i64> = summaries.iter().map(|icu| icu.count() as i64).collect();
    columns.push(Series::new("icu_count".into(), counts).into_column());
    Ok(columns)
}

/// Materialize the master table as a DataFrame.
pub fn build_master_frame(table: &MasterTable) -> Result<DataFrame> {
    let rows = table.rows.as_slice();
    let subject_ids: Vec<i64> = rows.iter().map(|row| row.subject_id).collect();

    let mut columns = vec![
        Series::new("subject_id".into(), subject_ids).into_column(),
        scalar("hadm_id", rows, |row| row.hadm_id),
        admission_time("hosp_admittime", rows, |adm| adm.admittime),
        admission_time("hosp_dischtime", rows, |adm| adm.dischtime),
        scalar("death_time", rows, |row| hospital(row).and_then(|visit| visit.death_time)),
        admission_text("admission_type", rows, |adm| &adm.admission_type),
        admission_text("admit_provider_id", rows, |adm| &adm.admit_provider_id),
        admission_text("discharge_location", rows, |adm| &adm.discharge_location),
        admission_text("race", rows, |adm| &adm.race),
        admission_time("edregtime", rows, |adm| adm.edregtime),
        admission_time("edouttime", rows, |adm| adm.edouttime),
        scalar("gender", rows, |row| {
            hospital(row).and_then(|visit| visit.demographics.gender.clone())
        }),
        scalar("anchor_age", rows, |row| {
            hospital(row).and_then(|visit| visit.demographics.anchor_age)
        }),
    ];
    columns.extend(diagnosis_columns(DiagnosisSource::Hospital, rows, |row| {
        hospital(row)?.diagnoses.as_ref()
    })?);
    columns.extend(drg_columns(rows));
    columns.extend(icu_columns(table)?);
    columns.extend([
        scalar("ed_stay_id", rows, |row| ed_stay(row).map(|stay| stay.ed_stay_id)),
        scalar("ed_intime", rows, |row| ed_stay(row).and_then(|stay| stay.intime)),
        scalar("ed_outtime", rows, |row| ed_stay(row).and_then(|stay| stay.outtime)),
        scalar("ed_arrival_transport", rows, |row| {
            ed_stay(row).and_then(|stay| stay.arrival_transport.clone())
        }),
        scalar("ed_disposition", rows, |row| {
            ed_stay(row).and_then(|stay| stay.disposition.clone())
        }),
    ]);
    columns.extend(diagnosis_columns(DiagnosisSource::Ed, rows, |row| {
        row.ed.as_ref()?.diagnoses.as_ref()
    })?);
    columns.push(
        i64_list_series(
            "ecg_study_ids",
            rows.iter().map(|row| Some(row.ecg_study_ids.clone())).collect(),
        )?
        .into_column(),
    );

    let df = DataFrame::new(columns)?;
    debug!(rows = df.height(), columns = df.width(), "built master frame");
    Ok(df)
}
