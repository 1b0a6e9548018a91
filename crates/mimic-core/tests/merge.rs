//! Master table assembly over small hand-built extracts.

use chrono::{NaiveDate, NaiveDateTime};
use mimic_core::{MergeError, build_master_table, run_static_pipeline};
use mimic_model::{
    Admission, DiagnosisRecord, DrgRecord, DrgType, EcgRecord, EdStay, IcuField, IcuStay,
    Patient, StaticInputs,
};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn patient(subject_id: i64, dod: Option<NaiveDateTime>) -> Patient {
    Patient {
        subject_id,
        gender: Some("F".to_string()),
        anchor_age: Some(60),
        dod,
    }
}

fn admission(subject_id: i64, hadm_id: i64, start: u32, end: u32) -> Admission {
    Admission {
        subject_id,
        hadm_id,
        admittime: Some(at(start, 0)),
        dischtime: Some(at(end, 0)),
        deathtime: None,
        admission_type: Some("URGENT".to_string()),
        admit_provider_id: None,
        discharge_location: None,
        race: None,
        edregtime: None,
        edouttime: None,
    }
}

fn ed_stay(subject_id: i64, hadm_id: Option<i64>, ed_stay_id: i64, day: u32) -> EdStay {
    EdStay {
        subject_id,
        hadm_id,
        ed_stay_id,
        intime: Some(at(day, 1)),
        outtime: Some(at(day, 5)),
        arrival_transport: None,
        disposition: None,
    }
}

fn diagnosis(subject_id: i64, group_id: i64, seq_num: i64, code: &str) -> DiagnosisRecord {
    DiagnosisRecord {
        subject_id,
        group_id,
        seq_num,
        icd_code: Some(code.to_string()),
        title: Some(format!("{code} title")),
    }
}

fn inputs() -> StaticInputs {
    StaticInputs {
        patients: vec![patient(1, Some(at(20, 0))), patient(2, None)],
        admissions: vec![admission(1, 100, 1, 5), admission(1, 101, 2, 3), admission(2, 200, 1, 2)],
        hosp_diagnoses: vec![
            diagnosis(1, 100, 2, "I10"),
            diagnosis(1, 100, 1, "I48"),
            diagnosis(2, 200, 1, "R07"),
        ],
        drg_codes: vec![DrgRecord {
            subject_id: 1,
            hadm_id: 100,
            drg_type: DrgType::Hcfa,
            drg_code: Some("308".to_string()),
            description: Some("CARDIAC ARRHYTHMIA".to_string()),
            drg_severity: None,
            drg_mortality: None,
        }],
        icu_stays: vec![IcuStay {
            subject_id: 1,
            hadm_id: 100,
            stay_id: 3000,
            first_careunit: Some("CCU".to_string()),
            last_careunit: Some("CCU".to_string()),
            los: Some(1.5),
        }],
        icu_fields: IcuField::ALL.to_vec(),
        ed_stays: vec![
            ed_stay(1, Some(100), 500, 1),
            ed_stay(2, None, 501, 10),
            ed_stay(2, Some(999), 502, 12),
        ],
        ed_diagnoses: vec![diagnosis(2, 501, 1, "R079")],
        ecg_records: vec![
            EcgRecord {
                subject_id: 1,
                study_id: 9000,
                ecg_time: Some(at(2, 12)),
            },
            EcgRecord {
                subject_id: 2,
                study_id: 9001,
                ecg_time: Some(at(10, 2)),
            },
        ],
    }
}

#[test]
fn row_count_is_admissions_plus_standalone_ed_stays() {
    let (table, stats) = build_master_table(&inputs()).unwrap();
    assert_eq!(table.len(), 3 + 2);
    assert_eq!(stats.ed_only, 2);
    assert_eq!(stats.ed_attached, 1);
    assert_eq!(table.ed_only_count(), 2);
}

#[test]
fn hospital_fields_are_joined_per_admission() {
    let (table, _) = build_master_table(&inputs()).unwrap();
    let first = table.rows[0].hospital.as_ref().unwrap();

    let diagnoses = first.diagnoses.as_ref().unwrap();
    assert_eq!(diagnoses.codes, vec![Some("I48".into()), Some("I10".into())]);
    assert_eq!(first.icu.stay_ids, vec![3000]);
    let drg = first.drg.as_ref().unwrap();
    assert!(drg.apr.is_none());
    assert_eq!(drg.hcfa.as_ref().unwrap().drg_code.as_deref(), Some("308"));
    assert_eq!(first.demographics.anchor_age, Some(60));
    assert_eq!(table.rows[0].ed.as_ref().unwrap().stay.ed_stay_id, 500);
}

#[test]
fn zero_icu_admissions_get_empty_lists() {
    let (table, _) = build_master_table(&inputs()).unwrap();
    let second = table.rows[1].hospital.as_ref().unwrap();
    assert_eq!(second.icu.count(), 0);
    assert!(second.icu.first_careunits.is_empty());
    assert!(second.diagnoses.is_none());
    assert!(second.drg.is_none());
}

#[test]
fn death_time_prefers_admission_then_patient() {
    let mut inputs = inputs();
    inputs.admissions[1].deathtime = Some(at(3, 0));
    let (table, _) = build_master_table(&inputs).unwrap();
    let death = |idx: usize| table.rows[idx].hospital.as_ref().unwrap().death_time;
    assert_eq!(death(0), Some(at(20, 0)));
    assert_eq!(death(1), Some(at(3, 0)));
    assert_eq!(death(2), None);
    assert!(
        table.rows[1]
            .hospital
            .as_ref()
            .unwrap()
            .admission
            .deathtime
            .is_none()
    );
}

#[test]
fn standalone_ed_rows_keep_their_own_fields() {
    let (table, _) = build_master_table(&inputs()).unwrap();
    let ed_only = &table.rows[3];
    assert!(ed_only.hospital.is_none());
    assert_eq!(ed_only.hadm_id, None);
    let visit = ed_only.ed.as_ref().unwrap();
    assert_eq!(visit.stay.ed_stay_id, 501);
    assert_eq!(
        visit.diagnoses.as_ref().unwrap().codes,
        vec![Some("R079".to_string())]
    );

    // A stay naming an admission that does not exist is standalone as well.
    let dangling = &table.rows[4];
    assert!(dangling.hospital.is_none());
    assert_eq!(dangling.hadm_id, Some(999));
}

#[test]
fn earliest_ed_stay_is_attached_when_several_share_an_admission() {
    let mut inputs = inputs();
    inputs.ed_stays.push(EdStay {
        intime: Some(at(1, 0)),
        ..ed_stay(1, Some(100), 499, 1)
    });
    let (table, stats) = build_master_table(&inputs).unwrap();
    assert_eq!(table.rows[0].ed.as_ref().unwrap().stay.ed_stay_id, 499);
    assert_eq!(stats.ed_detached, 1);
    assert_eq!(table.len(), 3 + 3);
    assert!(
        table
            .rows
            .iter()
            .any(|row| row.is_ed_only() && row.ed.as_ref().unwrap().stay.ed_stay_id == 500)
    );
}

#[test]
fn admission_without_patient_is_fatal() {
    let mut inputs = inputs();
    inputs.patients.retain(|p| p.subject_id != 2);
    let err = build_master_table(&inputs).unwrap_err();
    assert_eq!(
        err,
        MergeError::OrphanAdmission {
            subject_id: 2,
            hadm_id: 200
        }
    );
}

#[test]
fn duplicate_patients_are_rejected() {
    let mut inputs = inputs();
    inputs.patients.push(patient(1, None));
    assert!(matches!(
        build_master_table(&inputs),
        Err(MergeError::DuplicateKey { table: "patients", .. })
    ));
}

#[test]
fn pipeline_assigns_ecgs_to_tightest_visit() {
    let outcome = run_static_pipeline(&inputs()).unwrap();
    let rows = &outcome.table.rows;
    assert!(rows[0].ecg_study_ids.is_empty());
    assert_eq!(rows[1].ecg_study_ids, vec![9000]);
    assert_eq!(rows[3].ecg_study_ids, vec![9001]);
    assert_eq!(outcome.matching.matched, 2);
    assert_eq!(outcome.merge.rows, 5);
}
