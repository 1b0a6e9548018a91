//! Invariants of ECG assignment over random visits.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use mimic_core::{assign_ecgs, enclosing_size};
use mimic_model::{EcgRecord, EdStay, EdVisit, MasterRow, MasterTable};
use proptest::prelude::*;

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn visit(subject_id: i64, stay_id: i64, start_h: i64, len_h: i64) -> MasterRow {
    let start = base() + TimeDelta::hours(start_h);
    MasterRow {
        subject_id,
        hadm_id: None,
        hospital: None,
        ed: Some(EdVisit {
            stay: EdStay {
                subject_id,
                hadm_id: None,
                ed_stay_id: stay_id,
                intime: Some(start),
                outtime: Some(start + TimeDelta::hours(len_h)),
                arrival_transport: None,
                disposition: None,
            },
            diagnoses: None,
        }),
        ecg_study_ids: Vec::new(),
    }
}

fn rows_strategy() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
    prop::collection::vec((1i64..4, 0i64..200, 0i64..72), 0..12)
}

fn ecgs_strategy() -> impl Strategy<Value = Vec<(i64, Option<i64>)>> {
    prop::collection::vec((1i64..4, prop::option::of(0i64..280)), 0..30)
}

proptest! {
    #[test]
    fn every_study_lands_in_at_most_one_tightest_row(
        visits in rows_strategy(),
        ecg_specs in ecgs_strategy(),
    ) {
        let rows: Vec<MasterRow> = visits
            .iter()
            .enumerate()
            .map(|(idx, (subject, start, len))| visit(*subject, idx as i64, *start, *len))
            .collect();
        let ecgs: Vec<EcgRecord> = ecg_specs
            .iter()
            .enumerate()
            .map(|(idx, (subject, hour))| EcgRecord {
                subject_id: *subject,
                study_id: 10_000 + idx as i64,
                ecg_time: hour.map(|h| base() + TimeDelta::hours(h)),
            })
            .collect();

        let table = MasterTable { rows, icu_fields: Vec::new() };
        let (matched, stats) = assign_ecgs(table, &ecgs);

        let mut seen = BTreeSet::new();
        for row in &matched.rows {
            let mut sorted = row.ecg_study_ids.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&sorted, &row.ecg_study_ids);
            for study in &row.ecg_study_ids {
                prop_assert!(seen.insert(*study), "study {} assigned twice", study);
            }
        }
        prop_assert_eq!(seen.len(), stats.matched);

        for ecg in &ecgs {
            let owner = matched
                .rows
                .iter()
                .position(|row| row.ecg_study_ids.contains(&ecg.study_id));
            let Some(at) = ecg.ecg_time else {
                prop_assert!(owner.is_none());
                continue;
            };
            let sizes: Vec<Option<TimeDelta>> = matched
                .rows
                .iter()
                .map(|row| {
                    if row.subject_id == ecg.subject_id {
                        enclosing_size(row, at)
                    } else {
                        None
                    }
                })
                .collect();
            let best = sizes.iter().flatten().min().copied();
            match owner {
                Some(idx) => {
                    prop_assert_eq!(matched.rows[idx].subject_id, ecg.subject_id);
                    prop_assert_eq!(sizes[idx], best);
                }
                None => prop_assert!(best.is_none()),
            }
        }
    }
}
