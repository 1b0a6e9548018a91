//! Tests for ECG report flattening.

use mimic_common::{any_to_string_list, has_column};
use mimic_transform::{FULL_REPORT_COLUMN, ReportOptions, flatten_reports};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

fn machine_measurements() -> DataFrame {
    DataFrame::new(vec![
        Series::new("subject_id".into(), vec![1i64, 1, 2, 3]).into_column(),
        Series::new("study_id".into(), vec![11i64, 12, 21, 31]).into_column(),
        Series::new(
            "ecg_time".into(),
            vec![
                "2180-07-23 08:44:00",
                "2180-07-24 09:00:00",
                "2181-01-01 00:00:00",
                "2182-03-03 12:30:00",
            ],
        )
        .into_column(),
        Series::new(
            "report_0".into(),
            vec![
                Some(" Sinus rhythm "),
                Some("All 12 leads are missing"),
                Some("Atrial fibrillation"),
                None,
            ],
        )
        .into_column(),
        Series::new(
            "report_1".into(),
            vec![Some("Normal ECG"), None, Some(""), Some("Uncertain rhythm: review")],
        )
        .into_column(),
        Series::new(
            "report_2".into(),
            vec![None, None, Some("Abnormal ECG"), None],
        )
        .into_column(),
    ])
    .unwrap()
}

fn report_at(df: &DataFrame, idx: usize) -> Vec<String> {
    let cell = df.column(FULL_REPORT_COLUMN).unwrap().get(idx).unwrap();
    any_to_string_list(cell)
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

#[test]
fn drops_records_with_invalid_machine_messages() {
    let flattened = flatten_reports(&machine_measurements(), &ReportOptions::default()).unwrap();
    let data = &flattened.data;
    assert_eq!(data.height(), 2);
    assert_eq!(flattened.stats.input_records, 4);
    assert_eq!(flattened.stats.kept_records, 2);
    assert_eq!(flattened.stats.dropped_records, 2);

    let studies: Vec<Option<i64>> = data
        .column("study_id")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(studies, vec![Some(11), Some(21)]);
}

#[test]
fn lines_keep_column_order_and_are_trimmed() {
    let flattened = flatten_reports(&machine_measurements(), &ReportOptions::default()).unwrap();
    assert_eq!(report_at(&flattened.data, 0), vec!["Sinus rhythm", "Normal ECG"]);
    assert_eq!(
        report_at(&flattened.data, 1),
        vec!["Atrial fibrillation", "Abnormal ECG"]
    );
}

#[test]
fn line_columns_are_replaced_by_full_report() {
    let flattened = flatten_reports(&machine_measurements(), &ReportOptions::default()).unwrap();
    let data = &flattened.data;
    assert_eq!(flattened.stats.report_columns, 3);
    assert!(has_column(data, FULL_REPORT_COLUMN));
    assert!(!has_column(data, "report_0"));
    assert!(!has_column(data, "report_2"));
    assert!(has_column(data, "ecg_time"));
}

#[test]
fn custom_phrases_replace_the_defaults() {
    let options = ReportOptions::with_invalid_phrases(vec!["Abnormal ECG".to_string()]);
    let flattened = flatten_reports(&machine_measurements(), &options).unwrap();
    let studies: Vec<Option<i64>> = flattened
        .data
        .column("study_id")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(studies, vec![Some(11), Some(12), Some(31)]);
}

#[test]
fn frame_without_report_columns_gets_empty_reports() {
    let df = DataFrame::new(vec![
        Series::new("subject_id".into(), vec![1i64, 2]).into_column(),
        Series::new("study_id".into(), vec![11i64, 21]).into_column(),
    ])
    .unwrap();
    let flattened = flatten_reports(&df, &ReportOptions::default()).unwrap();
    assert_eq!(flattened.data.height(), 2);
    assert!(report_at(&flattened.data, 0).is_empty());
}
