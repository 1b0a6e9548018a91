//! Entity columns over a small master-table-shaped frame.

use polars::prelude::{AnyValue, DataFrame, NamedFrom, Series};
use proptest::prelude::*;

use mimic_common::{any_to_string_list, string_list_series};
use mimic_entities::{
    EntityColumns, EntityTagger, KeywordSets, apply_entity_extraction, extract_ed_entities,
    extract_hosp_entities,
};

fn titles(rows: &[Option<&[&str]>]) -> Vec<Option<Vec<Option<String>>>> {
    rows.iter()
        .map(|row| {
            row.map(|items| items.iter().map(|item| Some((*item).to_string())).collect())
        })
        .collect()
}

fn master_frame() -> DataFrame {
    let hosp = string_list_series(
        "hosp_diagnosis",
        titles(&[
            Some(&["Acute myocardial infarction", "Hypertension NOS"][..]),
            Some(&["Pneumonia"][..]),
            None,
        ]),
    )
    .unwrap();
    let ed = string_list_series(
        "ed_diagnosis",
        titles(&[
            Some(&["CHEST PAIN", "Atrial fibrillation"][..]),
            None,
            Some(&["Syncope and collapse"][..]),
        ]),
    )
    .unwrap();
    DataFrame::new(vec![
        Series::new("subject_id".into(), &[1i64, 2, 3]).into(),
        hosp.into(),
        ed.into(),
    ])
    .unwrap()
}

#[test]
fn ed_entities_serialize_as_json_objects() {
    let json = serde_json::to_string(&extract_ed_entities("chest pain, atrial fibrillation"))
        .unwrap();
    insta::assert_snapshot!(
        json,
        @r#"{"Arrhythmia":["atrial fibrillation"],"Chest Pain / Symptoms":["chest pain"]}"#
    );
}

#[test]
fn frame_gains_entity_columns() {
    let tagger = EntityTagger::new(&KeywordSets::default()).unwrap();
    let (df, stats) =
        apply_entity_extraction(&master_frame(), &tagger, &EntityColumns::default()).unwrap();

    assert_eq!(stats.rows, 3);
    assert_eq!(stats.rows_with_hosp_entities, 1);
    assert_eq!(stats.rows_with_ed_entities, 2);

    let hosp = df.column("hosp_diagnosis_entities").unwrap();
    assert_eq!(
        any_to_string_list(hosp.get(0).unwrap()),
        Some(vec![
            Some("infarction".to_string()),
            Some("myocardial".to_string()),
            Some("hypertension".to_string()),
        ])
    );
    assert_eq!(any_to_string_list(hosp.get(1).unwrap()), Some(Vec::new()));

    let hosp_counts = df.column("num_hosp_diagnosis_entities").unwrap();
    assert_eq!(hosp_counts.get(0).unwrap(), AnyValue::Int64(3));
    assert_eq!(hosp_counts.get(2).unwrap(), AnyValue::Int64(0));

    let ed = df.column("ed_entities").unwrap();
    assert_eq!(ed.get(1).unwrap(), AnyValue::String("{}"));
    assert_eq!(
        ed.get(2).unwrap(),
        AnyValue::String(r#"{"Chest Pain / Symptoms":["syncope","collapse"]}"#)
    );

    let ed_counts = df.column("num_ed_diagnosis_entities").unwrap();
    assert_eq!(ed_counts.get(0).unwrap(), AnyValue::Int64(2));
    assert_eq!(ed_counts.get(1).unwrap(), AnyValue::Int64(0));
}

#[test]
fn source_columns_are_kept() {
    let tagger = EntityTagger::new(&KeywordSets::default()).unwrap();
    let (df, _) =
        apply_entity_extraction(&master_frame(), &tagger, &EntityColumns::default()).unwrap();
    assert_eq!(df.width(), 7);
    assert!(df.column("hosp_diagnosis").is_ok());
    assert!(df.column("ed_diagnosis").is_ok());
}

proptest! {
    #[test]
    fn hospital_entities_are_known_keywords(text in "[a-zA-Z ]{0,60}") {
        let keywords = KeywordSets::default().hosp;
        let found = extract_hosp_entities(text.as_str());
        let mut seen = std::collections::BTreeSet::new();
        for entity in &found {
            prop_assert!(keywords.contains(entity));
            prop_assert!(seen.insert(entity.clone()));
        }
    }

    #[test]
    fn case_does_not_change_matches(text in "[a-z ]{0,60}") {
        prop_assert_eq!(
            extract_hosp_entities(text.as_str()),
            extract_hosp_entities(text.to_uppercase())
        );
    }
}
