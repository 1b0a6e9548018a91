//! Property tests for column type normalization.

use mimic_transform::normalize_column_types;
use polars::prelude::{DataFrame, DataType, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

fn timestamp_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[a-z ]{0,12}".prop_map(Some),
        (1900i32..2200, 1u32..13, 1u32..29, 0u32..24, 0u32..60).prop_map(
            |(year, month, day, hour, minute)| {
                Some(format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:00"))
            }
        ),
        (1900i32..2200, 1u32..13, 1u32..29)
            .prop_map(|(year, month, day)| Some(format!("{year:04}-{month:02}-{day:02}"))),
    ]
}

proptest! {
    #[test]
    fn normalizing_twice_changes_nothing(
        times in prop::collection::vec(timestamp_text(), 0..20),
        seed in any::<i64>(),
    ) {
        let height = times.len();
        let text: Vec<Option<String>> = (0..height)
            .map(|idx| (idx % 3 != 0).then(|| format!("value {idx}")))
            .collect();
        let ids: Vec<i64> = (0..height as i64).map(|idx| seed.wrapping_add(idx)).collect();
        let df = DataFrame::new(vec![
            Series::new("subject_id".into(), ids).into_column(),
            Series::new("chartdate".into(), times).into_column(),
            Series::new("note".into(), text).into_column(),
        ])
        .unwrap();

        let once = normalize_column_types(&df).unwrap();
        let twice = normalize_column_types(&once).unwrap();
        prop_assert!(once.equals_missing(&twice));
        prop_assert!(matches!(
            once.column("chartdate").unwrap().dtype(),
            DataType::Datetime(_, _)
        ));
        prop_assert_eq!(once.column("note").unwrap().dtype(), &DataType::String);
    }
}
