//! Entity columns over a master table frame.

use polars::prelude::{AnyValue, DataFrame, NamedFrom, Series};
use tracing::{debug, info};

use mimic_common::string_list_series;
use mimic_model::EntityConfig;

use crate::error::{EntityError, Result};
use crate::keywords::{KeywordSets, top_words};
use crate::tagger::EntityTagger;
use crate::text::FreeText;

/// Source and output column names of the entity pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityColumns {
    pub hosp_source: String,
    pub ed_source: String,
    pub hosp_entities: String,
    pub hosp_count: String,
    pub ed_entities: String,
    pub ed_count: String,
}

impl Default for EntityColumns {
    fn default() -> Self {
        Self {
            hosp_source: "hosp_diagnosis".to_string(),
            ed_source: "ed_diagnosis".to_string(),
            hosp_entities: "hosp_diagnosis_entities".to_string(),
            hosp_count: "num_hosp_diagnosis_entities".to_string(),
            ed_entities: "ed_entities".to_string(),
            ed_count: "num_ed_diagnosis_entities".to_string(),
        }
    }
}

/// What the entity pass found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityStats {
    pub rows: usize,
    pub rows_with_hosp_entities: usize,
    pub rows_with_ed_entities: usize,
}

fn source_texts(df: &DataFrame, name: &str) -> Result<Vec<FreeText>> {
    let column = df
        .column(name)
        .map_err(|_| EntityError::MissingColumn(name.to_string()))?;
    Ok((0..df.height())
        .map(|idx| FreeText::from_any(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Build the tagger for `df` from configuration.
///
/// With `top_words` set, hospital keywords are limited to the most frequent
/// words of the hospital diagnosis titles in this frame.
pub fn tagger_for_frame(
    df: &DataFrame,
    config: &EntityConfig,
    columns: &EntityColumns,
) -> Result<EntityTagger> {
    let mut sets = KeywordSets::from_config(config);
    if let Some(n) = config.top_words {
        let texts: Vec<String> = source_texts(df, &columns.hosp_source)?
            .iter()
            .filter_map(FreeText::searchable)
            .collect();
        let top = top_words(texts.iter().map(String::as_str), n);
        sets = sets.restrict_hosp_to(&top);
        debug!(top_words = n, kept = sets.hosp.len(), "restricted hospital keywords");
    }
    EntityTagger::new(&sets)
}

/// Add the four entity columns to `df`.
///
/// `ed_entities` holds each row's category map as JSON object text; the
/// counts are the number of hospital keywords and of ED categories found.
pub fn apply_entity_extraction(
    df: &DataFrame,
    tagger: &EntityTagger,
    columns: &EntityColumns,
) -> Result<(DataFrame, EntityStats)> {
    let hosp_texts = source_texts(df, &columns.hosp_source)?;
    let ed_texts = source_texts(df, &columns.ed_source)?;

    let mut hosp_lists = Vec::with_capacity(df.height());
    let mut hosp_counts = Vec::with_capacity(df.height());
    let mut ed_json = Vec::with_capacity(df.height());
    let mut ed_counts = Vec::with_capacity(df.height());
    let mut stats = EntityStats {
        rows: df.height(),
        ..EntityStats::default()
    };

    for (hosp_text, ed_text) in hosp_texts.iter().zip(&ed_texts) {
        let hosp = tagger.hosp_entities(hosp_text);
        let ed = tagger.ed_entities(ed_text);
        if !hosp.is_empty() {
            stats.rows_with_hosp_entities += 1;
        }
        if !ed.is_empty() {
            stats.rows_with_ed_entities += 1;
        }
        hosp_counts.push(hosp.len() as i64);
        hosp_lists.push(Some(hosp.into_iter().map(Some).collect()));
        ed_counts.push(ed.len() as i64);
        ed_json.push(serde_json::to_string(&ed)?);
    }

    let mut out = df.clone();
    out.with_column(string_list_series(&columns.hosp_entities, hosp_lists)?)?;
    out.with_column(Series::new(columns.hosp_count.as_str().into(), hosp_counts))?;
    out.with_column(Series::new(columns.ed_entities.as_str().into(), ed_json))?;
    out.with_column(Series::new(columns.ed_count.as_str().into(), ed_counts))?;

    info!(
        rows = stats.rows,
        hosp_tagged = stats.rows_with_hosp_entities,
        ed_tagged = stats.rows_with_ed_entities,
        "applied entity extraction"
    );
    Ok((out, stats))
}
