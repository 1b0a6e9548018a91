//! Whole-word keyword matching.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EntityError, Result};
use crate::keywords::KeywordSets;
use crate::text::FreeText;

/// One keyword and its word-boundary pattern.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword: String,
    pattern: Regex,
}

impl KeywordMatcher {
    pub fn new(keyword: &str) -> Result<Self> {
        let keyword = keyword.to_lowercase();
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&keyword))).map_err(|e| {
            EntityError::Pattern {
                keyword: keyword.clone(),
                source: e,
            }
        })?;
        Ok(Self { keyword, pattern })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// `text` must already be lowercase.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Compiled keyword sets.
#[derive(Debug, Clone)]
pub struct EntityTagger {
    hosp: Vec<KeywordMatcher>,
    ed: Vec<(String, Vec<KeywordMatcher>)>,
}

impl EntityTagger {
    pub fn new(sets: &KeywordSets) -> Result<Self> {
        let hosp = sets
            .hosp
            .iter()
            .map(|keyword| KeywordMatcher::new(keyword))
            .collect::<Result<Vec<_>>>()?;
        let mut ed = Vec::with_capacity(sets.ed.len());
        for (category, phrases) in &sets.ed {
            let matchers = phrases
                .iter()
                .map(|phrase| KeywordMatcher::new(phrase))
                .collect::<Result<Vec<_>>>()?;
            ed.push((category.clone(), matchers));
        }
        Ok(Self { hosp, ed })
    }

    /// Hospital keywords found in the text, deduplicated, in keyword order.
    pub fn hosp_entities(&self, input: &FreeText) -> Vec<String> {
        let Some(text) = input.searchable() else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        self.hosp
            .iter()
            .filter(|matcher| matcher.is_match(&text))
            .filter(|matcher| seen.insert(matcher.keyword().to_string()))
            .map(|matcher| matcher.keyword().to_string())
            .collect()
    }

    /// Matched ED phrases per category. Categories without a match are
    /// left out, so nothing found yields an empty map.
    pub fn ed_entities(&self, input: &FreeText) -> BTreeMap<String, Vec<String>> {
        let mut found = BTreeMap::new();
        let Some(text) = input.searchable() else {
            return found;
        };
        for (category, matchers) in &self.ed {
            let mut seen = BTreeSet::new();
            let hits: Vec<String> = matchers
                .iter()
                .filter(|matcher| matcher.is_match(&text))
                .filter(|matcher| seen.insert(matcher.keyword().to_string()))
                .map(|matcher| matcher.keyword().to_string())
                .collect();
            if !hits.is_empty() {
                found.insert(category.clone(), hits);
            }
        }
        found
    }
}

static DEFAULT_TAGGER: LazyLock<EntityTagger> = LazyLock::new(|| {
    EntityTagger::new(&KeywordSets::default()).expect("built-in keywords compile")
});

/// Tag hospital diagnosis text with the built-in keywords.
pub fn extract_hosp_entities(input: impl Into<FreeText>) -> Vec<String> {
    DEFAULT_TAGGER.hosp_entities(&input.into())
}

/// Tag ED diagnosis text with the built-in categories.
pub fn extract_ed_entities(input: impl Into<FreeText>) -> BTreeMap<String, Vec<String>> {
    DEFAULT_TAGGER.ed_entities(&input.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_input_yields_nothing() {
        assert!(extract_hosp_entities(None::<&str>).is_empty());
        assert!(extract_ed_entities(None::<&str>).is_empty());
    }

    #[test]
    fn hospital_keywords_need_whole_words() {
        let found = extract_hosp_entities("Pt has atrial fibrillation and chf");
        assert!(found.contains(&"fibrillation".to_string()));
        assert!(found.contains(&"atrial".to_string()));
        assert!(!found.contains(&"chf".to_string()));

        assert!(extract_hosp_entities("Hypertensives").is_empty());
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(
            extract_hosp_entities("ACUTE MYOCARDIAL INFARCTION"),
            vec!["infarction".to_string(), "myocardial".to_string()]
        );
    }

    #[test]
    fn list_input_is_joined() {
        let titles = vec![Some("Chest pain, unspecified".to_string()), None];
        let found = extract_ed_entities(titles);
        assert_eq!(found.len(), 1);
        assert_eq!(found["Chest Pain / Symptoms"], vec!["chest pain".to_string()]);
    }

    #[test]
    fn every_matching_phrase_is_reported() {
        let found = extract_ed_entities("Unspecified atrial fibrillation");
        assert_eq!(
            found["Arrhythmia"],
            vec![
                "atrial fibrillation".to_string(),
                "unspecified atrial fibrillation".to_string()
            ]
        );
    }

    #[test]
    fn custom_keywords_are_escaped() {
        let sets = KeywordSets {
            hosp: vec!["a.b".to_string()],
            ed: BTreeMap::new(),
        };
        let tagger = EntityTagger::new(&sets).unwrap();
        assert!(tagger.hosp_entities(&FreeText::from("a.b")).contains(&"a.b".to_string()));
        assert!(tagger.hosp_entities(&FreeText::from("axb")).is_empty());
    }
}
