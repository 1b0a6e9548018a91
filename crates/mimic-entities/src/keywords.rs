//! Cardiovascular keyword sets.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use mimic_model::EntityConfig;

/// Single-word cues searched in hospital diagnosis titles.
pub const DEFAULT_HOSP_KEYWORDS: [&str; 24] = [
    "heart",
    "coronary",
    "infarction",
    "atrial",
    "fibrillation",
    "myocardial",
    "ventricular",
    "vascular",
    "congestive",
    "systolic",
    "diastolic",
    "hypertension",
    "hypertensive",
    "artery",
    "ischemia",
    "block",
    "bundle",
    "rbbb",
    "lbbb",
    "tachycardia",
    "bradycardia",
    "valve",
    "stenosis",
    "oxygen",
];

/// Phrase categories searched in ED diagnosis titles.
pub const DEFAULT_ED_KEYWORDS: [(&str, &[&str]); 7] = [
    (
        "Arrhythmia",
        &[
            "atrial fibrillation",
            "atrial flutter",
            "unspecified atrial fibrillation",
            "unspecified atrial flutter",
            "palpitations",
            "ventricular tachycardia",
            "bradycardia",
            "dysrhythmia",
        ],
    ),
    (
        "Ischemic",
        &[
            "myocardial infarction",
            "infarction",
            "stemi",
            "nstemi",
            "acute ischemic heart disease",
            "intermed coronary synd",
        ],
    ),
    (
        "Heart Failure",
        &["heart failure", "congestive heart failure", "chf"],
    ),
    (
        "Chest Pain / Symptoms",
        &[
            "chest pain",
            "other chest pain",
            "chest pain nos",
            "upper quadrant pain",
            "shortness of breath",
            "dyspnea",
            "syncope",
            "collapse",
            "dizziness",
            "giddiness",
        ],
    ),
    (
        "Vascular / Embolic",
        &[
            "pulmonary embolism",
            "embolism",
            "cerebral infarction",
            "cerebral art occlus",
            "infarct",
        ],
    ),
    ("Cardiac Arrest", &["cardiac arrest", "asystole"]),
    (
        "Structural / Cardiomyopathy",
        &["cardiomyopathy", "hypertrophy"],
    ),
];

/// Keywords used by the tagger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSets {
    pub hosp: Vec<String>,
    pub ed: BTreeMap<String, Vec<String>>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self {
            hosp: DEFAULT_HOSP_KEYWORDS
                .iter()
                .map(|keyword| (*keyword).to_string())
                .collect(),
            ed: DEFAULT_ED_KEYWORDS
                .iter()
                .map(|(category, phrases)| {
                    let phrases = phrases.iter().map(|phrase| (*phrase).to_string()).collect();
                    ((*category).to_string(), phrases)
                })
                .collect(),
        }
    }
}

impl KeywordSets {
    /// Built-in sets with any configured replacements applied.
    pub fn from_config(config: &EntityConfig) -> Self {
        let defaults = Self::default();
        Self {
            hosp: config.hosp_keywords.clone().unwrap_or(defaults.hosp),
            ed: config.ed_keywords.clone().unwrap_or(defaults.ed),
        }
    }

    /// Drop hospital keywords that are not among `top_words`.
    pub fn restrict_hosp_to(&self, top_words: &[String]) -> Self {
        Self {
            hosp: filter_keywords(&self.hosp, top_words),
            ed: self.ed.clone(),
        }
    }
}

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word pattern compiles"));

/// The `n` most frequent lowercase words across `texts`.
///
/// Ties are broken by first appearance.
pub fn top_words<'a, I>(texts: I, n: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut next = 0usize;
    for text in texts {
        let lower = text.to_lowercase();
        for word in WORD.find_iter(&lower) {
            let entry = counts.entry(word.as_str().to_string()).or_insert_with(|| {
                next += 1;
                (0, next)
            });
            entry.0 += 1;
        }
    }
    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (a_count, a_first)), (_, (b_count, b_first))| {
        b_count.cmp(a_count).then(a_first.cmp(b_first))
    });
    ranked.into_iter().take(n).map(|(word, _)| word).collect()
}

/// Keywords that appear in `top_words`, in keyword order.
pub fn filter_keywords(keywords: &[String], top_words: &[String]) -> Vec<String> {
    let top: BTreeSet<&str> = top_words.iter().map(String::as_str).collect();
    keywords
        .iter()
        .filter(|keyword| top.contains(keyword.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_lists_replace_defaults() {
        let config = EntityConfig {
            hosp_keywords: Some(vec!["sepsis".to_string()]),
            ..EntityConfig::default()
        };
        let sets = KeywordSets::from_config(&config);
        assert_eq!(sets.hosp, vec!["sepsis".to_string()]);
        assert_eq!(sets.ed.len(), DEFAULT_ED_KEYWORDS.len());
    }

    #[test]
    fn top_words_rank_by_frequency_then_first_seen() {
        let texts = ["Atrial fibrillation", "Heart failure", "atrial flutter, heart"];
        assert_eq!(top_words(texts, 2), vec!["atrial", "heart"]);
    }

    #[test]
    fn filtering_keeps_keyword_order() {
        let keywords = vec!["heart".to_string(), "atrial".to_string(), "valve".to_string()];
        let top = vec!["atrial".to_string(), "heart".to_string()];
        assert_eq!(filter_keywords(&keywords, &top), vec!["heart", "atrial"]);
    }
}
