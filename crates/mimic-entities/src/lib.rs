//! Rule-based cardiovascular entity tagging.
//!
//! Hospital diagnosis titles are searched for single-word cues; ED
//! diagnosis titles for phrases grouped into clinical categories. Matching
//! is whole-word and case-insensitive.

pub mod error;
pub mod frame;
pub mod keywords;
pub mod tagger;
pub mod text;

pub use error::{EntityError, Result};
pub use frame::{EntityColumns, EntityStats, apply_entity_extraction, tagger_for_frame};
pub use keywords::{
    DEFAULT_ED_KEYWORDS, DEFAULT_HOSP_KEYWORDS, KeywordSets, filter_keywords, top_words,
};
pub use tagger::{EntityTagger, KeywordMatcher, extract_ed_entities, extract_hosp_entities};
pub use text::FreeText;
