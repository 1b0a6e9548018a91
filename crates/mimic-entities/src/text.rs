//! Tagger input, coerced once at the boundary.

use polars::prelude::AnyValue;

use mimic_common::{any_to_string, any_to_string_list};

/// Diagnosis text as it arrives from a table cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FreeText {
    #[default]
    Missing,
    Text(String),
    /// List cell; null elements are skipped when joined.
    Fragments(Vec<Option<String>>),
}

impl FreeText {
    /// Lowercased searchable text; `None` for a missing value.
    pub fn searchable(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Text(text) => Some(text.to_lowercase()),
            Self::Fragments(fragments) => {
                let joined = fragments
                    .iter()
                    .flatten()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(joined.to_lowercase())
            }
        }
    }

    /// Coerce a Polars cell: lists become fragments, null is missing.
    pub fn from_any(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Missing,
            AnyValue::List(_) => any_to_string_list(value).map_or(Self::Missing, Self::Fragments),
            other => Self::Text(any_to_string(other)),
        }
    }
}

impl From<&str> for FreeText {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FreeText {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FreeText>> From<Option<T>> for FreeText {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

impl From<Vec<Option<String>>> for FreeText {
    fn from(value: Vec<Option<String>>) -> Self {
        Self::Fragments(value)
    }
}

impl From<Vec<String>> for FreeText {
    fn from(value: Vec<String>) -> Self {
        Self::Fragments(value.into_iter().map(Some).collect())
    }
}

impl From<&[&str]> for FreeText {
    fn from(value: &[&str]) -> Self {
        Self::Fragments(value.iter().map(|part| Some((*part).to_string())).collect())
    }
}
