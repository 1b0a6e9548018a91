//! Declarative pipeline configuration.
//!
//! Each pipeline reads one JSON file naming the input directory, the output
//! table and the relative path of every source extract.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::schema::SourceKind;

/// Input directory and output table location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub in_dir: PathBuf,
    pub out_path: PathBuf,
}

/// Relative paths of the static extracts within `in_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticSources {
    pub patients: PathBuf,
    pub admissions: PathBuf,
    pub hosp_diagnosis: PathBuf,
    pub drgcodes: PathBuf,
    pub icustays: PathBuf,
    pub edstays: PathBuf,
    pub ed_diagnosis: PathBuf,
    pub record_list: PathBuf,
}

impl StaticSources {
    /// Relative path for a static source; `None` for sources outside the
    /// static pipeline.
    pub fn path_for(&self, kind: SourceKind) -> Option<&Path> {
        let path = match kind {
            SourceKind::Patients => &self.patients,
            SourceKind::Admissions => &self.admissions,
            SourceKind::HospDiagnosis => &self.hosp_diagnosis,
            SourceKind::DrgCodes => &self.drgcodes,
            SourceKind::IcuStays => &self.icustays,
            SourceKind::EdStays => &self.edstays,
            SourceKind::EdDiagnosis => &self.ed_diagnosis,
            SourceKind::RecordList => &self.record_list,
            SourceKind::MachineMeasurements => return None,
        };
        Some(path.as_path())
    }
}

/// Entity-extraction settings. Keyword lists replace the built-in
/// cardiovascular sets when given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Where the tagged table is written; defaults to the static output
    /// path with an `_entities` suffix.
    #[serde(default)]
    pub out_path: Option<PathBuf>,
    #[serde(default)]
    pub hosp_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub ed_keywords: Option<BTreeMap<String, Vec<String>>>,
    /// Keep only hospital keywords among the N most frequent words of the
    /// hospital diagnosis titles.
    #[serde(default)]
    pub top_words: Option<usize>,
}

/// Configuration of the static (master table) pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticConfig {
    pub paths: PathsConfig,
    pub static_sources: StaticSources,
    #[serde(default)]
    pub entities: EntityConfig,
}

impl StaticConfig {
    /// Absolute-or-relative path of a source file, resolved against `in_dir`.
    pub fn source_path(&self, kind: SourceKind) -> Option<PathBuf> {
        self.static_sources
            .path_for(kind)
            .map(|relative| self.paths.in_dir.join(relative))
    }

    /// Output path of the entity-tagged table.
    pub fn entities_out_path(&self) -> PathBuf {
        if let Some(path) = &self.entities.out_path {
            return path.clone();
        }
        let out = &self.paths.out_path;
        let stem = out
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "static_features".to_string());
        let file_name = match out.extension() {
            Some(ext) => format!("{stem}_entities.{}", ext.to_string_lossy()),
            None => format!("{stem}_entities"),
        };
        out.with_file_name(file_name)
    }
}

/// Relative path of the ECG report extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalSources {
    pub machine_measurements: PathBuf,
}

/// Configuration of the temporal (ECG report) pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalConfig {
    pub paths: PathsConfig,
    pub temporal_sources: TemporalSources,
    /// Machine messages that mark a report as unusable; built-in list when
    /// absent.
    #[serde(default)]
    pub invalid_phrases: Option<Vec<String>>,
}

impl TemporalConfig {
    pub fn source_path(&self) -> PathBuf {
        self.paths
            .in_dir
            .join(&self.temporal_sources.machine_measurements)
    }
}
