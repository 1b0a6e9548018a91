//! Stage runners shared by the subcommands.
//!
//! Each stage computes its whole table before writing anything, so a fatal
//! error leaves no partial output behind.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use mimic_core::run_static_pipeline;
use mimic_entities::{EntityColumns, apply_entity_extraction, tagger_for_frame};
use mimic_ingest::{load_report_source, load_static_inputs, read_table};
use mimic_model::{StaticConfig, TemporalConfig};
use mimic_output::{build_master_frame, write_table};
use mimic_transform::{ReportOptions, flatten_reports};

use crate::types::{RunResult, StageSummary};

/// Switches of the `run` subcommand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub skip_static: bool,
    pub skip_entities: bool,
}

/// Static stage: load every extract, merge, match ECGs and write the master
/// table to `paths.out_path`.
pub fn run_static_stage(config: &StaticConfig) -> Result<(DataFrame, StageSummary)> {
    let span = info_span!("static", in_dir = %config.paths.in_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let inputs = load_static_inputs(config).context("load static extracts")?;
    let outcome = run_static_pipeline(&inputs).context("build master table")?;
    let df = build_master_frame(&outcome.table).context("build master frame")?;
    let out_path = &config.paths.out_path;
    write_table(&df, out_path).with_context(|| format!("write {}", out_path.display()))?;

    let duration_ms = start.elapsed().as_millis();
    info!(rows = df.height(), duration_ms, "static stage complete");
    let summary = StageSummary {
        stage: "static",
        rows: df.height(),
        columns: df.width(),
        output: Some(out_path.clone()),
        details: vec![
            ("admissions".to_string(), outcome.merge.admissions),
            ("ed_only".to_string(), outcome.merge.ed_only),
            ("ecg_matched".to_string(), outcome.matching.matched),
            ("ecg_unmatched".to_string(), outcome.matching.unmatched),
        ],
        duration_ms,
    };
    Ok((df, summary))
}

/// Entity stage: tag diagnosis titles in `df` and write the tagged table.
pub fn run_entity_stage(df: &DataFrame, config: &StaticConfig) -> Result<StageSummary> {
    let out_path = config.entities_out_path();
    let span = info_span!("entities", out = %out_path.display());
    let _guard = span.enter();
    let start = Instant::now();

    let columns = EntityColumns::default();
    let tagger = tagger_for_frame(df, &config.entities, &columns).context("build keyword sets")?;
    let (tagged, stats) =
        apply_entity_extraction(df, &tagger, &columns).context("extract entities")?;
    write_table(&tagged, &out_path).with_context(|| format!("write {}", out_path.display()))?;

    let duration_ms = start.elapsed().as_millis();
    info!(rows = tagged.height(), duration_ms, "entity stage complete");
    Ok(StageSummary {
        stage: "entities",
        rows: tagged.height(),
        columns: tagged.width(),
        output: Some(out_path),
        details: vec![
            ("hosp_tagged".to_string(), stats.rows_with_hosp_entities),
            ("ed_tagged".to_string(), stats.rows_with_ed_entities),
        ],
        duration_ms,
    })
}

/// Read back a master table written by an earlier static run.
pub fn read_static_table(path: &Path) -> Result<(DataFrame, StageSummary)> {
    let df = read_table(path).with_context(|| format!("read master table {}", path.display()))?;
    info!(path = %path.display(), rows = df.height(), "reusing master table");
    let summary = StageSummary {
        stage: "static (reused)",
        rows: df.height(),
        columns: df.width(),
        output: None,
        details: Vec::new(),
        duration_ms: 0,
    };
    Ok((df, summary))
}

/// The `run` subcommand: static stage then entity stage.
pub fn run_static(config: &StaticConfig, options: RunOptions) -> Result<RunResult> {
    let mut result = RunResult::default();
    if options.skip_static && options.skip_entities {
        warn!("both stages skipped; nothing to do");
        return Ok(result);
    }

    let (df, summary) = if options.skip_static {
        read_static_table(&config.paths.out_path)?
    } else {
        run_static_stage(config)?
    };
    result.stages.push(summary);

    if !options.skip_entities {
        result.stages.push(run_entity_stage(&df, config)?);
    }
    Ok(result)
}

/// The `temporal` subcommand: flatten ECG machine reports.
pub fn run_temporal(config: &TemporalConfig) -> Result<RunResult> {
    let source = config.source_path();
    let span = info_span!("temporal", source = %source.display());
    let _guard = span.enter();
    let start = Instant::now();

    let raw = load_report_source(&source).context("load machine measurements")?;
    let options = match &config.invalid_phrases {
        Some(phrases) => ReportOptions::with_invalid_phrases(phrases.clone()),
        None => ReportOptions::default(),
    };
    let flattened = flatten_reports(&raw, &options).context("flatten reports")?;
    let out_path = &config.paths.out_path;
    write_table(&flattened.data, out_path)
        .with_context(|| format!("write {}", out_path.display()))?;

    let duration_ms = start.elapsed().as_millis();
    info!(rows = flattened.data.height(), duration_ms, "temporal stage complete");
    let stats = flattened.stats;
    Ok(RunResult {
        stages: vec![StageSummary {
            stage: "temporal",
            rows: flattened.data.height(),
            columns: flattened.data.width(),
            output: Some(out_path.clone()),
            details: vec![
                ("input_records".to_string(), stats.input_records),
                ("dropped_records".to_string(), stats.dropped_records),
                ("report_columns".to_string(), stats.report_columns),
            ],
            duration_ms,
        }],
    })
}

/// Replace the configured output path when one was given on the command line.
pub fn override_output(out_path: &mut PathBuf, output: Option<&Path>) {
    if let Some(path) = output {
        *out_path = path.to_path_buf();
    }
}
