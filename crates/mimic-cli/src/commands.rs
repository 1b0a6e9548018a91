use anyhow::{Context, Result};
use tracing::info_span;

use mimic_cli::pipeline::{RunOptions, override_output, run_static, run_temporal};
use mimic_cli::types::RunResult;
use mimic_ingest::{load_static_config, load_temporal_config};

use crate::cli::{RunArgs, TemporalArgs};

pub fn run_run(args: &RunArgs) -> Result<RunResult> {
    let span = info_span!("run", config = %args.config.display());
    let _guard = span.enter();
    let mut config = load_static_config(&args.config)
        .with_context(|| format!("load config {}", args.config.display()))?;
    override_output(&mut config.paths.out_path, args.output.as_deref());
    let options = RunOptions {
        skip_static: args.skip_static,
        skip_entities: args.skip_entities,
    };
    run_static(&config, options)
}

pub fn run_temporal_command(args: &TemporalArgs) -> Result<RunResult> {
    let span = info_span!("temporal_run", config = %args.config.display());
    let _guard = span.enter();
    let mut config = load_temporal_config(&args.config)
        .with_context(|| format!("load config {}", args.config.display()))?;
    override_output(&mut config.paths.out_path, args.output.as_deref());
    run_temporal(&config)
}
