//! CLI argument definitions for `mimic-flatten`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "mimic-flatten",
    version,
    about = "Flatten MIMIC extracts into per-admission feature tables",
    long_about = "Flatten MIMIC-style hospital, ICU, ED and ECG extracts.\n\n\
                  `run` builds the per-admission master table and tags cardiovascular\n\
                  entities; `temporal` flattens machine-generated ECG reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity. Stage progress shows by default; -v for debug,
    /// -vv for trace, -q for warnings only, -qq for errors only.
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the master table, then tag diagnosis entities.
    Run(RunArgs),

    /// Flatten ECG machine reports into one row per study.
    Temporal(TemporalArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Static pipeline configuration.
    #[arg(
        long = "config",
        value_name = "PATH",
        default_value = mimic_ingest::DEFAULT_STATIC_CONFIG
    )]
    pub config: PathBuf,

    /// Read the previously written master table instead of rebuilding it.
    #[arg(long = "skip-static")]
    pub skip_static: bool,

    /// Stop after the master table.
    #[arg(long = "skip-entities")]
    pub skip_entities: bool,

    /// Master table path (overrides `paths.out_path`).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct TemporalArgs {
    /// Temporal pipeline configuration.
    #[arg(
        long = "config",
        value_name = "PATH",
        default_value = mimic_ingest::DEFAULT_TEMPORAL_CONFIG
    )]
    pub config: PathBuf,

    /// Report table path (overrides `paths.out_path`).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn stage_progress_is_logged_by_default() {
        let cli = Cli::parse_from(["mimic-flatten", "run"]);
        assert_eq!(cli.verbosity.tracing_level_filter(), LevelFilter::INFO);
        assert!(matches!(cli.command, Command::Run(_)));
    }

    #[test]
    fn quiet_flag_drops_to_warnings() {
        let cli = Cli::parse_from(["mimic-flatten", "-q", "temporal"]);
        assert_eq!(cli.verbosity.tracing_level_filter(), LevelFilter::WARN);
    }
}
