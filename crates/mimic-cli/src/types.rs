use std::path::PathBuf;

/// What one stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: &'static str,
    pub rows: usize,
    pub columns: usize,
    /// Written table; `None` when the stage only read an existing one.
    pub output: Option<PathBuf>,
    /// Stage-specific counts shown next to the table.
    pub details: Vec<(String, usize)>,
    pub duration_ms: u128,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub stages: Vec<StageSummary>,
}

