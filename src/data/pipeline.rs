use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::loader::load_file;
use super::model::Dataset;
use super::transform::{Step, StepReport};
use crate::config::PrepConfig;

// ---------------------------------------------------------------------------
// Preprocess-all orchestration
// ---------------------------------------------------------------------------

/// Result of running every step in order.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub dataset: Dataset,
    pub log: Vec<StepReport>,
}

/// Status lines for a full run: one per step, then a completion line.
pub fn summary(log: &[StepReport]) -> Vec<String> {
    let mut lines: Vec<String> = log.iter().map(|r| r.to_string()).collect();
    lines.push("All preprocessing steps completed and cleaned data displayed.".to_string());
    lines
}

/// Run drop-missing, outlier removal, scaling and encoding in that order.
/// A skipped step hands its input unchanged to the next one.
pub fn apply_all(mut dataset: Dataset, cfg: &PrepConfig) -> PipelineRun {
    let mut log = Vec::with_capacity(Step::PIPELINE.len());
    for step in Step::PIPELINE {
        let outcome = step.run(dataset, cfg);
        dataset = outcome.dataset;
        log.push(outcome.report);
    }
    info!(
        "pipeline finished: {} rows x {} columns",
        dataset.n_rows(),
        dataset.n_cols()
    );
    PipelineRun { dataset, log }
}

/// Load a fresh dataset from `source` and run the whole pipeline on it.
pub fn preprocess_all(source: &Path, cfg: &PrepConfig) -> Result<PipelineRun> {
    let dataset =
        load_file(source, cfg).with_context(|| format!("loading {}", source.display()))?;
    info!(
        "preprocessing {} ({} rows, {} columns)",
        source.display(),
        dataset.n_rows(),
        dataset.n_cols()
    );
    Ok(apply_all(dataset, cfg))
}
