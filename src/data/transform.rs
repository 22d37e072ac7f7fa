use std::collections::{BTreeSet, HashSet};
use std::fmt;

use log::{debug, info};
use serde::Serialize;

use super::model::{Column, ColumnKind, Dataset, Value};
use super::stats::Quartiles;
use crate::config::PrepConfig;

// ---------------------------------------------------------------------------
// Step – one elementary cleaning operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    DropMissing,
    RemoveOutliers,
    Normalize,
    EncodeCategorical,
}

impl Step {
    /// The fixed order used by "preprocess all".
    pub const PIPELINE: [Step; 4] = [
        Step::DropMissing,
        Step::RemoveOutliers,
        Step::Normalize,
        Step::EncodeCategorical,
    ];

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Step::DropMissing => "Handle Missing Values",
            Step::RemoveOutliers => "Remove Outliers",
            Step::Normalize => "Normalize Data",
            Step::EncodeCategorical => "Encode Categorical Data",
        }
    }

    /// Run the step on an owned dataset.
    pub fn run(self, ds: Dataset, cfg: &PrepConfig) -> StepOutcome {
        let outcome = match self {
            Step::DropMissing => drop_missing(ds),
            Step::RemoveOutliers => remove_outliers(ds, cfg),
            Step::Normalize => normalize(ds, cfg),
            Step::EncodeCategorical => encode_categorical(ds),
        };
        info!("{}", outcome.report);
        outcome
    }
}

// ---------------------------------------------------------------------------
// Step results
// ---------------------------------------------------------------------------

/// What a step did, for the status log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub message: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub cols_before: usize,
    pub cols_after: usize,
    /// The step found nothing to work on and left the dataset untouched.
    pub skipped: bool,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub dataset: Dataset,
    pub report: StepReport,
}

impl StepOutcome {
    fn new(step: Step, before: (usize, usize), dataset: Dataset, message: String) -> Self {
        let report = StepReport {
            step,
            message,
            rows_before: before.0,
            rows_after: dataset.n_rows(),
            cols_before: before.1,
            cols_after: dataset.n_cols(),
            skipped: false,
        };
        Self { dataset, report }
    }

    fn skipped(step: Step, dataset: Dataset, message: &str) -> Self {
        let mut outcome = Self::new(
            step,
            (dataset.n_rows(), dataset.n_cols()),
            dataset,
            message.to_string(),
        );
        outcome.report.skipped = true;
        outcome
    }
}

fn shape(ds: &Dataset) -> (usize, usize) {
    (ds.n_rows(), ds.n_cols())
}

// ---------------------------------------------------------------------------
// Missing values
// ---------------------------------------------------------------------------

/// Drop every row that has a missing cell in any column.
pub fn drop_missing(ds: Dataset) -> StepOutcome {
    let before = shape(&ds);
    let keep: Vec<bool> = (0..ds.n_rows())
        .map(|row| ds.columns().iter().all(|c| !c.values[row].is_null()))
        .collect();
    let ds = ds.retain_rows(&keep);
    let dropped = before.0 - ds.n_rows();
    let message = format!(
        "Missing values handled: dropped {dropped} of {} rows.",
        before.0
    );
    StepOutcome::new(Step::DropMissing, before, ds, message)
}

// ---------------------------------------------------------------------------
// Outliers
// ---------------------------------------------------------------------------

/// Drop rows where any numeric cell lies outside its column's IQR fences.
///
/// Fences come from the dataset as passed in; they are not recomputed while
/// rows are being removed. Missing cells never flag a row.
pub fn remove_outliers(ds: Dataset, cfg: &PrepConfig) -> StepOutcome {
    let numeric = ds.indices_of(ColumnKind::Numeric);
    if numeric.is_empty() {
        return StepOutcome::skipped(
            Step::RemoveOutliers,
            ds,
            "No numeric columns to check for outliers.",
        );
    }
    let before = shape(&ds);

    let fences: Vec<(usize, f64, f64)> = numeric
        .iter()
        .filter_map(|&idx| {
            let column = ds.column(idx);
            let q = Quartiles::of(&column.values, cfg.lower_quantile, cfg.upper_quantile)?;
            let (lo, hi) = q.fences(cfg.iqr_multiplier);
            debug!(
                "{}: Q1={} Q3={} IQR={} fences=[{lo}, {hi}]",
                column.name,
                q.q1,
                q.q3,
                q.iqr()
            );
            Some((idx, lo, hi))
        })
        .collect();

    let keep: Vec<bool> = (0..ds.n_rows())
        .map(|row| {
            fences.iter().all(|&(col, lo, hi)| {
                match ds.value(row, col).as_f64() {
                    Some(v) if !v.is_nan() => v >= lo && v <= hi,
                    _ => true,
                }
            })
        })
        .collect();

    let ds = ds.retain_rows(&keep);
    let dropped = before.0 - ds.n_rows();
    let message = format!(
        "Outliers removed: dropped {dropped} of {} rows across {} numeric columns.",
        before.0,
        numeric.len()
    );
    StepOutcome::new(Step::RemoveOutliers, before, ds, message)
}

// ---------------------------------------------------------------------------
// Robust scaling
// ---------------------------------------------------------------------------

/// Replace every numeric cell with `(value - median) / IQR`.
///
/// A zero IQR is treated as 1, so a constant column becomes all zeros.
/// Missing cells stay missing; a column without numbers is left alone.
pub fn normalize(mut ds: Dataset, cfg: &PrepConfig) -> StepOutcome {
    let numeric = ds.indices_of(ColumnKind::Numeric);
    if numeric.is_empty() {
        return StepOutcome::skipped(Step::Normalize, ds, "No numeric columns to normalize.");
    }
    let before = shape(&ds);

    let mut scaled = 0;
    for idx in numeric {
        let column = ds.column(idx);
        let Some(q) = Quartiles::of(&column.values, cfg.lower_quantile, cfg.upper_quantile)
        else {
            debug!("{}: no numeric values, left as is", column.name);
            continue;
        };
        let iqr = q.iqr();
        let scale = if iqr == 0.0 || !iqr.is_finite() { 1.0 } else { iqr };
        debug!("{}: median={} scale={scale}", column.name, q.median);

        ds.map_column(idx, |v| match v.as_f64() {
            Some(x) if !x.is_nan() => Value::Float((x - q.median) / scale),
            _ => Value::Null,
        });
        scaled += 1;
    }

    let message = format!("Data normalized: scaled {scaled} numeric columns by median and IQR.");
    StepOutcome::new(Step::Normalize, before, ds, message)
}

// ---------------------------------------------------------------------------
// One-hot encoding
// ---------------------------------------------------------------------------

/// Replace each categorical column by drop-first boolean indicator columns.
///
/// Levels are the distinct non-null labels in lexicographic order; the first
/// one is the reference level and gets no column. Indicators are appended
/// after the remaining columns, named `<column>_<level>`.
pub fn encode_categorical(ds: Dataset) -> StepOutcome {
    let categorical = ds.indices_of(ColumnKind::Categorical);
    if categorical.is_empty() {
        return StepOutcome::skipped(
            Step::EncodeCategorical,
            ds,
            "No categorical columns to encode.",
        );
    }
    let before = shape(&ds);
    let n_rows = ds.n_rows();
    let encoded: HashSet<usize> = categorical.iter().copied().collect();

    let mut kept = Vec::with_capacity(ds.n_cols());
    let mut sources = Vec::with_capacity(categorical.len());
    for (idx, column) in ds.into_columns().into_iter().enumerate() {
        if encoded.contains(&idx) {
            sources.push(column);
        } else {
            kept.push(column);
        }
    }

    let mut taken: HashSet<String> = kept.iter().map(|c| c.name.clone()).collect();
    let mut indicators = Vec::new();
    for column in &sources {
        let labels: Vec<Option<String>> = column
            .values
            .iter()
            .map(|v| (!v.is_null()).then(|| v.label()))
            .collect();
        let levels: BTreeSet<&str> = labels.iter().flatten().map(String::as_str).collect();

        for level in levels.into_iter().skip(1) {
            let name = unique_name(format!("{}_{level}", column.name), &mut taken);
            let values = labels
                .iter()
                .map(|l| Value::Bool(l.as_deref() == Some(level)))
                .collect();
            indicators.push(Column::new(name, values));
        }
    }

    let added = indicators.len();
    kept.extend(indicators);
    let ds = Dataset::from_columns_unchecked(kept, n_rows);
    let message = format!(
        "Categorical data encoded: replaced {} columns with {added} indicator columns.",
        sources.len()
    );
    StepOutcome::new(Step::EncodeCategorical, before, ds, message)
}

/// `base`, or `base_1`, `base_2`, ... if already taken. Records the result.
fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut n = 1;
    while taken.contains(&name) {
        name = format!("{base}_{n}");
        n += 1;
    }
    taken.insert(name.clone());
    name
}
