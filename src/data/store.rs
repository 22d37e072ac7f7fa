use std::path::{Path, PathBuf};

use anyhow::Result;

use super::loader::{LoadError, load_file};
use super::model::Dataset;
use super::pipeline::{PipelineRun, preprocess_all};
use super::transform::{Step, StepReport};
use crate::config::PrepConfig;

// ---------------------------------------------------------------------------
// DataStore – owner of the current table
// ---------------------------------------------------------------------------

/// Holds the one dataset the application works on.
///
/// Every operation either replaces the dataset wholesale or leaves it as it
/// was; a failed load never clobbers the current state.
#[derive(Debug, Default)]
pub struct DataStore {
    dataset: Dataset,
    source: Option<PathBuf>,
}

impl DataStore {
    /// Read `path` and make it the current dataset.
    pub fn load(&mut self, path: &Path, cfg: &PrepConfig) -> Result<&Dataset, LoadError> {
        let dataset = load_file(path, cfg)?;
        self.source = Some(path.to_path_buf());
        self.dataset = dataset;
        Ok(&self.dataset)
    }

    pub fn get(&self) -> &Dataset {
        &self.dataset
    }

    pub fn replace(&mut self, dataset: Dataset) {
        self.dataset = dataset;
    }

    /// File the current dataset was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Run one step on the current dataset.
    pub fn apply(&mut self, step: Step, cfg: &PrepConfig) -> StepReport {
        let current = std::mem::take(&mut self.dataset);
        let outcome = step.run(current, cfg);
        self.dataset = outcome.dataset;
        outcome.report
    }

    /// Load `path` afresh and run the full pipeline; on success the result
    /// becomes the current dataset.
    pub fn apply_all(&mut self, path: &Path, cfg: &PrepConfig) -> Result<Vec<StepReport>> {
        let PipelineRun { dataset, log } = preprocess_all(path, cfg)?;
        self.source = Some(path.to_path_buf());
        self.dataset = dataset;
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = DataStore::default();
        assert!(store.get().is_empty());
        assert!(store.source().is_none());
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(&good, "a,b\n1,x\n,y\n").unwrap();
        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, "a,b\n1,2,3\n").unwrap();

        let cfg = PrepConfig::default();
        let mut store = DataStore::default();
        store.load(&good, &cfg).unwrap();
        let before = store.get().clone();

        assert!(store.load(&bad, &cfg).is_err());
        assert!(store.apply_all(&bad, &cfg).is_err());
        assert_eq!(store.get(), &before);
        assert_eq!(store.source(), Some(good.as_path()));
    }

    #[test]
    fn apply_replaces_the_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.csv");
        std::fs::write(&path, "a,b\n1,x\n,y\n").unwrap();

        let cfg = PrepConfig::default();
        let mut store = DataStore::default();
        store.load(&path, &cfg).unwrap();

        let report = store.apply(Step::DropMissing, &cfg);
        assert_eq!(report.rows_after, 1);
        assert_eq!(store.get().n_rows(), 1);

        // A single remaining level encodes to nothing.
        store.apply(Step::EncodeCategorical, &cfg);
        assert_eq!(store.get().column_names(), vec!["a"]);
    }

    #[test]
    fn apply_all_installs_the_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.csv");
        std::fs::write(&path, "n,c\n1,x\n2,y\n3,x\n").unwrap();

        let mut store = DataStore::default();
        let log = store.apply_all(&path, &PrepConfig::default()).unwrap();
        assert_eq!(log.len(), 4);
        assert_eq!(store.get().column_names(), vec!["n", "c_y"]);
    }

    #[test]
    fn replace_swaps_wholesale() {
        let mut store = DataStore::default();
        let ds = crate::data::loader::read_json(r#"[{"a": 1}]"#.as_bytes()).unwrap();
        store.replace(ds.clone());
        assert_eq!(store.get(), &ds);
    }
}
