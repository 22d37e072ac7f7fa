use std::path::Path;

use crate::color::ColumnPalette;
use crate::config::PrepConfig;
use crate::data::model::ColumnKind;
use crate::data::pipeline;
use crate::data::store::DataStore;
use crate::data::summary::{
    BoxSummary, Distribution, describe_distribution, describe_outlier_boxplot,
};
use crate::data::transform::{Step, StepReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Table,
    Distribution,
    Boxplot,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// The dataset being cleaned.
    pub store: DataStore,

    pub config: PrepConfig,

    pub view: View,

    /// Messages of the last user action (cleared on every action).
    pub output: Vec<String>,

    /// Every step run since the last load.
    pub history: Vec<StepReport>,

    /// Error of the last action, shown in red.
    pub status_message: Option<String>,

    /// Summaries of the current dataset (cached).
    pub distribution: Distribution,
    pub boxes: Vec<BoxSummary>,
    pub missing_cells: usize,

    pub palette: ColumnPalette,
}

impl AppState {
    /// Load a file as the new dataset. On failure the current one is kept.
    pub fn open(&mut self, path: &Path) {
        self.clear_output();
        match self.store.load(path, &self.config) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.n_rows(),
                    dataset.column_names()
                );
                self.history.clear();
                self.view = View::Table;
                self.output.push("Dataset loaded successfully!".to_string());
                self.refresh();
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Run one cleaning step on the current dataset.
    pub fn apply(&mut self, step: Step) {
        self.clear_output();
        if self.store.source().is_none() {
            self.output.push("Load a dataset first.".to_string());
            return;
        }
        let report = self.store.apply(step, &self.config);
        self.output.push(report.message.clone());
        self.history.push(report);
        self.view = View::Table;
        self.refresh();
    }

    /// Load `path` afresh and run every step on it.
    pub fn preprocess_all(&mut self, path: &Path) {
        self.clear_output();
        match self.store.apply_all(path, &self.config) {
            Ok(log) => {
                self.output.extend(pipeline::summary(&log));
                self.history = log;
                self.view = View::Table;
                self.refresh();
            }
            Err(e) => {
                log::error!("Preprocessing failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn show_distribution(&mut self) {
        self.clear_output();
        self.output
            .push("Displaying data distribution after scaling.".to_string());
        self.view = View::Distribution;
    }

    pub fn show_boxplot(&mut self) {
        self.clear_output();
        self.output
            .push("Displaying boxplot after removing outliers.".to_string());
        self.view = View::Boxplot;
    }

    /// The step history as pretty JSON, for the clipboard.
    pub fn history_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.history)
    }

    fn clear_output(&mut self) {
        self.output.clear();
        self.status_message = None;
    }

    /// Recompute plot summaries and colours after the dataset changed.
    fn refresh(&mut self) {
        let ds = self.store.get();
        self.distribution = describe_distribution(ds, &self.config);
        self.boxes = describe_outlier_boxplot(ds, &self.config);
        self.missing_cells = ds.null_count();
        self.palette = ColumnPalette::new(
            ds.indices_of(ColumnKind::Numeric)
                .into_iter()
                .map(|i| ds.column(i).name.as_str()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "age,city\n20,Oslo\n,Rome\n30,Oslo\n25,Rome\n").unwrap();
        path
    }

    #[test]
    fn step_without_data_asks_for_a_file() {
        let mut state = AppState::default();
        state.apply(Step::Normalize);
        assert_eq!(state.output, vec!["Load a dataset first.".to_string()]);
        assert!(state.history.is_empty());
    }

    #[test]
    fn open_then_apply_updates_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.open(&sample(&dir));
        assert_eq!(state.output, vec!["Dataset loaded successfully!".to_string()]);
        assert_eq!(state.boxes.len(), 1);

        state.apply(Step::DropMissing);
        assert_eq!(state.store.get().n_rows(), 3);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.output.len(), 1);

        let json = state.history_json().unwrap();
        assert!(json.contains("\"DropMissing\""));
        assert!(json.contains("\"rows_after\": 3"));
    }

    #[test]
    fn steps_still_run_after_every_column_is_encoded_away() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.csv");
        std::fs::write(&path, "k\nx\nx\n").unwrap();
        let mut state = AppState::default();
        state.open(&path);

        state.apply(Step::EncodeCategorical);
        assert!(state.store.get().is_empty());
        assert_eq!(state.store.get().n_rows(), 2);

        state.apply(Step::DropMissing);
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history[1].rows_after, 2);
        assert_ne!(state.output, vec!["Load a dataset first.".to_string()]);
    }

    #[test]
    fn missing_cells_are_counted_on_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.open(&sample(&dir));
        assert_eq!(state.missing_cells, 1);
        state.apply(Step::DropMissing);
        assert_eq!(state.missing_cells, 0);
    }

    #[test]
    fn failed_open_sets_error_and_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.open(&sample(&dir));
        state.open(&dir.path().join("missing.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
        assert_eq!(state.store.get().n_rows(), 4);
    }

    #[test]
    fn preprocess_all_reports_every_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.preprocess_all(&sample(&dir));
        assert_eq!(state.output.len(), 5);
        assert_eq!(state.history.len(), 4);
        assert_eq!(state.store.get().column_names(), vec!["age", "city_Rome"]);
    }

    #[test]
    fn plot_buttons_switch_view() {
        let mut state = AppState::default();
        state.show_boxplot();
        assert_eq!(state.view, View::Boxplot);
        state.show_distribution();
        assert_eq!(state.view, View::Distribution);
    }
}
