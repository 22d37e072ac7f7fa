use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Preprocessing configuration
// ---------------------------------------------------------------------------

/// Null markers recognised when reading text sources.
/// Mirrors the defaults of the common dataframe CSV readers.
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
    "nan", "null",
];

/// Tunables shared by the transform steps and the plot summaries.
///
/// Lives in [`crate::state::AppState`] for the lifetime of the process and is
/// never written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Whisker multiplier `k` in `[Q1 - k*IQR, Q3 + k*IQR]`.
    pub iqr_multiplier: f64,
    /// Lower quartile level (0..1).
    pub lower_quantile: f64,
    /// Upper quartile level (0..1).
    pub upper_quantile: f64,
    /// Cell texts read as missing values.
    pub null_markers: Vec<String>,
    /// Number of evaluation points for each density curve.
    pub kde_points: usize,
    /// Density plots per row in the distribution grid.
    pub grid_columns: usize,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            lower_quantile: 0.25,
            upper_quantile: 0.75,
            null_markers: DEFAULT_NULL_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            kde_points: 1000,
            grid_columns: 3,
        }
    }
}

impl PrepConfig {
    /// Whether `cell` (already trimmed) denotes a missing value.
    pub fn is_null_marker(&self, cell: &str) -> bool {
        self.null_markers.iter().any(|m| m == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_classic_iqr_rule() {
        let cfg = PrepConfig::default();
        assert_eq!(cfg.iqr_multiplier, 1.5);
        assert_eq!(cfg.lower_quantile, 0.25);
        assert_eq!(cfg.upper_quantile, 0.75);
        assert_eq!(cfg.grid_columns, 3);
    }

    #[test]
    fn null_markers_are_case_sensitive() {
        let cfg = PrepConfig::default();
        assert!(cfg.is_null_marker(""));
        assert!(cfg.is_null_marker("NA"));
        assert!(cfg.is_null_marker("nan"));
        assert!(!cfg.is_null_marker("Na"));
        assert!(!cfg.is_null_marker("none at all"));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: PrepConfig = serde_json::from_str(r#"{ "iqr_multiplier": 3.0 }"#).unwrap();
        assert_eq!(cfg.iqr_multiplier, 3.0);
        assert_eq!(cfg.kde_points, 1000);
        assert!(cfg.is_null_marker("NULL"));
    }
}
