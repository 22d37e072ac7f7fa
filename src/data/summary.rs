//! Plot-ready summaries of the numeric columns: density curves for the
//! distribution grid and five-number summaries for the boxplot view.

use std::f64::consts::PI;

use super::model::{ColumnKind, Dataset};
use super::stats::{Quartiles, sorted_numbers, std_dev};
use crate::config::PrepConfig;

// ---------------------------------------------------------------------------
// Density curves
// ---------------------------------------------------------------------------

/// Kernel density curve of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct DensitySeries {
    pub column: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    pub series: Vec<DensitySeries>,
    /// Numeric columns without enough spread to estimate a density.
    pub skipped: Vec<String>,
}

/// Gaussian KDE per numeric column, Scott's-rule bandwidth, evaluated on an
/// even grid over `[min - range/2, max + range/2]`.
pub fn describe_distribution(ds: &Dataset, cfg: &PrepConfig) -> Distribution {
    let mut out = Distribution::default();
    for idx in ds.indices_of(ColumnKind::Numeric) {
        let column = ds.column(idx);
        let data = sorted_numbers(&column.values);
        match gaussian_kde(&data, cfg.kde_points) {
            Some(points) => out.series.push(DensitySeries {
                column: column.name.clone(),
                points,
            }),
            None => out.skipped.push(column.name.clone()),
        }
    }
    out
}

fn gaussian_kde(sorted: &[f64], n_points: usize) -> Option<Vec<[f64; 2]>> {
    let (&min, &max) = (sorted.first()?, sorted.last()?);
    let sigma = std_dev(sorted)?;
    if sigma <= 0.0 || n_points < 2 {
        return None;
    }
    let n = sorted.len() as f64;
    let bandwidth = sigma * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());

    let range = max - min;
    let start = min - range / 2.0;
    let step = 2.0 * range / (n_points - 1) as f64;

    let points = (0..n_points)
        .map(|i| {
            let x = start + step * i as f64;
            let density: f64 = sorted
                .iter()
                .map(|xi| {
                    let z = (x - xi) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            [x, density * norm]
        })
        .collect();
    Some(points)
}

// ---------------------------------------------------------------------------
// Boxplots
// ---------------------------------------------------------------------------

/// Five-number summary plus the points beyond the whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub column: String,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub fliers: Vec<f64>,
}

/// One box per numeric column that has at least one number. Whiskers reach
/// the most extreme data inside the IQR fences.
pub fn describe_outlier_boxplot(ds: &Dataset, cfg: &PrepConfig) -> Vec<BoxSummary> {
    ds.indices_of(ColumnKind::Numeric)
        .into_iter()
        .filter_map(|idx| {
            let column = ds.column(idx);
            let data = sorted_numbers(&column.values);
            let q = Quartiles::from_sorted(&data, cfg.lower_quantile, cfg.upper_quantile)?;
            let (lo, hi) = q.fences(cfg.iqr_multiplier);

            let inside = data.iter().filter(|v| **v >= lo && **v <= hi);
            let lower_whisker = inside.clone().next().copied().unwrap_or(q.q1);
            let upper_whisker = inside.last().copied().unwrap_or(q.q3);
            let fliers = data.iter().copied().filter(|v| *v < lo || *v > hi).collect();

            Some(BoxSummary {
                column: column.name.clone(),
                lower_whisker,
                q1: q.q1,
                median: q.median,
                q3: q.q3,
                upper_whisker,
                fliers,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Value};
    use approx::assert_abs_diff_eq;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "x",
                [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 5.0, 40.0]
                    .iter()
                    .map(|v| Value::Float(*v))
                    .collect(),
            ),
            Column::new("flat", vec![Value::Integer(1); 10]),
            Column::new("city", vec![Value::Text("Oslo".into()); 10]),
        ])
        .unwrap()
    }

    #[test]
    fn density_integrates_to_about_one() {
        let cfg = PrepConfig::default();
        let dist = describe_distribution(&dataset(), &cfg);
        assert_eq!(dist.series.len(), 1);
        assert_eq!(dist.skipped, vec!["flat".to_string()]);

        let pts = &dist.series[0].points;
        assert_eq!(pts.len(), cfg.kde_points);
        assert_abs_diff_eq!(pts[0][0], 1.0 - 39.0 / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pts[pts.len() - 1][0], 40.0 + 39.0 / 2.0, epsilon = 1e-9);

        let area: f64 = pts
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum();
        assert!(area > 0.95 && area < 1.01, "area = {area}");
    }

    #[test]
    fn density_peaks_near_the_bulk() {
        let dist = describe_distribution(&dataset(), &PrepConfig::default());
        let peak = dist.series[0]
            .points
            .iter()
            .max_by(|a, b| a[1].total_cmp(&b[1]))
            .unwrap();
        assert!(peak[0] > 0.0 && peak[0] < 10.0);
    }

    #[test]
    fn boxplot_separates_fliers() {
        let boxes = describe_outlier_boxplot(&dataset(), &PrepConfig::default());
        assert_eq!(boxes.len(), 2);
        let x = &boxes[0];
        assert_eq!(x.column, "x");
        // sorted: 1 2 2 3 3 3 4 4 5 40 -> Q1 2.25, median 3, Q3 4
        assert_abs_diff_eq!(x.q1, 2.25);
        assert_abs_diff_eq!(x.median, 3.0);
        assert_abs_diff_eq!(x.q3, 4.0);
        assert_eq!(x.lower_whisker, 1.0);
        assert_eq!(x.upper_whisker, 5.0);
        assert_eq!(x.fliers, vec![40.0]);

        let flat = &boxes[1];
        assert_eq!(flat.lower_whisker, 1.0);
        assert_eq!(flat.upper_whisker, 1.0);
        assert!(flat.fliers.is_empty());
    }
}
