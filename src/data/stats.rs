use super::model::Value;

// ---------------------------------------------------------------------------
// Order statistics over numeric cells
// ---------------------------------------------------------------------------

/// Sorted finite numbers of a column; nulls and non-numeric cells are skipped.
pub fn sorted_numbers(values: &[Value]) -> Vec<f64> {
    let mut out: Vec<f64> = values
        .iter()
        .filter_map(Value::as_f64)
        .filter(|v| v.is_finite())
        .collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Quantile `q` (0..=1) of sorted data, linearly interpolated between the
/// two nearest order statistics. `None` on empty input.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Lower quartile, median and upper quartile of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl Quartiles {
    /// Quartiles at the given levels; `None` when the column has no numbers.
    pub fn from_sorted(sorted: &[f64], lower: f64, upper: f64) -> Option<Self> {
        Some(Self {
            q1: quantile_sorted(sorted, lower)?,
            median: quantile_sorted(sorted, 0.5)?,
            q3: quantile_sorted(sorted, upper)?,
        })
    }

    pub fn of(values: &[Value], lower: f64, upper: f64) -> Option<Self> {
        Self::from_sorted(&sorted_numbers(values), lower, upper)
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Inclusive acceptance interval `[Q1 - k*IQR, Q3 + k*IQR]`.
    pub fn fences(&self, k: f64) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - k * iqr, self.q3 + k * iqr)
    }
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}
