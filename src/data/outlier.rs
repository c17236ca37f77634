use super::error::{DataError, Stage};
use super::model::Frame;

/// Tukey fence multiplier.
const FENCE: f64 = 1.5;

/// Quantile of ascending-sorted `sorted` using linear interpolation between
/// the order statistics around position `(n - 1) * q` (pandas' default).
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let float_idx = (sorted.len() - 1) as f64 * q;
    let lower_idx = float_idx.floor() as usize;
    let upper_idx = float_idx.ceil() as usize;
    let lower = sorted[lower_idx];
    let upper = sorted[upper_idx];
    if lower_idx == upper_idx || lower == upper {
        return Some(lower);
    }
    Some(lower + (float_idx - lower_idx as f64) * (upper - lower))
}

/// Inclusive bounds `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Bounds of an ascending-sorted sample, `None` if it is empty.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let q1 = quantile(sorted, 0.25)?;
        let q3 = quantile(sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(IqrBounds {
            q1,
            q3,
            lower: q1 - FENCE * iqr,
            upper: q3 + FENCE * iqr,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// What one filter step did.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStep {
    pub column: String,
    /// `None` when the column had no numeric value left to bound.
    pub bounds: Option<IqrBounds>,
    pub rows_before: usize,
    pub rows_after: usize,
}

/// Apply the IQR filter to each column in order, each on the rows the
/// previous columns left behind.
///
/// Rows whose value is missing in the filtered column are dropped.
pub fn remove_outliers(
    frame: Frame,
    columns: &[&str],
) -> Result<(Frame, Vec<FilterStep>), DataError> {
    columns
        .iter()
        .try_fold((frame, Vec::new()), |(frame, mut steps), column| {
            let (frame, step) = filter_column(frame, column)?;
            steps.push(step);
            Ok((frame, steps))
        })
}

fn filter_column(mut frame: Frame, column: &str) -> Result<(Frame, FilterStep), DataError> {
    frame.require_column(column, Stage::OutlierFilter)?;
    let rows_before = frame.len();

    let mut values: Vec<f64> = frame
        .records()
        .iter()
        .filter_map(|r| r.number(column))
        .collect();
    values.sort_by(f64::total_cmp);
    let bounds = IqrBounds::from_sorted(&values);

    frame.retain(|r| match (bounds, r.number(column)) {
        (Some(b), Some(v)) => b.contains(v),
        _ => false,
    });

    let step = FilterStep {
        column: column.to_string(),
        bounds,
        rows_before,
        rows_after: frame.len(),
    };
    match &step.bounds {
        Some(b) => log::info!(
            "outlier filter on '{column}': Q1 {:.2}, Q3 {:.2}, keeping [{:.2}, {:.2}], {} → {} rows",
            b.q1,
            b.q3,
            b.lower,
            b.upper,
            step.rows_before,
            step.rows_after
        ),
        None => log::warn!("outlier filter on '{column}': no numeric values, table is now empty"),
    }
    Ok((frame, step))
}
