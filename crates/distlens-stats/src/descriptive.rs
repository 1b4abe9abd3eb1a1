use serde::Serialize;

/// Five-number style summary of a dataset, plus mean and IQR.
///
/// An empty dataset yields `n = 0` with every numeric field set to NaN.
/// Otherwise `min <= q1 <= median <= q3 <= max` holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantileSummary {
    /// Number of finite values summarized.
    pub n: usize,
    pub min: f64,
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    /// Interquartile range, `q3 - q1`.
    pub iqr: f64,
}

impl QuantileSummary {
    /// Summary of an empty dataset.
    pub const EMPTY: Self = Self {
        n: 0,
        min: f64::NAN,
        max: f64::NAN,
        mean: f64::NAN,
        q1: f64::NAN,
        median: f64::NAN,
        q3: f64::NAN,
        iqr: f64::NAN,
    };

    /// Summarizes unsorted values, ignoring anything non-finite.
    ///
    /// The finite values are collected and sorted internally.
    ///
    /// # Arguments
    ///
    /// * `values` - An iterator over `f64` values in any order
    ///
    /// # Returns
    ///
    /// The summary of the finite values, or [`QuantileSummary::EMPTY`] if
    /// there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use distlens_stats::descriptive::QuantileSummary;
    ///
    /// let summary = QuantileSummary::new([4.0, 1.0, f64::NAN, 3.0, 2.0]);
    /// assert_eq!(summary.n, 4);
    /// assert_eq!(summary.median, 2.5);
    /// assert_eq!(summary.mean, 2.5);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Summarizes values already sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Self::EMPTY;
        };
        let n = sorted_values.len();
        let mean = sorted_values.iter().sum::<f64>() / n as f64;
        let q1 = quantile_sorted(sorted_values, 0.25);
        let median = quantile_sorted(sorted_values, 0.5);
        let q3 = quantile_sorted(sorted_values, 0.75);

        Self {
            n,
            min,
            max,
            mean,
            q1,
            median,
            q3,
            iqr: q3 - q1,
        }
    }

    /// Whether the summary was built from no values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

/// Computes the `p`-quantile of sorted data by linear interpolation.
///
/// This is the R-7 (Excel `PERCENTILE.INC`) definition: the quantile sits at
/// position `(n - 1) * p` and is interpolated between its neighbours.
/// `p` is clamped to `[0, 1]`. Returns NaN for an empty slice.
///
/// # Examples
///
/// ```
/// use distlens_stats::descriptive::quantile_sorted;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
/// assert_eq!(quantile_sorted(&values, 0.25), 2.25);
/// assert_eq!(quantile_sorted(&values, 0.5), 3.5);
/// assert_eq!(quantile_sorted(&values, 1.0), 100.0);
/// assert!(quantile_sorted(&[], 0.5).is_nan());
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
#[must_use]
pub fn quantile_sorted(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let p = if p.is_nan() { 0.5 } else { p.clamp(0.0, 1.0) };
    let pos = (sorted_values.len() - 1) as f64 * p;
    let base = pos.floor();
    let frac = pos - base;
    let base = base as usize;
    let lo = sorted_values[base];
    match sorted_values.get(base + 1) {
        // clamp guards against rounding past the upper neighbour
        Some(&hi) => (lo + frac * (hi - lo)).clamp(lo, hi),
        None => lo,
    }
}

/// Arithmetic mean, `None` for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample variance (`n - 1` denominator), `None` below two values.
///
/// # Examples
///
/// ```
/// use distlens_stats::descriptive::variance;
///
/// assert_eq!(variance(&[1.0, 2.0, 3.0]), Some(1.0));
/// assert_eq!(variance(&[1.0]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation (`n - 1` denominator).
#[must_use]
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}
