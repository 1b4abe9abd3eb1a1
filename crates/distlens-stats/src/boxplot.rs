use serde::Serialize;

use crate::descriptive::QuantileSummary;

/// Conventional Tukey fence multiplier.
pub const DEFAULT_WHISKER_MULTIPLIER: f64 = 1.5;

/// Box-plot summary: quartiles plus whiskers and outliers.
///
/// Values outside `[q1 - k*iqr, q3 + k*iqr]` are outliers; the whiskers reach
/// the most extreme values still inside the fences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    #[serde(flatten)]
    pub quantiles: QuantileSummary,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    /// Values outside the fences, in ascending order.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Summarizes unsorted values with the given whisker multiplier.
    ///
    /// A non-finite multiplier falls back to [`DEFAULT_WHISKER_MULTIPLIER`].
    ///
    /// # Examples
    ///
    /// ```
    /// use distlens_stats::boxplot::BoxSummary;
    ///
    /// let summary = BoxSummary::new([1.0, 2.0, 3.0, 4.0, 5.0, 100.0], 1.5);
    /// assert_eq!(summary.quantiles.q1, 2.25);
    /// assert_eq!(summary.lower_whisker, 1.0);
    /// assert_eq!(summary.upper_whisker, 5.0);
    /// assert_eq!(summary.outliers, vec![100.0]);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, whisker_multiplier: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, whisker_multiplier)
    }

    /// Summarizes finite values already sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], whisker_multiplier: f64) -> Self {
        let quantiles = QuantileSummary::from_sorted(sorted_values);
        if quantiles.is_empty() {
            return Self {
                quantiles,
                lower_fence: f64::NAN,
                upper_fence: f64::NAN,
                lower_whisker: f64::NAN,
                upper_whisker: f64::NAN,
                outliers: vec![],
            };
        }

        let k = sanitize_whisker_multiplier(whisker_multiplier);
        let lower_fence = quantiles.q1 - k * quantiles.iqr;
        let upper_fence = quantiles.q3 + k * quantiles.iqr;

        let (inliers, outliers): (Vec<f64>, Vec<f64>) = sorted_values
            .iter()
            .partition(|&&v| (lower_fence..=upper_fence).contains(&v));

        // inliers stay sorted, so the whiskers are their end points
        let lower_whisker = inliers.first().copied().unwrap_or(quantiles.min);
        let upper_whisker = inliers.last().copied().unwrap_or(quantiles.max);

        Self {
            quantiles,
            lower_fence,
            upper_fence,
            lower_whisker,
            upper_whisker,
            outliers,
        }
    }
}

/// Replaces a non-finite whisker multiplier with the default.
#[must_use]
pub fn sanitize_whisker_multiplier(whisker_multiplier: f64) -> f64 {
    if whisker_multiplier.is_finite() {
        whisker_multiplier
    } else {
        tracing::debug!(whisker_multiplier, "non-finite whisker multiplier, using default");
        DEFAULT_WHISKER_MULTIPLIER
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty() {
        let summary = BoxSummary::new(Vec::new(), 1.5);
        assert_eq!(summary.quantiles.n, 0);
        assert!(summary.lower_whisker.is_nan());
        assert!(summary.upper_whisker.is_nan());
        assert!(summary.outliers.is_empty());
    }

    #[test]
    fn test_outliers_on_both_sides() {
        let summary = BoxSummary::new([-50.0, 10.0, 11.0, 12.0, 13.0, 14.0, 80.0, 90.0], 1.5);
        assert_eq!(summary.outliers, vec![-50.0, 80.0, 90.0]);
        assert_eq!(summary.lower_whisker, 10.0);
        assert_eq!(summary.upper_whisker, 14.0);
    }

    #[test]
    fn test_non_finite_multiplier_uses_default() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let fallback = BoxSummary::new(values, f64::NAN);
        let default = BoxSummary::new(values, DEFAULT_WHISKER_MULTIPLIER);
        assert_eq!(fallback, default);
        assert_eq!(sanitize_whisker_multiplier(f64::INFINITY), 1.5);
        assert_eq!(sanitize_whisker_multiplier(3.0), 3.0);
    }

    #[test]
    fn test_larger_multiplier_absorbs_outlier() {
        let summary = BoxSummary::new([1.0, 2.0, 3.0, 4.0, 5.0, 100.0], 50.0);
        assert!(summary.outliers.is_empty());
        assert_eq!(summary.upper_whisker, 100.0);
    }

    #[test]
    fn test_negative_multiplier_falls_back_to_extremes() {
        // fences cross, so nothing is an inlier
        let summary = BoxSummary::new([1.0, 2.0, 3.0, 4.0], -10.0);
        assert_eq!(summary.outliers, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 4.0);
    }

    #[test]
    fn test_whiskers_hug_quartiles_on_spread_data() {
        let summary = BoxSummary::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], 1.5);
        assert!(summary.lower_whisker <= summary.quantiles.q1);
        assert!(summary.upper_whisker >= summary.quantiles.q3);
    }

    #[test]
    fn test_whisker_is_a_data_point_even_past_interpolated_quartile() {
        // q1 interpolates to 7.5 but the nearest inlier is 10
        let summary = BoxSummary::new([0.0, 10.0, 10.0, 10.0], 1.5);
        assert_eq!(summary.quantiles.q1, 7.5);
        assert_eq!(summary.outliers, vec![0.0]);
        assert_eq!(summary.lower_whisker, 10.0);
    }

    #[test]
    fn test_serializes_flat() {
        let summary = BoxSummary::new([1.0, 2.0, 3.0], 1.5);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["median"], 2.0);
        assert_eq!(json["lower_whisker"], 1.0);
        assert_eq!(json["outliers"], serde_json::json!([]));
    }

    proptest! {
        #[test]
        fn outliers_lie_outside_fences(
            data in proptest::collection::vec(-1e6_f64..1e6, 1..150),
            k in 0.0_f64..4.0,
        ) {
            let s = BoxSummary::new(data, k);
            for &o in &s.outliers {
                prop_assert!(o < s.lower_fence || o > s.upper_fence);
            }
            prop_assert!(s.outliers.is_sorted_by(|a, b| a <= b));
        }

        #[test]
        fn whiskers_are_bounded(
            data in proptest::collection::vec(-1e6_f64..1e6, 1..150),
            k in 0.0_f64..4.0,
        ) {
            let s = BoxSummary::new(data, k);
            let q = s.quantiles;
            prop_assert!(q.min <= s.lower_whisker && s.lower_whisker <= q.max);
            prop_assert!(q.min <= s.upper_whisker && s.upper_whisker <= q.max);
            prop_assert!(s.lower_whisker <= s.upper_whisker);
        }

        #[test]
        fn summary_is_idempotent(data in proptest::collection::vec(-1e6_f64..1e6, 1..50)) {
            prop_assert_eq!(BoxSummary::new(data.clone(), 1.5), BoxSummary::new(data, 1.5));
        }
    }
}
