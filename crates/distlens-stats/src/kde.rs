//! Gaussian kernel density estimation.
//!
//! Densities of all groups in one chart are evaluated on a shared grid so the
//! curves can be compared directly. See [`estimate_groups`].

use serde::Serialize;

use crate::{descriptive, grouping::GroupSummary};

/// Default number of grid points per density curve.
pub const DEFAULT_DENSITY_STEPS: usize = 100;

/// Fewest grid points a domain may have.
const MIN_DENSITY_STEPS: usize = 2;

/// Range fraction used as a bandwidth when the spread cannot be estimated.
const RANGE_BANDWIDTH_DIVISOR: f64 = 25.0;

/// Lower bound of the range-based fallback bandwidth.
const MIN_FALLBACK_BANDWIDTH: f64 = 0.1;

/// 1/√(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// A single point of a density curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    /// Position on the value axis.
    pub x: f64,
    /// Estimated probability density at `x`.
    pub density: f64,
}

/// A density curve, ordered by `x`.
pub type DensityEstimate = Vec<DensityPoint>;

/// Density curve of one group, as drawn by a violin or ridgeline chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDensity {
    pub label: String,
    /// Bandwidth actually used, after scaling.
    pub bandwidth: f64,
    pub points: DensityEstimate,
}

fn gaussian_kernel(u: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * u * u).exp()
}

/// Evaluates the Gaussian KDE of `values` at every point of `domain`.
///
/// Non-finite values and domain points are ignored. Returns an empty estimate
/// when there are no values, the domain is empty, or the bandwidth is not a
/// positive finite number.
///
/// # Arguments
///
/// * `values` - Observations; their order does not matter
/// * `domain` - Points at which the density is evaluated
/// * `bandwidth` - Standard deviation of the Gaussian kernel
///
/// # Returns
///
/// One [`DensityPoint`] per finite domain point, in domain order.
///
/// # Examples
///
/// ```
/// use distlens_stats::kde::estimate;
///
/// let curve = estimate(&[0.0], &[0.0, 1.0], 1.0);
/// assert_eq!(curve.len(), 2);
/// assert!((curve[0].density - 0.398_942_28).abs() < 1e-8);
///
/// assert!(estimate(&[], &[0.0, 1.0], 1.0).is_empty());
/// assert!(estimate(&[1.0], &[0.0, 1.0], 0.0).is_empty());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn estimate(values: &[f64], domain: &[f64], bandwidth: f64) -> DensityEstimate {
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return vec![];
    }
    let values = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect::<Vec<_>>();
    if values.is_empty() {
        return vec![];
    }

    let scale = 1.0 / (values.len() as f64 * bandwidth);
    domain
        .iter()
        .copied()
        .filter(|x| x.is_finite())
        .map(|x| {
            let sum = values
                .iter()
                .map(|v| gaussian_kernel((x - v) / bandwidth))
                .sum::<f64>();
            DensityPoint {
                x,
                density: scale * sum,
            }
        })
        .collect()
}

/// Silverman's rule-of-thumb bandwidth, `1.06 * sd * n^(-1/5)`.
///
/// Falls back to `max((max_value - min_value) / 25, 0.1)` when there are
/// fewer than two values or the standard deviation is zero.
///
/// # Examples
///
/// ```
/// use distlens_stats::kde::silverman_bandwidth;
///
/// assert_eq!(silverman_bandwidth(&[3.0], 0.0, 10.0), 0.4);
/// assert_eq!(silverman_bandwidth(&[2.0, 2.0], 0.0, 1.0), 0.1);
///
/// let h = silverman_bandwidth(&[1.0, 2.0, 3.0, 4.0, 5.0], 1.0, 5.0);
/// assert!((h - 1.06 * 2.5_f64.sqrt() * 5.0_f64.powf(-0.2)).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn silverman_bandwidth(values: &[f64], min_value: f64, max_value: f64) -> f64 {
    let fallback = ((max_value - min_value) / RANGE_BANDWIDTH_DIVISOR).max(MIN_FALLBACK_BANDWIDTH);
    let values = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect::<Vec<_>>();
    match descriptive::std_dev(&values) {
        Some(sd) if sd.is_finite() && sd > 0.0 => 1.06 * sd * (values.len() as f64).powf(-0.2),
        _ => fallback,
    }
}

/// Evenly spaced grid of `steps` points covering `[min, max]`.
///
/// `steps` is raised to at least 2. A degenerate range is widened by 0.5 on
/// each side; non-finite bounds give an empty grid.
///
/// # Examples
///
/// ```
/// use distlens_stats::kde::density_domain;
///
/// assert_eq!(density_domain(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(density_domain(3.0, 3.0, 2), vec![2.5, 3.5]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn density_domain(min: f64, max: f64, steps: usize) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) {
        return vec![];
    }
    let (min, max) = if max > min {
        (min, max)
    } else {
        (min - 0.5, min + 0.5)
    };
    let steps = steps.max(MIN_DENSITY_STEPS);
    let step = (max - min) / (steps - 1) as f64;
    (0..steps)
        .map(|i| {
            // pin the last point so rounding never shortens the range
            if i == steps - 1 {
                max
            } else {
                min + step * i as f64
            }
        })
        .collect()
}

/// Replaces a non-finite or non-positive bandwidth factor with `1.0`.
#[must_use]
pub fn sanitize_bandwidth_factor(factor: f64) -> f64 {
    if factor.is_finite() && factor > 0.0 {
        factor
    } else {
        tracing::debug!(factor, "invalid bandwidth factor, using 1.0");
        1.0
    }
}

/// Estimates every group's density on one shared grid.
///
/// Each group gets its own Silverman bandwidth (computed against the global
/// range and scaled by `bandwidth_factor`). The grid spans the global range
/// padded by the widest bandwidth on both sides, so tails are not clipped.
/// Groups without values get an empty curve.
///
/// # Examples
///
/// ```
/// use distlens_stats::{grouping::GroupSummary, kde::estimate_groups, sample::Sample};
///
/// let groups = [
///     GroupSummary::new("a", Sample::from_values([1.0, 2.0, 3.0]), 1.5),
///     GroupSummary::new("b", Sample::from_values([4.0, 5.0, 6.0, 7.0]), 1.5),
/// ];
/// let densities = estimate_groups(&groups, 50, 1.0);
/// assert_eq!(densities.len(), 2);
/// assert_eq!(densities[0].points.len(), 50);
/// assert_eq!(densities[0].points[10].x, densities[1].points[10].x);
/// ```
#[must_use]
pub fn estimate_groups(
    groups: &[GroupSummary],
    steps: usize,
    bandwidth_factor: f64,
) -> Vec<GroupDensity> {
    let factor = sanitize_bandwidth_factor(bandwidth_factor);
    let (global_min, global_max) = groups
        .iter()
        .flat_map(|g| g.values.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    let bandwidths = groups
        .iter()
        .map(|g| silverman_bandwidth(&g.values, global_min, global_max) * factor)
        .collect::<Vec<_>>();
    let pad = groups
        .iter()
        .zip(&bandwidths)
        .filter(|(g, _)| !g.values.is_empty())
        .map(|(_, &h)| h)
        .fold(0.0, f64::max);
    let domain = density_domain(global_min - pad, global_max + pad, steps);

    groups
        .iter()
        .zip(bandwidths)
        .map(|(group, bandwidth)| GroupDensity {
            label: group.label.clone(),
            bandwidth,
            points: estimate(&group.values, &domain, bandwidth),
        })
        .collect()
}
