//! Two-sample and multi-sample location tests.
//!
//! [`compare`] picks a test from the number of usable groups and the requested
//! [`TestMode`]:
//!
//! | groups | parametric / auto | nonparametric    |
//! |--------|-------------------|------------------|
//! | 2      | Welch's t-test    | Mann-Whitney U   |
//! | > 2    | one-way ANOVA     | Kruskal-Wallis H |
//!
//! Every test returns `None` instead of failing when its preconditions are not
//! met.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    descriptive::{mean, variance},
    grouping::GroupSummary,
    rank::rank_with_ties,
    special::{chi_square_cdf, f_cdf, normal_cdf, student_t_cdf},
};

/// Which family of tests [`compare`] should use.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    /// Parametric tests (same choice as [`TestMode::Parametric`]).
    #[default]
    Auto,
    Parametric,
    #[serde(alias = "non-parametric")]
    Nonparametric,
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Parametric => "parametric",
            Self::Nonparametric => "nonparametric",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown test mode '{input}' (expected auto, parametric or nonparametric)")]
pub struct ParseTestModeError {
    input: String,
}

impl FromStr for TestMode {
    type Err = ParseTestModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "parametric" => Ok(Self::Parametric),
            "nonparametric" | "non-parametric" => Ok(Self::Nonparametric),
            _ => Err(ParseTestModeError { input: s.to_owned() }),
        }
    }
}

/// Identifies the test that produced a [`HypothesisResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    #[display("welch_t")]
    WelchT,
    #[display("mann_whitney")]
    MannWhitney,
    #[display("anova")]
    Anova,
    #[display("kruskal_wallis")]
    KruskalWallis,
}

/// Outcome of a hypothesis test, with its effect size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum HypothesisResult {
    /// Welch's unequal-variance t-test with Cohen's d.
    WelchT { t: f64, df: f64, p: f64, cohens_d: f64 },
    /// Mann-Whitney U with continuity-corrected normal approximation.
    MannWhitney {
        u: f64,
        z: f64,
        p: f64,
        rank_biserial: f64,
    },
    /// One-way ANOVA with eta squared.
    Anova {
        f: f64,
        df1: f64,
        df2: f64,
        p: f64,
        eta_squared: f64,
    },
    /// Kruskal-Wallis H with epsilon squared.
    KruskalWallis {
        h: f64,
        df: f64,
        p: f64,
        epsilon_squared: f64,
    },
}

impl HypothesisResult {
    /// The test that produced this result.
    #[must_use]
    pub fn kind(&self) -> TestKind {
        match self {
            Self::WelchT { .. } => TestKind::WelchT,
            Self::MannWhitney { .. } => TestKind::MannWhitney,
            Self::Anova { .. } => TestKind::Anova,
            Self::KruskalWallis { .. } => TestKind::KruskalWallis,
        }
    }

    /// Short symbol of the test statistic.
    #[must_use]
    pub fn stat_label(&self) -> &'static str {
        match self {
            Self::WelchT { .. } => "t",
            Self::MannWhitney { .. } => "U",
            Self::Anova { .. } => "F",
            Self::KruskalWallis { .. } => "H",
        }
    }

    /// Value of the test statistic (`t`, `U`, `F` or `H`).
    #[must_use]
    pub fn stat(&self) -> f64 {
        match *self {
            Self::WelchT { t, .. } => t,
            Self::MannWhitney { u, .. } => u,
            Self::Anova { f, .. } => f,
            Self::KruskalWallis { h, .. } => h,
        }
    }

    /// Two-sided p-value, always within `[0, 1]`.
    #[must_use]
    pub fn p_value(&self) -> f64 {
        match *self {
            Self::WelchT { p, .. }
            | Self::MannWhitney { p, .. }
            | Self::Anova { p, .. }
            | Self::KruskalWallis { p, .. } => p,
        }
    }

    /// Name of the effect-size measure.
    #[must_use]
    pub fn effect_label(&self) -> &'static str {
        match self {
            Self::WelchT { .. } => "Cohen's d",
            Self::MannWhitney { .. } => "rank-biserial r",
            Self::Anova { .. } => "η²",
            Self::KruskalWallis { .. } => "ε²",
        }
    }

    /// Effect size: Cohen's d, rank-biserial r, η² or ε².
    #[must_use]
    pub fn effect(&self) -> f64 {
        match *self {
            Self::WelchT { cohens_d, .. } => cohens_d,
            Self::MannWhitney { rank_biserial, .. } => rank_biserial,
            Self::Anova { eta_squared, .. } => eta_squared,
            Self::KruskalWallis {
                epsilon_squared, ..
            } => epsilon_squared,
        }
    }

    /// Whether the p-value falls below `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value() < alpha
    }
}

impl fmt::Display for HypothesisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {:.4}, ", self.kind(), self.stat_label(), self.stat())?;
        match *self {
            Self::WelchT { df, .. } | Self::KruskalWallis { df, .. } => write!(f, "df = {df:.2}, ")?,
            Self::MannWhitney { z, .. } => write!(f, "z = {z:.4}, ")?,
            Self::Anova { df1, df2, .. } => write!(f, "df = ({df1}, {df2}), ")?,
        }
        write!(
            f,
            "p = {:.4}, {} = {:.4}",
            self.p_value(),
            self.effect_label(),
            self.effect()
        )
    }
}

fn clamp_probability(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}

fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

fn finite_groups<S>(groups: &[S]) -> Vec<Vec<f64>>
where
    S: AsRef<[f64]>,
{
    groups.iter().map(|g| finite_values(g.as_ref())).collect()
}

/// Runs the test selected by `mode` over the usable groups.
///
/// Groups with fewer than two finite values are ignored. Returns `None` when
/// fewer than two groups remain.
///
/// # Arguments
///
/// * `groups` - Samples to compare; non-finite values are dropped first
/// * `mode` - Whether to run the parametric or the rank-based test
///
/// # Returns
///
/// * `Some(HypothesisResult)` - Welch or Mann-Whitney for two usable groups,
///   ANOVA or Kruskal-Wallis for more
/// * `None` - if fewer than two groups have at least two finite values
///
/// # Examples
///
/// ```
/// use distlens_stats::hypothesis::{TestKind, TestMode, compare};
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// let result = compare(&[&a[..], &b[..]], TestMode::Nonparametric).unwrap();
/// assert_eq!(result.kind(), TestKind::MannWhitney);
///
/// assert!(compare(&[&a[..], &[1.0][..]], TestMode::Auto).is_none());
/// ```
#[must_use]
pub fn compare<S>(groups: &[S], mode: TestMode) -> Option<HypothesisResult>
where
    S: AsRef<[f64]>,
{
    let mut valid = finite_groups(groups);
    valid.retain(|g| g.len() >= 2);
    if valid.len() < groups.len() {
        tracing::debug!(
            dropped = groups.len() - valid.len(),
            "ignoring groups with fewer than two finite values"
        );
    }

    let result = match (valid.as_slice(), mode) {
        ([] | [_], _) => None,
        ([a, b], TestMode::Nonparametric) => mann_whitney_u(a, b),
        ([a, b], TestMode::Parametric | TestMode::Auto) => welch_t_test(a, b),
        (groups, TestMode::Nonparametric) => kruskal_wallis(groups),
        (groups, TestMode::Parametric | TestMode::Auto) => one_way_anova(groups),
    };
    match &result {
        Some(r) => tracing::debug!(test = %r.kind(), groups = valid.len(), %mode, "compared groups"),
        None => tracing::debug!(groups = valid.len(), %mode, "groups not comparable"),
    }
    result
}

/// [`compare`] over the values of grouped rows.
#[must_use]
pub fn compare_groups(groups: &[GroupSummary], mode: TestMode) -> Option<HypothesisResult> {
    compare(
        &groups.iter().map(|g| g.values.as_slice()).collect::<Vec<_>>(),
        mode,
    )
}

/// Welch's t-test for a difference in means, with Cohen's d.
///
/// Non-finite values are dropped first. Requires at least two values per
/// sample and a non-zero standard error.
///
/// # Examples
///
/// ```
/// use distlens_stats::hypothesis::{HypothesisResult, welch_t_test};
///
/// let Some(HypothesisResult::WelchT { t, df, p, .. }) =
///     welch_t_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0])
/// else {
///     panic!("expected a Welch result");
/// };
/// assert!(t < -3.0);
/// assert!((df - 4.0).abs() < 1e-9);
/// assert!(p < 0.05);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<HypothesisResult> {
    let (a, b) = (finite_values(a), finite_values(b));
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let (m1, m2) = (mean(&a)?, mean(&b)?);
    let (v1, v2) = (variance(&a)?, variance(&b)?);

    let se1 = v1 / n1;
    let se2 = v2 / n2;
    let se = (se1 + se2).sqrt();
    if !se.is_finite() || se <= 0.0 {
        return None;
    }
    let t = (m1 - m2) / se;
    let df = (se1 + se2).powi(2) / (se1.powi(2) / (n1 - 1.0) + se2.powi(2) / (n2 - 1.0));
    let p = clamp_probability(2.0 * (1.0 - student_t_cdf(t.abs(), df)));

    let pooled_sd = (((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / (n1 + n2 - 2.0)).sqrt();
    let cohens_d = if pooled_sd > 0.0 {
        (m1 - m2) / pooled_sd
    } else {
        0.0
    };

    Some(HypothesisResult::WelchT { t, df, p, cohens_d })
}

/// Mann-Whitney U test with tie-corrected ranks and continuity correction.
///
/// Non-finite values are dropped before ranking.
///
/// The effect size is the rank-biserial correlation `1 - 2U / (n1 n2)`.
///
/// # Examples
///
/// ```
/// use distlens_stats::hypothesis::{HypothesisResult, mann_whitney_u};
///
/// let Some(HypothesisResult::MannWhitney { u, p, rank_biserial, .. }) =
///     mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0])
/// else {
///     panic!("expected a Mann-Whitney result");
/// };
/// assert_eq!(u, 0.0);
/// assert_eq!(rank_biserial, 1.0);
/// assert!((p - 0.081).abs() < 1e-3);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Option<HypothesisResult> {
    let (a, b) = (finite_values(a), finite_values(b));
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let pooled = a.iter().chain(&b).copied().collect::<Vec<_>>();
    let ranks = rank_with_ties(&pooled);
    let r1 = ranks[..a.len()].iter().sum::<f64>();

    let u1 = r1 - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let u = u1.min(u2);
    let mu = n1 * n2 / 2.0;
    let sigma = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
    if sigma == 0.0 {
        return None;
    }
    let z = (u - mu + 0.5) / sigma;
    let p = clamp_probability(2.0 * (1.0 - normal_cdf(z.abs())));
    let rank_biserial = 1.0 - 2.0 * u / (n1 * n2);

    Some(HypothesisResult::MannWhitney {
        u,
        z,
        p,
        rank_biserial,
    })
}

/// One-way ANOVA F-test with eta squared.
///
/// Non-finite values are dropped first; an emptied group still counts towards
/// the degrees of freedom. Requires at least two groups and more values than
/// groups. When the
/// within-group variance is zero, `F` is reported as `0` (and `p` as `1`).
///
/// # Examples
///
/// ```
/// use distlens_stats::hypothesis::{HypothesisResult, one_way_anova};
///
/// let groups = [vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0], vec![8.0, 9.0, 10.0]];
/// let Some(HypothesisResult::Anova { f, df1, df2, p, .. }) = one_way_anova(&groups) else {
///     panic!("expected an ANOVA result");
/// };
/// assert_eq!((df1, df2), (2.0, 6.0));
/// assert!(f > 30.0);
/// assert!(p < 0.001);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn one_way_anova<S>(groups: &[S]) -> Option<HypothesisResult>
where
    S: AsRef<[f64]>,
{
    let groups = finite_groups(groups);
    let k = groups.len();
    let n = groups.iter().map(Vec::len).sum::<usize>();
    if k < 2 || n <= k {
        return None;
    }
    let grand_mean = groups.iter().flatten().sum::<f64>() / n as f64;

    let mut ssb = 0.0;
    let mut ssw = 0.0;
    for group in &groups {
        let Some(group_mean) = mean(group) else {
            continue;
        };
        ssb += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ssw += group.iter().map(|x| (x - group_mean).powi(2)).sum::<f64>();
    }

    let df1 = (k - 1) as f64;
    let df2 = (n - k) as f64;
    let msb = ssb / df1;
    let msw = ssw / df2;
    let f = if msw > 0.0 { msb / msw } else { 0.0 };
    let p = clamp_probability(1.0 - f_cdf(f, df1, df2));
    let total = ssb + ssw;
    let eta_squared = if total > 0.0 { ssb / total } else { 0.0 };

    Some(HypothesisResult::Anova {
        f,
        df1,
        df2,
        p,
        eta_squared,
    })
}

/// Kruskal-Wallis H test with epsilon squared.
///
/// Non-finite values are dropped before ranking. Requires at least two groups
/// and more values than groups. No tie
/// correction is applied to `H`.
///
/// # Examples
///
/// ```
/// use distlens_stats::hypothesis::{HypothesisResult, kruskal_wallis};
///
/// let groups = [vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]];
/// let Some(HypothesisResult::KruskalWallis { h, df, .. }) = kruskal_wallis(&groups) else {
///     panic!("expected a Kruskal-Wallis result");
/// };
/// assert!((h - 7.2).abs() < 1e-9);
/// assert_eq!(df, 2.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn kruskal_wallis<S>(groups: &[S]) -> Option<HypothesisResult>
where
    S: AsRef<[f64]>,
{
    let groups = finite_groups(groups);
    let k = groups.len();
    let n = groups.iter().map(Vec::len).sum::<usize>();
    if k < 2 || n <= k {
        return None;
    }
    let pooled = groups.iter().flatten().copied().collect::<Vec<_>>();
    let ranks = rank_with_ties(&pooled);

    let mut offset = 0;
    let mut rank_term = 0.0;
    for group in &groups {
        let len = group.len();
        if len > 0 {
            let rank_sum = ranks[offset..offset + len].iter().sum::<f64>();
            rank_term += rank_sum.powi(2) / len as f64;
        }
        offset += len;
    }

    let n_f = n as f64;
    let k_f = k as f64;
    let h = 12.0 / (n_f * (n_f + 1.0)) * rank_term - 3.0 * (n_f + 1.0);
    let df = k_f - 1.0;
    let p = clamp_probability(1.0 - chi_square_cdf(h, df));
    let epsilon_squared = if n == k {
        0.0
    } else {
        (h - k_f + 1.0) / (n_f - k_f)
    };

    Some(HypothesisResult::KruskalWallis {
        h,
        df,
        p,
        epsilon_squared,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng as _;
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::sample::Sample;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected}, got {actual} (tol {tol})"
        );
    }

    fn normal_sample(rng: &mut Pcg64Mcg, mean: f64, sd: f64, n: usize) -> Vec<f64> {
        let normal = Normal::new(mean, sd).unwrap();
        (0..n).map(|_| normal.sample(rng)).collect()
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("auto".parse::<TestMode>(), Ok(TestMode::Auto));
        assert_eq!(" Parametric ".parse::<TestMode>(), Ok(TestMode::Parametric));
        assert_eq!("non-parametric".parse::<TestMode>(), Ok(TestMode::Nonparametric));
        assert_eq!("NONPARAMETRIC".parse::<TestMode>(), Ok(TestMode::Nonparametric));
        let err = "bayesian".parse::<TestMode>().unwrap_err();
        assert!(err.to_string().contains("bayesian"));
        for mode in [TestMode::Auto, TestMode::Parametric, TestMode::Nonparametric] {
            assert_eq!(mode.to_string().parse::<TestMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_welch_reference_values() {
        let Some(HypothesisResult::WelchT { t, df, p, cohens_d }) =
            welch_t_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0])
        else {
            panic!("expected Welch result");
        };
        assert_close(t, -3.674_234_614, 1e-8);
        assert_close(df, 4.0, 1e-12);
        assert_close(p, 0.021_311_641, 1e-5);
        assert_close(cohens_d, -3.0, 1e-12);
    }

    #[test]
    fn test_welch_unequal_variances() {
        let a = [10.0, 12.0, 9.0, 11.0, 13.0];
        let b = [20.0, 5.0, 30.0, 1.0];
        let Some(HypothesisResult::WelchT { df, p, .. }) = welch_t_test(&a, &b) else {
            panic!("expected Welch result");
        };
        // Satterthwaite df sits between min(n) - 1 and n1 + n2 - 2
        assert!(df > 3.0 && df < 7.0);
        assert!(p > 0.5);
    }

    #[test]
    fn test_welch_needs_spread_and_size() {
        assert!(welch_t_test(&[1.0], &[2.0, 3.0]).is_none());
        assert!(welch_t_test(&[1.0, 1.0], &[2.0, 2.0]).is_none());
    }

    #[test]
    fn test_welch_constant_group_has_finite_effect() {
        let result = welch_t_test(&[1.0, 1.0], &[2.0, 4.0]).unwrap();
        assert!(result.effect().is_finite());
    }

    #[test]
    fn test_mann_whitney_reference_values() {
        let Some(HypothesisResult::MannWhitney {
            u,
            z,
            p,
            rank_biserial,
        }) = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0])
        else {
            panic!("expected Mann-Whitney result");
        };
        assert_eq!(u, 0.0);
        assert_close(z, -1.745_743_122, 1e-8);
        assert_close(p, 0.080_855_5, 1e-6);
        assert_eq!(rank_biserial, 1.0);
    }

    #[test]
    fn test_mann_whitney_ties_and_symmetry() {
        let a = [1.0, 2.0, 2.0, 3.0];
        let b = [2.0, 3.0, 3.0, 4.0, 5.0];
        let ab = mann_whitney_u(&a, &b).unwrap();
        let ba = mann_whitney_u(&b, &a).unwrap();
        assert_eq!(ab.stat(), ba.stat());
        assert_close(ab.p_value(), ba.p_value(), 1e-12);
    }

    #[test]
    fn test_mann_whitney_identical_samples() {
        let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(result.stat(), 4.5);
        assert_eq!(result.effect(), 0.0);
        // continuity correction keeps z away from zero
        assert_close(result.p_value(), 0.827_259_4, 1e-6);
    }

    #[test]
    fn test_anova_reference_values() {
        let groups = [vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0], vec![8.0, 9.0, 10.0]];
        let Some(HypothesisResult::Anova {
            f,
            p,
            eta_squared,
            ..
        }) = one_way_anova(&groups)
        else {
            panic!("expected ANOVA result");
        };
        // SSB = 86, SSW = 6
        assert_close(f, 43.0, 1e-9);
        assert_close(eta_squared, 86.0 / 92.0, 1e-12);
        assert_close(p, 0.000_277_39, 1e-7);
    }

    #[test]
    fn test_anova_zero_within_variance_reports_zero_f() {
        let groups = [vec![1.0, 1.0], vec![5.0, 5.0]];
        let result = one_way_anova(&groups).unwrap();
        assert_eq!(result.stat(), 0.0);
        assert_eq!(result.p_value(), 1.0);
        assert_eq!(result.effect(), 1.0);
    }

    #[test]
    fn test_anova_preconditions() {
        assert!(one_way_anova(&[vec![1.0, 2.0]]).is_none());
        assert!(one_way_anova(&[vec![1.0], vec![2.0]]).is_none());
    }

    #[test]
    fn test_kruskal_wallis_reference_values() {
        let groups = [vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]];
        let Some(HypothesisResult::KruskalWallis {
            h,
            p,
            epsilon_squared,
            ..
        }) = kruskal_wallis(&groups)
        else {
            panic!("expected Kruskal-Wallis result");
        };
        assert_close(h, 7.2, 1e-9);
        // chi-square(2) survival = exp(-h/2)
        assert_close(p, (-3.6_f64).exp(), 1e-6);
        assert_close(epsilon_squared, (7.2 - 2.0) / 6.0, 1e-9);
    }

    #[test]
    fn test_kruskal_wallis_all_tied() {
        let groups = [vec![2.0, 2.0], vec![2.0, 2.0, 2.0]];
        let result = kruskal_wallis(&groups).unwrap();
        assert!(result.stat().abs() < 1e-9);
        assert!(result.p_value() > 0.999);
    }

    #[test]
    fn test_compare_dispatch() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [3.0, 4.0, 5.0, 6.0];
        let c = [6.0, 7.0, 8.0, 9.0];
        let two = [&a[..], &b[..]];
        let three = [&a[..], &b[..], &c[..]];

        let kind = |groups: &[&[f64]], mode| compare(groups, mode).map(|r| r.kind());
        assert_eq!(kind(&two, TestMode::Auto), Some(TestKind::WelchT));
        assert_eq!(kind(&two, TestMode::Parametric), Some(TestKind::WelchT));
        assert_eq!(kind(&two, TestMode::Nonparametric), Some(TestKind::MannWhitney));
        assert_eq!(kind(&three, TestMode::Auto), Some(TestKind::Anova));
        assert_eq!(kind(&three, TestMode::Parametric), Some(TestKind::Anova));
        assert_eq!(kind(&three, TestMode::Nonparametric), Some(TestKind::KruskalWallis));
    }

    #[test]
    fn test_compare_drops_small_groups() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];
        let tiny = vec![100.0];
        let nan_padded = vec![f64::NAN, 7.0, f64::INFINITY];
        // three groups given, only two usable, so this is a two-sample test
        let result = compare(&[a.clone(), tiny, b.clone(), nan_padded], TestMode::Auto).unwrap();
        assert_eq!(result, welch_t_test(&a, &b).unwrap());
    }

    #[test]
    fn test_compare_single_group() {
        assert!(compare(&[vec![1.0]], TestMode::Auto).is_none());
        assert!(compare::<Vec<f64>>(&[], TestMode::Auto).is_none());
        assert!(compare(&[vec![1.0, 2.0]], TestMode::Nonparametric).is_none());
    }

    #[test]
    fn test_compare_groups_uses_group_values() {
        let groups = [
            GroupSummary::new("a", Sample::from_values([1.0, 2.0, 3.0]), 1.5),
            GroupSummary::new("b", Sample::from_values([4.0, 5.0, 6.0]), 1.5),
        ];
        let result = compare_groups(&groups, TestMode::Nonparametric).unwrap();
        assert_eq!(result.kind(), TestKind::MannWhitney);
        assert_eq!(result.stat_label(), "U");
        assert_eq!(result.effect_label(), "rank-biserial r");
    }

    #[test]
    fn test_shifted_normals_are_detected() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let a = normal_sample(&mut rng, 0.0, 1.0, 200);
        let b = normal_sample(&mut rng, 1.0, 1.0, 200);
        for mode in [TestMode::Parametric, TestMode::Nonparametric] {
            let result = compare(&[&a, &b], mode).unwrap();
            assert!(result.is_significant(1e-6), "{result}");
        }
    }

    #[test]
    fn test_serialized_result_is_tagged() {
        let result = welch_t_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["test"], "welch_t");
        assert!(json["cohens_d"].is_number());
        assert_eq!(TestKind::KruskalWallis.to_string(), "kruskal_wallis");
    }

    #[test]
    fn test_display() {
        let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        let text = result.to_string();
        assert!(text.starts_with("mann_whitney: U = 0.0000"));
        assert!(text.contains("p = 0.0809"));
    }

    #[test]
    fn test_serde_accepts_hyphenated_mode() {
        let mode: TestMode = serde_json::from_str(r#""non-parametric""#).unwrap();
        assert_eq!(mode, TestMode::Nonparametric);
        assert_eq!(serde_json::to_string(&mode).unwrap(), r#""nonparametric""#);
    }

    #[test]
    fn test_welch_ignores_non_finite_values() {
        let clean = welch_t_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        let padded = welch_t_test(&[1.0, 2.0, 3.0, f64::NAN], &[f64::INFINITY, 4.0, 5.0, 6.0]);
        assert!(clean.is_some());
        assert_eq!(padded, clean);
        assert!(welch_t_test(&[1.0, f64::NAN], &[4.0, 5.0]).is_none());
    }

    #[test]
    fn test_mann_whitney_ignores_non_finite_values() {
        let clean = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        let padded = mann_whitney_u(&[1.0, 2.0, 3.0, f64::NAN], &[4.0, f64::NEG_INFINITY, 5.0, 6.0]);
        assert!(clean.is_some());
        assert_eq!(padded, clean);
    }

    #[test]
    fn test_anova_ignores_non_finite_values() {
        let clean = [vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0]];
        let padded = [
            vec![1.0, 2.0, 3.0, f64::NAN],
            vec![4.0, 5.0, 6.0],
            vec![f64::INFINITY, 7.0, 8.0],
        ];
        let result = one_way_anova(&padded);
        assert!(result.is_some_and(|r| r.stat() > 0.0));
        assert_eq!(result, one_way_anova(&clean));
    }

    #[test]
    fn test_kruskal_wallis_ignores_non_finite_values() {
        let clean = [vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0]];
        let padded = [
            vec![1.0, 2.0, 3.0, f64::NAN],
            vec![4.0, 5.0, 6.0],
            vec![7.0, f64::NAN, 8.0],
        ];
        let result = kruskal_wallis(&padded);
        assert!(result.is_some());
        assert_eq!(result, kruskal_wallis(&clean));
    }

    proptest! {
        #[test]
        fn p_values_are_probabilities(
            groups in proptest::collection::vec(
                proptest::collection::vec(-100.0_f64..100.0, 2..20),
                2..5,
            ),
            nonparametric in any::<bool>(),
        ) {
            let mode = if nonparametric { TestMode::Nonparametric } else { TestMode::Parametric };
            if let Some(result) = compare(&groups, mode) {
                let p = result.p_value();
                prop_assert!((0.0..=1.0).contains(&p), "p = {}", p);
            }
        }

        #[test]
        fn compare_is_idempotent(
            groups in proptest::collection::vec(
                proptest::collection::vec(-100.0_f64..100.0, 2..20),
                2..5,
            ),
        ) {
            prop_assert_eq!(
                compare(&groups, TestMode::Nonparametric),
                compare(&groups, TestMode::Nonparametric)
            );
        }
    }
}
