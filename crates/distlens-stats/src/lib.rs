//! Statistics behind distribution charts for the Distlens project.
//!
//! This crate turns loosely typed tabular rows into the numbers a
//! box-plot/violin chart needs:
//!
//! - **Grouping**: Split rows by a category column and keep finite numeric values
//! - **Box plots**: Quartiles, Tukey fences, whiskers and outliers per group
//! - **Density estimation**: Gaussian KDE on a grid shared by all groups
//! - **Hypothesis tests**: Welch t, Mann-Whitney U, one-way ANOVA and Kruskal-Wallis
//! - **Special functions**: erf, log-gamma and regularized incomplete beta/gamma
//!
//! # Modules
//!
//! - [`sample`]: Cell values, row access and numeric samples
//! - [`descriptive`]: Quantiles, mean and variance
//! - [`boxplot`]: Box-plot summaries with Tukey fences
//! - [`grouping`]: Row grouping by category
//! - [`kde`]: Kernel density estimation
//! - [`rank`]: Mid-rank assignment for rank-based tests
//! - [`special`]: Special functions and distribution CDFs
//! - [`hypothesis`]: Group comparison tests
//! - [`config`]: Analysis configuration
//! - [`analysis`]: The full pipeline in one call
//!
//! # Examples
//!
//! ## Summarizing a sample
//!
//! ```
//! use distlens_stats::boxplot::BoxSummary;
//!
//! let summary = BoxSummary::new([1.0, 2.0, 3.0, 4.0, 100.0], 1.5);
//! assert_eq!(summary.quantiles.median, 3.0);
//! assert_eq!(summary.outliers, vec![100.0]);
//! assert_eq!(summary.upper_whisker, 4.0);
//! ```
//!
//! ## Comparing two groups
//!
//! ```
//! use distlens_stats::hypothesis::{self, TestKind, TestMode};
//!
//! let a = [1.0, 2.0, 3.0];
//! let b = [4.0, 5.0, 6.0];
//! let result = hypothesis::compare(&[&a[..], &b[..]], TestMode::Nonparametric).unwrap();
//! assert_eq!(result.kind(), TestKind::MannWhitney);
//! assert_eq!(result.stat(), 0.0);
//! ```
//!
//! ## Estimating a density
//!
//! ```
//! use distlens_stats::kde;
//!
//! let values = [1.0, 2.0, 2.5, 3.0];
//! let bandwidth = kde::silverman_bandwidth(&values, 1.0, 3.0);
//! let domain = kde::density_domain(0.0, 4.0, 50);
//! let curve = kde::estimate(&values, &domain, bandwidth);
//! assert_eq!(curve.len(), 50);
//! assert!(curve.iter().all(|p| p.density >= 0.0));
//! ```

pub mod analysis;
pub mod boxplot;
pub mod config;
pub mod descriptive;
pub mod grouping;
pub mod hypothesis;
pub mod kde;
pub mod rank;
pub mod sample;
pub mod special;
