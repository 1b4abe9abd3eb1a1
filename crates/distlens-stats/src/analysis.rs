//! End-to-end distribution analysis: rows in, chart-ready values out.

use serde::Serialize;

use crate::{
    config::AnalysisConfig,
    grouping::{self, GroupSummary},
    hypothesis::{self, HypothesisResult},
    kde::{self, GroupDensity},
    sample::Record,
};

/// Everything a distribution chart needs for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub groups: Vec<GroupSummary>,
    /// One curve per group, all on a shared grid.
    pub densities: Vec<GroupDensity>,
    /// `None` when the groups cannot be compared.
    pub comparison: Option<HypothesisResult>,
}

impl Analysis {
    /// Groups `rows`, estimates densities and compares the groups.
    ///
    /// The configuration is sanitized before use.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use distlens_stats::{analysis::Analysis, config::AnalysisConfig, sample::CellValue};
    ///
    /// let rows = [("a", 1.0), ("a", 2.0), ("a", 3.0), ("b", 4.0), ("b", 5.0), ("b", 6.0)]
    ///     .into_iter()
    ///     .map(|(g, v)| {
    ///         BTreeMap::from([
    ///             ("g".to_owned(), CellValue::from(g)),
    ///             ("v".to_owned(), CellValue::from(v)),
    ///         ])
    ///     })
    ///     .collect::<Vec<_>>();
    ///
    /// let analysis = Analysis::run(&rows, "v", Some("g"), &AnalysisConfig::default());
    /// assert_eq!(analysis.groups.len(), 2);
    /// assert_eq!(analysis.densities.len(), 2);
    /// assert!(analysis.comparison.unwrap().p_value() < 0.05);
    /// ```
    #[must_use]
    pub fn run<R>(
        rows: &[R],
        numeric_column: &str,
        category_column: Option<&str>,
        config: &AnalysisConfig,
    ) -> Self
    where
        R: Record,
    {
        let config = config.sanitized();
        let groups = grouping::group_numeric(
            rows,
            numeric_column,
            category_column,
            config.whisker_multiplier,
        );
        Self::from_groups(groups, &config)
    }

    /// Runs the density and comparison stages over existing groups.
    #[must_use]
    pub fn from_groups(groups: Vec<GroupSummary>, config: &AnalysisConfig) -> Self {
        let config = config.sanitized();
        let densities = kde::estimate_groups(&groups, config.density_steps, config.bandwidth_factor);
        let comparison = hypothesis::compare_groups(&groups, config.mode);
        tracing::debug!(
            groups = groups.len(),
            comparable = comparison.is_some(),
            "analysis finished"
        );
        Self {
            groups,
            densities,
            comparison,
        }
    }
}
