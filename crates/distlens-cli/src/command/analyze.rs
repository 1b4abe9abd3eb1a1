use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Args;
use distlens_stats::{
    analysis::Analysis,
    config::AnalysisConfig,
    hypothesis::TestMode,
};
use serde::Serialize;

use crate::{
    command::DataArg,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeArg {
    #[clap(flatten)]
    pub data: DataArg,

    /// Analysis configuration JSON file; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fence distance from the quartiles, in IQRs
    #[arg(long)]
    pub whisker: Option<f64>,

    /// Number of grid points per density curve
    #[arg(long)]
    pub steps: Option<usize>,

    /// Multiplier applied to the Silverman bandwidth
    #[arg(long)]
    pub bandwidth_factor: Option<f64>,

    /// Test family: auto, parametric or nonparametric
    #[arg(long)]
    pub mode: Option<TestMode>,
}

#[derive(Debug, Serialize)]
struct AnalysisReport<'a> {
    generated_at: DateTime<Utc>,
    input: &'a Path,
    value_column: &'a str,
    category_column: Option<&'a str>,
    rows: usize,
    config: AnalysisConfig,
    #[serde(flatten)]
    analysis: Analysis,
}

impl AnalyzeArg {
    fn resolve_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<AnalysisConfig, _>("config", path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(whisker) = self.whisker {
            config.whisker_multiplier = whisker;
        }
        if let Some(steps) = self.steps {
            config.density_steps = steps;
        }
        if let Some(factor) = self.bandwidth_factor {
            config.bandwidth_factor = factor;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        Ok(config.sanitized())
    }
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = arg.resolve_config()?;
    tracing::debug!(?config, "resolved analysis config");

    let rows = arg.data.read_rows()?;
    let groups = arg.data.group(&rows, config.whisker_multiplier)?;
    let analysis = Analysis::from_groups(groups, &config);
    if let Some(comparison) = &analysis.comparison {
        tracing::info!("{comparison}");
    }

    let report = AnalysisReport {
        generated_at: Utc::now(),
        input: &arg.data.rows,
        value_column: &arg.data.value,
        category_column: arg.data.category.as_deref(),
        rows: rows.len(),
        config,
        analysis,
    };
    Output::save_json(&report, arg.data.output.as_deref())
}
