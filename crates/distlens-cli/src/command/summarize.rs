use clap::Args;
use distlens_stats::boxplot::{DEFAULT_WHISKER_MULTIPLIER, sanitize_whisker_multiplier};

use crate::{command::DataArg, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummarizeArg {
    #[clap(flatten)]
    pub data: DataArg,

    /// Fence distance from the quartiles, in IQRs
    #[arg(long, default_value_t = DEFAULT_WHISKER_MULTIPLIER)]
    pub whisker: f64,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let rows = arg.data.read_rows()?;
    let groups = arg
        .data
        .group(&rows, sanitize_whisker_multiplier(arg.whisker))?;
    for group in &groups {
        tracing::debug!(
            label = %group.label,
            n = group.summary.quantiles.n,
            outliers = group.summary.outliers.len(),
            "summarized group"
        );
    }
    Output::save_json(&groups, arg.data.output.as_deref())
}
