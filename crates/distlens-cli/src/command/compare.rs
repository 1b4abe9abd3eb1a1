use clap::Args;
use distlens_stats::{
    boxplot::DEFAULT_WHISKER_MULTIPLIER,
    hypothesis::{self, TestMode},
};

use crate::{command::DataArg, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    #[clap(flatten)]
    pub data: DataArg,

    /// Test family: auto, parametric or nonparametric
    #[arg(long, default_value_t = TestMode::Auto)]
    pub mode: TestMode,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let rows = arg.data.read_rows()?;
    let groups = arg.data.group(&rows, DEFAULT_WHISKER_MULTIPLIER)?;
    let result = hypothesis::compare_groups(&groups, arg.mode);
    match &result {
        Some(result) => tracing::info!("{result}"),
        None => tracing::warn!("fewer than two groups have at least two values; nothing to compare"),
    }
    Output::save_json(&result, arg.data.output.as_deref())
}
