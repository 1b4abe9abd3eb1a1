use clap::Args;
use distlens_stats::{
    boxplot::DEFAULT_WHISKER_MULTIPLIER,
    kde::{self, DEFAULT_DENSITY_STEPS},
};

use crate::{command::DataArg, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct DensityArg {
    #[clap(flatten)]
    pub data: DataArg,

    /// Number of grid points per curve
    #[arg(long, default_value_t = DEFAULT_DENSITY_STEPS)]
    pub steps: usize,

    /// Multiplier applied to the Silverman bandwidth
    #[arg(long, default_value_t = 1.0)]
    pub bandwidth_factor: f64,
}

pub(crate) fn run(arg: &DensityArg) -> anyhow::Result<()> {
    let rows = arg.data.read_rows()?;
    let groups = arg.data.group(&rows, DEFAULT_WHISKER_MULTIPLIER)?;
    let densities = kde::estimate_groups(&groups, arg.steps, arg.bandwidth_factor);
    Output::save_json(&densities, arg.data.output.as_deref())
}
