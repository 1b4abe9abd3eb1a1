use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use distlens_stats::grouping::{self, GroupSummary};

use self::{
    analyze::AnalyzeArg, compare::CompareArg, density::DensityArg, summarize::SummarizeArg,
};
use crate::util::{self, Row};

mod analyze;
mod compare;
mod density;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Box-plot summary per group
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Kernel density curves per group on a shared grid
    Density(#[clap(flatten)] DensityArg),
    /// Hypothesis test across groups
    Compare(#[clap(flatten)] CompareArg),
    /// Summaries, densities and comparison in one report
    Analyze(#[clap(flatten)] AnalyzeArg),
}

/// Input rows and the columns to read from them.
#[derive(Debug, Clone, Args)]
pub(crate) struct DataArg {
    /// Path to the rows JSON file (an array of objects)
    pub rows: PathBuf,

    /// Column holding the numeric values
    #[arg(long)]
    pub value: String,

    /// Column used to split rows into groups
    #[arg(long)]
    pub category: Option<String>,

    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl DataArg {
    pub fn read_rows(&self) -> anyhow::Result<Vec<Row>> {
        util::read_rows_file(&self.rows)
    }

    pub fn group(&self, rows: &[Row], whisker_multiplier: f64) -> anyhow::Result<Vec<GroupSummary>> {
        let groups = grouping::group_numeric(
            rows,
            &self.value,
            self.category.as_deref(),
            whisker_multiplier,
        );
        ensure_values(&groups, &self.value)?;
        Ok(groups)
    }
}

fn ensure_values(groups: &[GroupSummary], value_column: &str) -> anyhow::Result<()> {
    if groups.is_empty() {
        anyhow::bail!("No row has a finite number in column '{value_column}'");
    }
    tracing::info!(
        groups = groups.len(),
        values = groups.iter().map(|g| g.values.len()).sum::<usize>(),
        "grouped rows"
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "distlens=debug,distlens_stats=debug"
    } else {
        "distlens=info,distlens_stats=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::Density(arg) => density::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::Analyze(arg) => analyze::run(&arg)?,
    }
    Ok(())
}
