use std::{num::NonZeroUsize, path::PathBuf, thread};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use drawstat_analysis::{enrich::Enricher, table::EnrichedTable};
use drawstat_ephemeris::Ephemeris;

use crate::{config::Settings, util};

use self::{
    correlate::CorrelateArg, describe::DescribeArg, enrich::EnrichArg, frequency::FrequencyArg,
};

mod correlate;
mod describe;
mod enrich;
mod frequency;
mod lotteries;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log level written to stderr (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// JSON configuration file overriding lotteries, pairs, buckets and relations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// What to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// List the registered lotteries
    Lotteries,
    /// Write the enriched table of a draws file as CSV
    Enrich(#[clap(flatten)] EnrichArg),
    /// Rank the configured relations by correlation coefficient
    Correlate(#[clap(flatten)] CorrelateArg),
    /// Show number and range bucket frequencies
    Frequency(#[clap(flatten)] FrequencyArg),
    /// Summarize every numeric column of the enriched table
    Describe(#[clap(flatten)] DescribeArg),
}

/// Lottery and draws file shared by the data commands.
#[derive(Debug, Clone, Args)]
pub(crate) struct DrawsArg {
    /// Lottery identifier (see `lotteries`)
    lottery: String,

    /// Path to the headerless draws CSV file
    input: PathBuf,

    /// Number of enrichment worker threads [default: available parallelism]
    #[arg(long)]
    workers: Option<NonZeroUsize>,
}

impl DrawsArg {
    /// Read and enrich the draws file.
    fn load_table(&self, settings: &Settings) -> anyhow::Result<EnrichedTable> {
        let schema = settings.registry.lookup(&self.lottery)?;
        let rows = util::read_draws_file(&self.input)?;
        let workers = self
            .workers
            .or_else(|| thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN);

        let enricher = Enricher::new(schema, Ephemeris, &settings.enrichment);
        let table = enricher
            .enrich_table_parallel(&rows, workers)
            .with_context(|| format!("Failed to enrich {}", self.input.display()))?;
        tracing::info!(
            lottery = schema.id(),
            rows = table.len(),
            workers = workers.get(),
            "draws enriched"
        );
        Ok(table)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(args.config.as_deref())?;
    match &args.mode {
        Mode::Lotteries => lotteries::run(&settings),
        Mode::Enrich(arg) => enrich::run(arg, &settings)?,
        Mode::Correlate(arg) => correlate::run(arg, &settings)?,
        Mode::Frequency(arg) => frequency::run(arg, &settings)?,
        Mode::Describe(arg) => describe::run(arg, &settings)?,
    }
    Ok(())
}
