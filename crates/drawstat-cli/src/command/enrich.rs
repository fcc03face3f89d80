use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use drawstat_analysis::sink;

use crate::{command::DrawsArg, config::Settings, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct EnrichArg {
    #[clap(flatten)]
    draws: DrawsArg,

    /// Output CSV file [default: stdout]
    #[arg(long, short)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EnrichArg, settings: &Settings) -> anyhow::Result<()> {
    let table = arg.draws.load_table(settings)?;
    let mut output = Output::create(arg.output.as_deref())?;
    sink::write_enriched(&table, &mut output)
        .with_context(|| format!("Failed to write {output}"))?;
    if output.path().is_some() {
        println!("Wrote {} enriched draws to {output}", table.len());
    }
    Ok(())
}
