use clap::{Args, ValueEnum};
use drawstat_analysis::correlation::{self, CorrelationResult, ScanReport};

use crate::{command::DrawsArg, config::Settings, util::Output};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum RankOrder {
    /// Ascending correlation coefficient
    #[default]
    R,
    /// Descending absolute correlation coefficient
    Strength,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct CorrelateArg {
    #[clap(flatten)]
    draws: DrawsArg,

    /// Show only the first N ranked relations
    #[arg(long)]
    top: Option<usize>,

    /// Ranking order
    #[arg(long, value_enum, default_value_t)]
    rank: RankOrder,

    /// Report format
    #[arg(long, value_enum, default_value_t)]
    output: ReportFormat,
}

pub(crate) fn run(arg: &CorrelateArg, settings: &Settings) -> anyhow::Result<()> {
    let table = arg.draws.load_table(settings)?;
    let ScanReport {
        results,
        failures,
        skipped,
    } = correlation::scan(&table, &settings.relations);

    let mut ranked = match arg.rank {
        RankOrder::R => correlation::rank_by_r(results),
        RankOrder::Strength => correlation::rank_by_strength(results),
    };
    if let Some(top) = arg.top {
        ranked.truncate(top);
    }
    let report = ScanReport {
        results: ranked,
        failures,
        skipped,
    };

    match arg.output {
        ReportFormat::Json => Output::stdout().write_json(&report)?,
        ReportFormat::Table => print_report(table.schema().id(), table.len(), &report),
    }
    Ok(())
}

fn print_report(lottery: &str, draws: usize, report: &ScanReport) {
    println!("Correlation Scan: {lottery} ({draws} draws)");
    println!("==========================================\n");

    print_results(&report.results);
    println!();

    if !report.failures.is_empty() {
        println!("Omitted relations:");
        for failure in &report.failures {
            println!("  {:<40} {}", failure.name, failure.error);
        }
        println!();
    }
    println!(
        "{} ranked, {} omitted, {} skipped (columns not in this lottery)",
        report.results.len(),
        report.failures.len(),
        report.skipped.len()
    );
}

fn print_results(results: &[CorrelationResult]) {
    println!(
        "  {:<40} {:>8} {:>12} {:>12} {:>6}",
        "Relation", "r", "Slope", "Intercept", "n"
    );
    println!("  {}", "-".repeat(82));
    for result in results {
        println!(
            "  {:<40} {:>8.4} {:>12.4e} {:>12.4} {:>6}",
            result.name, result.r, result.slope, result.intercept, result.n
        );
    }
}
