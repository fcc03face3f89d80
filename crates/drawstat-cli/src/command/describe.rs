use clap::Args;
use drawstat_stats::descriptive::DescriptiveStats;

use crate::{command::DrawsArg, config::Settings};

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    #[clap(flatten)]
    draws: DrawsArg,
}

pub(crate) fn run(arg: &DescribeArg, settings: &Settings) -> anyhow::Result<()> {
    let table = arg.draws.load_table(settings)?;

    println!(
        "Column Summary: {} ({} draws)",
        table.schema().id(),
        table.len()
    );
    println!("==========================================\n");
    println!(
        "  {:<18} {:>6} {:>8} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Column", "Count", "Missing", "Min", "Max", "Mean", "Median", "Std dev"
    );
    println!("  {}", "-".repeat(109));

    for (name, field) in table.numeric_fields() {
        let values = table.values(field).flatten().collect::<Vec<_>>();
        let missing = table.len() - values.len();
        match DescriptiveStats::new(values) {
            Some(stats) => println!(
                "  {name:<18} {:>6} {missing:>8} {:>14.6} {:>14.6} {:>14.6} {:>14.6} {:>14.6}",
                stats.count, stats.min, stats.max, stats.mean, stats.median, stats.std_dev
            ),
            None => println!("  {name:<18} {:>6} {missing:>8}", 0),
        }
    }
    Ok(())
}
