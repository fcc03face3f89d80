use std::num::NonZeroUsize;

use clap::Args;
use drawstat_analysis::{
    bucket::BucketSpec,
    frequency::{self, BucketDistribution},
    schema::NumberGroup,
};
use drawstat_stats::frequency::FrequencyTable;

use crate::{command::DrawsArg, config::Settings};

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Args)]
pub(crate) struct FrequencyArg {
    #[clap(flatten)]
    draws: DrawsArg,

    /// Number group to count (primary or secondary)
    #[arg(long, default_value = "primary")]
    group: NumberGroup,

    /// Count only the numbers drawn at this 1-based position
    #[arg(long)]
    position: Option<NonZeroUsize>,

    /// Number of most frequent values listed in the summary
    #[arg(long, default_value_t = 10)]
    most_common: usize,
}

pub(crate) fn run(arg: &FrequencyArg, settings: &Settings) -> anyhow::Result<()> {
    let table = arg.draws.load_table(settings)?;
    let group = arg.group;
    let count = table.schema().count(group);
    anyhow::ensure!(
        count > 0,
        "lottery '{}' has no {group} numbers",
        table.schema().id()
    );

    let (label, values) = match arg.position {
        Some(position) => {
            let column = group.column_name(position.get() - 1);
            let values = frequency::position_frequencies(&table, group, position.get() - 1)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "lottery '{}' has no column {column} ({count} {group} numbers)",
                        table.schema().id()
                    )
                })?;
            (column, values)
        }
        None => (
            format!("{group} numbers"),
            frequency::number_frequencies(&table, group),
        ),
    };

    println!(
        "Frequencies: {} {label} ({} draws)",
        table.schema().id(),
        table.len()
    );
    println!("==========================================\n");
    print_values(&values);
    println!();

    println!("Most common:");
    for (value, count) in values.most_common(arg.most_common) {
        println!("  {value:>4} {count:>6}");
    }
    println!();

    let buckets = frequency::bucket_frequencies(&table, group, &settings.enrichment.bucket);
    println!(
        "Range buckets (width {}, below {}):",
        settings.enrichment.bucket.width(),
        settings.enrichment.bucket.domain_max()
    );
    print_buckets(&buckets, &settings.enrichment.bucket);
    Ok(())
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    "#".repeat(count * BAR_WIDTH / max)
}

fn print_values(values: &FrequencyTable<u32>) {
    let max = values.iter().map(|(_, c)| c).max().unwrap_or(0);
    println!("  {:>5} {:>6} {:>7}", "Value", "Count", "Share");
    for (value, count) in values.iter() {
        println!(
            "  {value:>5} {count:>6} {:>6.2}% {}",
            values.relative(&value) * 100.0,
            bar(count, max)
        );
    }
}

fn print_buckets(distribution: &BucketDistribution, spec: &BucketSpec) {
    let max = distribution
        .buckets
        .iter()
        .map(|(_, c)| c)
        .max()
        .unwrap_or(0);
    for (bucket, count) in distribution.buckets.iter() {
        let range = bucket_range(bucket, spec);
        println!("  {range:>9} {count:>6} {}", bar(count, max));
    }
    if distribution.out_of_domain > 0 {
        println!("  {:>9} {:>6}", "outside", distribution.out_of_domain);
    }
}

/// Inclusive value range covered by `bucket`, as `start-end`.
fn bucket_range(bucket: u32, spec: &BucketSpec) -> String {
    let start = bucket.saturating_mul(spec.width());
    let end = start.saturating_add(spec.width()).min(spec.domain_max()) - 1;
    format!("{start}-{end}")
}
