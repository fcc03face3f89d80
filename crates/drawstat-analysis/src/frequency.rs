//! How often each number, position value and range bucket was drawn
//!
//! Every table is seeded with the full domain of its key (the group's
//! number range, or every bucket of a [`BucketSpec`]) so numbers that were
//! never drawn still appear with a zero count.

use drawstat_stats::frequency::FrequencyTable;
use serde::Serialize;

use crate::{bucket::BucketSpec, schema::NumberGroup, table::EnrichedTable};

fn seeded(table: &EnrichedTable, group: NumberGroup) -> FrequencyTable<u32> {
    table
        .schema()
        .range(group)
        .map(|range| FrequencyTable::with_keys(range.values()))
        .unwrap_or_default()
}

/// Counts of every number of `group` over all positions.
#[must_use]
pub fn number_frequencies(table: &EnrichedTable, group: NumberGroup) -> FrequencyTable<u32> {
    let mut counts = seeded(table, group);
    for record in table.records() {
        counts.extend(record.draw.numbers(group).iter().copied());
    }
    counts
}

/// Counts of the numbers drawn at 0-based `position` of `group`.
///
/// Returns `None` if the group has no such position.
#[must_use]
pub fn position_frequencies(
    table: &EnrichedTable,
    group: NumberGroup,
    position: usize,
) -> Option<FrequencyTable<u32>> {
    if position >= table.schema().count(group) {
        return None;
    }
    let mut counts = seeded(table, group);
    counts.extend(
        table
            .records()
            .iter()
            .filter_map(|record| record.draw.numbers(group).get(position).copied()),
    );
    Some(counts)
}

/// Bucket counts of a number group, plus the numbers that had no bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketDistribution {
    pub buckets: FrequencyTable<u32>,
    /// Numbers at or above the bucket domain maximum.
    pub out_of_domain: usize,
}

impl Serialize for BucketDistribution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct Repr {
            buckets: Vec<(u32, usize)>,
            out_of_domain: usize,
        }
        Repr {
            buckets: self.buckets.iter().collect(),
            out_of_domain: self.out_of_domain,
        }
        .serialize(serializer)
    }
}

/// Bucket counts over all positions of `group`.
///
/// `spec` should be the one the table was enriched with; it only decides
/// which bucket indices are listed at zero count.
#[must_use]
pub fn bucket_frequencies(
    table: &EnrichedTable,
    group: NumberGroup,
    spec: &BucketSpec,
) -> BucketDistribution {
    let mut distribution = BucketDistribution {
        buckets: FrequencyTable::with_keys(0..spec.bucket_count()),
        out_of_domain: 0,
    };
    for bucket in table.records().iter().flat_map(|r| r.buckets(group)) {
        match bucket {
            Some(b) => distribution.buckets.insert(*b),
            None => distribution.out_of_domain += 1,
        }
    }
    distribution
}
