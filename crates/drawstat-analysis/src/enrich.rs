//! Per-row feature derivation
//!
//! The [`Enricher`] turns raw rows of one lottery into [`EnrichedRecord`]s:
//!
//! 1. Parse the row against the schema ([`DrawRecord::parse`]); the date is parsed once
//! 2. Derive the calendar features from that date
//! 3. Query the distance provider for every tracked body pair at a fixed UTC hour
//! 4. Bucket every primary and secondary number
//!
//! Batches are all-or-nothing: the first row that fails aborts the batch
//! with a [`BatchEnrichmentError`] carrying its 0-based row index, since
//! downstream correlation needs a complete, aligned table.
//!
//! # Examples
//!
//! ```
//! use drawstat_analysis::{
//!     enrich::{EnrichmentConfig, Enricher},
//!     record::RawRow,
//!     schema::SchemaRegistry,
//! };
//! use drawstat_ephemeris::Ephemeris;
//!
//! let registry = SchemaRegistry::builtin();
//! let schema = registry.lookup("lotto").unwrap();
//! let config = EnrichmentConfig::default();
//! let enricher = Enricher::new(schema, Ephemeris, &config);
//!
//! let row: RawRow = ["1", "09.10.1955", "3", "12", "13", "16", "23", "41", "7"]
//!     .into_iter()
//!     .collect();
//! let table = enricher.enrich_table(&[row]).unwrap();
//! assert_eq!(table.records()[0].calendar.day_of_week, 6); // Sunday
//! assert_eq!(table.records()[0].primary_buckets[5], Some(4));
//! ```

use std::{num::NonZeroUsize, thread};

use drawstat_ephemeris::{Body, BodyPair, DistanceProvider, DistanceProviderError};

use crate::{
    bucket::BucketSpec,
    calendar::CalendarFields,
    record::{DrawRecord, RawRow, RecordError},
    schema::LotterySchema,
    table::{EnrichedRecord, EnrichedTable},
};

/// UTC hour at which distances are evaluated.
pub const DEFAULT_HOUR_UTC: u32 = 9;

pub const DEFAULT_PAIRS: [BodyPair; 4] = [
    BodyPair::new(Body::Earth, Body::Moon),
    BodyPair::new(Body::Earth, Body::Sun),
    BodyPair::new(Body::Earth, Body::Mars),
    BodyPair::new(Body::Moon, Body::Sun),
];

/// What the enricher derives besides the calendar features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentConfig {
    pub pairs: Vec<BodyPair>,
    pub bucket: BucketSpec,
    pub hour_utc: u32,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_PAIRS.to_vec(),
            bucket: BucketSpec::default(),
            hour_utc: DEFAULT_HOUR_UTC,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EnrichError {
    #[display("{source}")]
    Record { source: RecordError },
    #[display("distance {pair}: {source}")]
    Distance {
        pair: BodyPair,
        source: DistanceProviderError,
    },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("row {row}: {source}")]
pub struct BatchEnrichmentError {
    /// 0-based index of the failing row in the input.
    pub row: usize,
    pub source: EnrichError,
}

/// Derives enriched records for one lottery schema.
#[derive(Debug)]
pub struct Enricher<'a, P> {
    schema: &'a LotterySchema,
    provider: P,
    config: &'a EnrichmentConfig,
}

impl<'a, P> Enricher<'a, P>
where
    P: DistanceProvider,
{
    pub fn new(schema: &'a LotterySchema, provider: P, config: &'a EnrichmentConfig) -> Self {
        Self {
            schema,
            provider,
            config,
        }
    }

    pub fn enrich_row(&self, row: &RawRow) -> Result<EnrichedRecord, EnrichError> {
        let draw =
            DrawRecord::parse(row, self.schema).map_err(|source| EnrichError::Record { source })?;
        let calendar = CalendarFields::from_date(draw.date);

        let distances = self
            .config
            .pairs
            .iter()
            .map(|&pair| {
                self.provider
                    .distance(pair.a, pair.b, draw.date, self.config.hour_utc)
                    .map_err(|source| EnrichError::Distance { pair, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bucket = |values: &[u32]| {
            values
                .iter()
                .map(|&v| self.config.bucket.bucket(v))
                .collect::<Vec<_>>()
        };
        let primary_buckets = bucket(&draw.primary);
        let secondary_buckets = bucket(&draw.secondary);

        Ok(EnrichedRecord {
            draw,
            calendar,
            distances,
            primary_buckets,
            secondary_buckets,
        })
    }

    /// Enriches every row in order on the calling thread.
    pub fn enrich_table(&self, rows: &[RawRow]) -> Result<EnrichedTable, BatchEnrichmentError> {
        let records = self.enrich_rows(rows, 0)?;
        tracing::debug!(
            lottery = self.schema.id(),
            rows = records.len(),
            "enrichment complete"
        );
        Ok(self.table(records))
    }

    /// Enriches rows on up to `workers` scoped threads.
    ///
    /// Rows are split into contiguous chunks, so the output keeps input order
    /// and a failure reports the lowest failing row index, exactly as
    /// [`enrich_table`](Self::enrich_table) would.
    pub fn enrich_table_parallel(
        &self,
        rows: &[RawRow],
        workers: NonZeroUsize,
    ) -> Result<EnrichedTable, BatchEnrichmentError> {
        if workers.get() == 1 || rows.len() < 2 {
            return self.enrich_table(rows);
        }
        let chunk_size = rows.len().div_ceil(workers.get());

        let chunk_results = thread::scope(|s| {
            let handles = rows
                .chunks(chunk_size)
                .enumerate()
                .map(|(i, chunk)| s.spawn(move || self.enrich_rows(chunk, i * chunk_size)))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect::<Vec<_>>()
        });

        let mut records = Vec::with_capacity(rows.len());
        for chunk in chunk_results {
            records.extend(chunk?);
        }
        tracing::debug!(
            lottery = self.schema.id(),
            rows = records.len(),
            workers = workers.get(),
            "parallel enrichment complete"
        );
        Ok(self.table(records))
    }

    fn enrich_rows(
        &self,
        rows: &[RawRow],
        offset: usize,
    ) -> Result<Vec<EnrichedRecord>, BatchEnrichmentError> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                self.enrich_row(row).map_err(|source| BatchEnrichmentError {
                    row: offset + i,
                    source,
                })
            })
            .collect()
    }

    fn table(&self, records: Vec<EnrichedRecord>) -> EnrichedTable {
        EnrichedTable::new(self.schema.clone(), self.config.pairs.clone(), records)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;
    use drawstat_ephemeris::Ephemeris;

    use super::*;
    use crate::schema::{NumberGroup, SchemaRegistry};

    /// Distance equal to the day of month, for predictable assertions.
    #[derive(Debug, Default)]
    struct DayOfMonthProvider {
        calls: AtomicUsize,
    }

    impl DistanceProvider for DayOfMonthProvider {
        fn distance(
            &self,
            _a: Body,
            _b: Body,
            date: NaiveDate,
            hour_utc: u32,
        ) -> Result<f64, DistanceProviderError> {
            use chrono::Datelike as _;
            assert_eq!(hour_utc, DEFAULT_HOUR_UTC);
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(f64::from(date.day()))
        }
    }

    struct FailingProvider;

    impl DistanceProvider for FailingProvider {
        fn distance(
            &self,
            _a: Body,
            _b: Body,
            _date: NaiveDate,
            hour_utc: u32,
        ) -> Result<f64, DistanceProviderError> {
            Err(DistanceProviderError::InvalidHour { hour: hour_utc })
        }
    }

    fn lotto_row(index: usize, date: &str) -> RawRow {
        let index = index.to_string();
        [index.as_str(), date, "3", "12", "13", "16", "23", "41", "7"]
            .into_iter()
            .collect()
    }

    fn lotto_rows(count: usize) -> Vec<RawRow> {
        let start = NaiveDate::from_ymd_opt(2001, 1, 6).unwrap();
        (0..count)
            .map(|i| {
                let date = start + chrono::Days::new(7 * i as u64);
                lotto_row(i + 1, &date.format("%d.%m.%Y").to_string())
            })
            .collect()
    }

    #[test]
    fn test_enrich_row_feature_counts() {
        let registry = SchemaRegistry::builtin();
        let config = EnrichmentConfig::default();
        for schema in registry.iter() {
            let mut fields = vec!["1".to_owned(), "06.01.2001".to_owned()];
            if schema.has_time() {
                fields.push("19:10".to_owned());
            }
            for group in NumberGroup::ALL {
                if let Some(range) = schema.range(group) {
                    fields.extend((0..schema.count(group)).map(|_| range.max.to_string()));
                }
            }
            let provider = DayOfMonthProvider::default();
            let enricher = Enricher::new(schema, &provider, &config);
            let record = enricher.enrich_row(&RawRow::new(fields)).unwrap();

            assert_eq!(
                record.primary_buckets.len() + record.secondary_buckets.len(),
                schema.primary_count() + schema.secondary_count()
            );
            assert_eq!(record.distances.len(), config.pairs.len());
            assert_eq!(provider.calls.load(Ordering::Relaxed), config.pairs.len());
        }
    }

    #[test]
    fn test_enrich_row_values() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.lookup("lotto").unwrap();
        let config = EnrichmentConfig::default();
        let enricher = Enricher::new(schema, DayOfMonthProvider::default(), &config);

        let record = enricher.enrich_row(&lotto_row(1, "01.03.2024")).unwrap();
        assert_eq!(record.calendar.year, 2024);
        assert_eq!(record.calendar.month, 3);
        assert_eq!(record.calendar.day, 1);
        assert_eq!(record.calendar.day_of_week, 4);
        assert_eq!(record.calendar.day_of_year, 61);
        assert_eq!(record.distances, vec![1.0; 4]);
        assert_eq!(
            record.primary_buckets,
            [Some(0), Some(1), Some(1), Some(1), Some(2), Some(4)]
        );
        assert_eq!(record.secondary_buckets, [Some(0)]);
    }

    #[test]
    fn test_numbers_beyond_bucket_domain_have_no_bucket() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.lookup("lotto").unwrap();
        let config = EnrichmentConfig {
            bucket: BucketSpec::new(10, 40).unwrap(),
            ..EnrichmentConfig::default()
        };
        let enricher = Enricher::new(schema, DayOfMonthProvider::default(), &config);
        let record = enricher.enrich_row(&lotto_row(1, "01.03.2024")).unwrap();
        assert_eq!(record.primary_buckets[4], Some(2));
        assert_eq!(record.primary_buckets[5], None);
    }

    #[test]
    fn test_batch_failure_reports_row_index() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.lookup("lotto").unwrap();
        let config = EnrichmentConfig::default();
        let enricher = Enricher::new(schema, DayOfMonthProvider::default(), &config);

        let mut rows = lotto_rows(5);
        rows[3] = lotto_row(4, "31.02.2001");
        let err = enricher.enrich_table(&rows).unwrap_err();
        assert_eq!(err.row, 3);
        assert!(matches!(
            err.source,
            EnrichError::Record {
                source: RecordError::Date { .. }
            }
        ));
    }

    #[test]
    fn test_distance_failure_is_reported() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.lookup("lotto").unwrap();
        let config = EnrichmentConfig::default();
        let enricher = Enricher::new(schema, FailingProvider, &config);
        let err = enricher.enrich_table(&lotto_rows(2)).unwrap_err();
        assert_eq!(err.row, 0);
        assert!(matches!(
            err.source,
            EnrichError::Distance { pair, .. } if pair == DEFAULT_PAIRS[0]
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.lookup("lotto").unwrap();
        let config = EnrichmentConfig::default();
        let enricher = Enricher::new(schema, Ephemeris, &config);
        let rows = lotto_rows(37);

        let sequential = enricher.enrich_table(&rows).unwrap();
        for workers in [1, 2, 3, 8, 64] {
            let parallel = enricher
                .enrich_table_parallel(&rows, NonZeroUsize::new(workers).unwrap())
                .unwrap();
            assert_eq!(parallel, sequential, "workers={workers}");
        }
        let indices = sequential
            .records()
            .iter()
            .map(|r| r.draw.index)
            .collect::<Vec<_>>();
        assert_eq!(indices, (1..=37).collect::<Vec<_>>());
    }

    #[test]
    fn test_parallel_reports_lowest_failing_row() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.lookup("lotto").unwrap();
        let config = EnrichmentConfig::default();
        let enricher = Enricher::new(schema, DayOfMonthProvider::default(), &config);

        let mut rows = lotto_rows(20);
        rows[17] = lotto_row(18, "bad");
        rows[6] = lotto_row(7, "bad");
        let err = enricher
            .enrich_table_parallel(&rows, NonZeroUsize::new(4).unwrap())
            .unwrap_err();
        assert_eq!(err.row, 6);
    }

    #[test]
    fn test_empty_batch() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.lookup("eurojackpot").unwrap();
        let config = EnrichmentConfig::default();
        let enricher = Enricher::new(schema, Ephemeris, &config);
        let table = enricher
            .enrich_table_parallel(&[], NonZeroUsize::new(4).unwrap())
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.schema().id(), "eurojackpot");
    }
}
