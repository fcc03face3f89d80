//! Feature enrichment and correlation scanning for lottery draw histories
//!
//! This crate turns the raw result file of a lottery into an enriched table
//! of derived features and scans that table for linear relationships.
//!
//! # Overview
//!
//! ## Enrichment Workflow
//!
//! 1. **Select a Schema** ([`schema::SchemaRegistry`]): Column layout, number ranges
//!    and date format of a lottery, looked up by identifier
//! 2. **Read Rows** ([`source::read_raw_rows`]): Headerless CSV into [`record::RawRow`]s
//! 3. **Enrich** ([`enrich::Enricher`]): Parse each row and derive
//!    - calendar fields ([`calendar::CalendarFields`])
//!    - celestial distances from a [`DistanceProvider`](drawstat_ephemeris::DistanceProvider)
//!    - fixed-width range buckets ([`bucket::BucketSpec`])
//! 4. **Write** ([`sink::write_enriched`]): The enriched table as CSV with a header row
//!
//! ## Analysis Workflow
//!
//! 1. **Describe Relations** ([`relation::RelationCatalogue`]): Named column pairs
//! 2. **Scan** ([`correlation::scan`]): Pearson's r for each pair present in the table
//! 3. **Rank** ([`correlation::rank_by_r`]): Stable ordering by coefficient
//! 4. **Count** ([`frequency`]): Number, position and bucket frequencies
//!
//! # Examples
//!
//! ```
//! use drawstat_analysis::{
//!     correlation::{rank_by_r, scan},
//!     enrich::{EnrichmentConfig, Enricher},
//!     relation::RelationCatalogue,
//!     schema::SchemaRegistry,
//!     sink::write_enriched,
//!     source::read_raw_rows,
//! };
//! use drawstat_ephemeris::Ephemeris;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let data = "\
//! 1,06.01.2001,3,12,13,16,23,41,7
//! 2,13.01.2001,5,14,19,28,37,45,2
//! 3,20.01.2001,1,8,22,29,33,48,5
//! 4,27.01.2001,2,9,17,30,38,44,9
//! ";
//! let registry = SchemaRegistry::builtin();
//! let schema = registry.lookup("lotto")?;
//! let config = EnrichmentConfig::default();
//!
//! let rows = read_raw_rows(data.as_bytes())?;
//! let table = Enricher::new(schema, Ephemeris, &config).enrich_table(&rows)?;
//!
//! let mut csv = vec![];
//! write_enriched(&table, &mut csv)?;
//! assert!(String::from_utf8(csv)?.starts_with("index,date,n1,"));
//!
//! let catalogue = RelationCatalogue::default_catalogue(&registry, &config.pairs);
//! let report = scan(&table, &catalogue);
//! for result in rank_by_r(report.results).iter().take(3) {
//!     println!("{}: r = {:.3}", result.name, result.r);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bucket;
pub mod calendar;
pub mod correlation;
pub mod enrich;
pub mod frequency;
pub mod record;
pub mod relation;
pub mod schema;
pub mod sink;
pub mod source;
pub mod table;
