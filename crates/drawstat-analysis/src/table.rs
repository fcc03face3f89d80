//! The enriched table and column access by name
//!
//! An [`EnrichedTable`] keeps the records produced by the
//! [`Enricher`](crate::enrich::Enricher) in input order, together with the
//! schema and tracked body pairs that define its columns.
//!
//! # Columns
//!
//! ```text
//! index, date, [time], n1..nP, s1..sS             raw columns
//! year, month, day, day_of_week, day_of_year      calendar features
//! dist_<a>_<b> ...                                one per tracked body pair
//! n1_bucket..nP_bucket, s1_bucket..sS_bucket      range buckets
//! ```
//!
//! Every column except `date` and `time` is numeric and can be addressed
//! through [`EnrichedTable::resolve`] / [`EnrichedTable::column`].

use drawstat_ephemeris::BodyPair;

use crate::{
    calendar::{CalendarField, CalendarFields},
    record::DrawRecord,
    schema::{DATE_COLUMN, INDEX_COLUMN, LotterySchema, NumberGroup, TIME_COLUMN},
};

/// A draw record together with its derived features.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub draw: DrawRecord,
    pub calendar: CalendarFields,
    /// Distances in AU, aligned with the table's body pairs.
    pub distances: Vec<f64>,
    pub primary_buckets: Vec<Option<u32>>,
    pub secondary_buckets: Vec<Option<u32>>,
}

impl EnrichedRecord {
    #[must_use]
    pub fn buckets(&self, group: NumberGroup) -> &[Option<u32>] {
        match group {
            NumberGroup::Primary => &self.primary_buckets,
            NumberGroup::Secondary => &self.secondary_buckets,
        }
    }

    /// Numeric value of `field`, `None` when absent for this record.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::Index => Some(self.draw.index as f64),
            Field::Calendar(f) => Some(self.calendar.get(f) as f64),
            Field::Distance(i) => self.distances.get(i).copied(),
            Field::Number(group, k) => self.draw.numbers(group).get(k).copied().map(f64::from),
            Field::Bucket(group, k) => self.buckets(group).get(k).copied().flatten().map(f64::from),
        }
    }

    /// Text cell of `field` as written by the sink; empty when absent.
    #[must_use]
    pub fn cell(&self, field: Field) -> String {
        match field {
            Field::Index => self.draw.index.to_string(),
            Field::Calendar(f) => self.calendar.get(f).to_string(),
            Field::Distance(i) => self
                .distances
                .get(i)
                .map(f64::to_string)
                .unwrap_or_default(),
            Field::Number(group, k) => self
                .draw
                .numbers(group)
                .get(k)
                .map(u32::to_string)
                .unwrap_or_default(),
            Field::Bucket(group, k) => self
                .buckets(group)
                .get(k)
                .copied()
                .flatten()
                .as_ref()
                .map(u32::to_string)
                .unwrap_or_default(),
        }
    }
}

/// A numeric column of the enriched table, addressed by role and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Index,
    Calendar(CalendarField),
    /// Index into the table's body pairs.
    Distance(usize),
    /// 0-based position within the number group.
    Number(NumberGroup, usize),
    /// Range bucket of the 0-based position within the number group.
    Bucket(NumberGroup, usize),
}

/// Enriched records of one lottery in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    schema: LotterySchema,
    pairs: Vec<BodyPair>,
    records: Vec<EnrichedRecord>,
}

impl EnrichedTable {
    #[must_use]
    pub fn new(schema: LotterySchema, pairs: Vec<BodyPair>, records: Vec<EnrichedRecord>) -> Self {
        Self {
            schema,
            pairs,
            records,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &LotterySchema {
        &self.schema
    }

    #[must_use]
    pub fn pairs(&self) -> &[BodyPair] {
        &self.pairs
    }

    #[must_use]
    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw numeric columns in file order (`index`, then the numbers).
    fn raw_fields(&self) -> impl Iterator<Item = (String, Field)> + '_ {
        let numbers = NumberGroup::ALL.into_iter().flat_map(move |group| {
            (0..self.schema.count(group))
                .map(move |k| (group.column_name(k), Field::Number(group, k)))
        });
        [(INDEX_COLUMN.to_owned(), Field::Index)]
            .into_iter()
            .chain(numbers)
    }

    /// Derived columns in output order.
    pub fn derived_fields(&self) -> impl Iterator<Item = (String, Field)> + '_ {
        let calendar = CalendarField::ALL
            .into_iter()
            .map(|f| (f.column_name().to_owned(), Field::Calendar(f)));
        let distances = self
            .pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| (pair.column_name(), Field::Distance(i)));
        let buckets = NumberGroup::ALL.into_iter().flat_map(move |group| {
            (0..self.schema.count(group))
                .map(move |k| (group.bucket_column_name(k), Field::Bucket(group, k)))
        });
        calendar.chain(distances).chain(buckets)
    }

    /// All numeric columns with their names.
    pub fn numeric_fields(&self) -> impl Iterator<Item = (String, Field)> + '_ {
        self.raw_fields().chain(self.derived_fields())
    }

    /// Every column name, original columns first, as written by the sink.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.schema.columns().to_vec();
        names.extend(self.derived_fields().map(|(name, _)| name));
        names
    }

    /// Resolves a numeric column name; `None` for unknown and non-numeric columns.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Field> {
        self.numeric_fields()
            .find_map(|(column, field)| (column == name).then_some(field))
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        name == DATE_COLUMN
            || (name == TIME_COLUMN && self.schema.has_time())
            || self.resolve(name).is_some()
    }

    /// Values of `field` for every record, in table order.
    pub fn values(&self, field: Field) -> impl Iterator<Item = Option<f64>> + '_ {
        self.records.iter().map(move |record| record.value(field))
    }

    /// Values of the named numeric column, or `None` if no such column exists.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let field = self.resolve(name)?;
        Some(self.values(field).collect())
    }
}
