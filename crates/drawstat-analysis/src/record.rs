//! Raw rows and parsed draw records
//!
//! A [`RawRow`] is one line of a lottery's result file, split into string
//! fields in schema column order. [`DrawRecord::parse`] turns it into typed
//! values by position: the index, the date (parsed once with the schema's
//! format), the optional draw time and the primary and secondary numbers,
//! each checked against its declared range.

use chrono::NaiveDate;

use crate::{
    calendar::{self, DateParseError},
    schema::{LotterySchema, NumberGroup, NumberRange},
};

/// One unparsed line of a result file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<String>,
}

impl RawRow {
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S> FromIterator<S> for RawRow
where
    S: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    #[display("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[display("invalid draw index '{value}'")]
    InvalidIndex { value: String },
    #[display("column '{column}': '{value}' is not a non-negative integer")]
    InvalidNumber { column: String, value: String },
    #[display("column '{column}': {value} is outside the range {range}")]
    NumberOutOfRange {
        column: String,
        value: u32,
        range: NumberRange,
    },
    #[display("{source}")]
    Date { source: DateParseError },
}

/// One historical drawing, typed according to its lottery schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub index: i64,
    pub date: NaiveDate,
    /// Draw time exactly as written, for lotteries with a time column.
    pub time: Option<String>,
    pub primary: Vec<u32>,
    pub secondary: Vec<u32>,
}

impl DrawRecord {
    pub fn parse(row: &RawRow, schema: &LotterySchema) -> Result<Self, RecordError> {
        let fields = row.fields();
        let expected = schema.columns().len();
        if fields.len() != expected {
            return Err(RecordError::ColumnCount {
                expected,
                found: fields.len(),
            });
        }

        let index = fields[0]
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidIndex {
                value: fields[0].clone(),
            })?;
        let date = calendar::parse_date(&fields[1], schema.date_format())
            .map_err(|source| RecordError::Date { source })?;
        let time = schema
            .time_position()
            .map(|pos| fields[pos].trim().to_owned());

        Ok(Self {
            index,
            date,
            time,
            primary: parse_group(fields, schema, NumberGroup::Primary)?,
            secondary: parse_group(fields, schema, NumberGroup::Secondary)?,
        })
    }

    #[must_use]
    pub fn numbers(&self, group: NumberGroup) -> &[u32] {
        match group {
            NumberGroup::Primary => &self.primary,
            NumberGroup::Secondary => &self.secondary,
        }
    }
}

fn parse_group(
    fields: &[String],
    schema: &LotterySchema,
    group: NumberGroup,
) -> Result<Vec<u32>, RecordError> {
    let Some(range) = schema.range(group) else {
        return Ok(vec![]);
    };
    (0..schema.count(group))
        .map(|k| {
            let raw = &fields[schema.number_position(group, k)];
            let value = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| RecordError::InvalidNumber {
                    column: group.column_name(k),
                    value: raw.clone(),
                })?;
            if !range.contains(value) {
                return Err(RecordError::NumberOutOfRange {
                    column: group.column_name(k),
                    value,
                    range,
                });
            }
            Ok(value)
        })
        .collect()
}
