//! Writing enriched tables
//!
//! The sink writes a header row with every original and derived column
//! name, then one row per record. Dates are written in the schema's date
//! format, distances in Rust's shortest round-trip float form, and absent
//! values (numbers without a bucket) as empty cells, so a given table always
//! serializes to the same bytes.

use std::io;

use crate::{
    schema::{DATE_COLUMN, TIME_COLUMN},
    table::{EnrichedRecord, EnrichedTable, Field},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SinkError {
    #[display("failed to write enriched records: {source}")]
    Csv { source: csv::Error },
    #[display("failed to flush enriched records: {source}")]
    Io { source: io::Error },
}

#[derive(Debug, Clone, Copy)]
enum Cell {
    Date,
    Time,
    Value(Field),
}

impl Cell {
    fn render(self, record: &EnrichedRecord, date_format: &str) -> String {
        match self {
            Cell::Date => record.draw.date.format(date_format).to_string(),
            Cell::Time => record.draw.time.clone().unwrap_or_default(),
            Cell::Value(field) => record.cell(field),
        }
    }
}

fn cell_layout(table: &EnrichedTable) -> Vec<(String, Option<Cell>)> {
    let raw = table.schema().columns().iter().map(|name| {
        let cell = match name.as_str() {
            DATE_COLUMN => Some(Cell::Date),
            TIME_COLUMN => Some(Cell::Time),
            _ => table.resolve(name).map(Cell::Value),
        };
        (name.clone(), cell)
    });
    let derived = table
        .derived_fields()
        .map(|(name, field)| (name, Some(Cell::Value(field))));
    raw.chain(derived).collect()
}

/// Writes `table` as CSV with a header row.
pub fn write_enriched<W>(table: &EnrichedTable, writer: W) -> Result<(), SinkError>
where
    W: io::Write,
{
    let layout = cell_layout(table);
    let date_format = table.schema().date_format();
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(layout.iter().map(|(name, _)| name))
        .map_err(|source| SinkError::Csv { source })?;
    for record in table.records() {
        let row = layout.iter().map(|(_, cell)| {
            cell.map(|cell| cell.render(record, date_format))
                .unwrap_or_default()
        });
        wtr.write_record(row)
            .map_err(|source| SinkError::Csv { source })?;
    }
    wtr.flush().map_err(|source| SinkError::Io { source })?;
    Ok(())
}
