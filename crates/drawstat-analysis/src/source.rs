//! Reading raw result files
//!
//! Result files are comma-separated, without a header row, with columns in
//! the order given by the lottery's schema. Fields are trimmed; the column
//! count is checked later, per row, by [`DrawRecord::parse`](crate::record::DrawRecord::parse).

use std::io;

use crate::record::RawRow;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to read draw records: {source}")]
pub struct SourceError {
    pub source: csv::Error,
}

/// Reads every row of a headerless CSV stream.
pub fn read_raw_rows<R>(reader: R) -> Result<Vec<RawRow>, SourceError>
where
    R: io::Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = vec![];
    for record in rdr.records() {
        let record = record.map_err(|source| SourceError { source })?;
        rows.push(record.iter().collect());
    }
    Ok(rows)
}
