use std::io::Read;
use thiserror::Error;

use crate::table::{Cell, RawTable};

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

/// Reads a statement export into a [`RawTable`].
///
/// The first record supplies the labels; no header detection happens here.
/// Records may have differing lengths and invalid UTF-8 is replaced rather
/// than rejected.
pub fn read_raw_table<R: Read>(data: R, delimiter: char) -> Result<RawTable, CsvError> {
    if !delimiter.is_ascii() {
        return Err(CsvError::InvalidDelimiter(delimiter));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(data);

    let mut labels = None;
    let mut rows = Vec::new();

    for result in reader.byte_records() {
        let record = result?;
        let fields = record.iter().map(|f| String::from_utf8_lossy(f).into_owned());

        if labels.is_none() {
            labels = Some(
                fields
                    .map(|f| f.trim_start_matches('\u{feff}').trim().to_string())
                    .collect::<Vec<_>>(),
            );
        } else {
            rows.push(fields.map(|f| Cell::from_text(&f)).collect());
        }
    }

    let table = RawTable::new(labels.unwrap_or_default(), rows);
    tracing::debug!(
        columns = table.column_count(),
        rows = table.row_count(),
        "read statement table"
    );
    Ok(table)
}
