use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use crate::error::CatalogError;

/// Reads the rows of a district table from CSV.
/// Accepts files with or without a header; only a first row starting with a
/// `from` column is a header; any other first row is data and is validated
/// like the rest. Blank rows are dropped. Each row is returned with its
/// 1-based line number.
pub(crate) fn read_rows<R: Read>(
    reader: R,
    min_columns: usize,
) -> Result<Vec<(usize, StringRecord)>, CatalogError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let record = row?;
        let line = record.position().map_or(idx + 1, |p| p.line() as usize);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        if idx == 0 && is_header(&record) {
            continue;
        }

        if record.len() < min_columns {
            return Err(CatalogError::MalformedRow {
                line,
                reason: format!(
                    "expected at least {} columns, found {}",
                    min_columns,
                    record.len()
                ),
            });
        }

        rows.push((line, record));
    }

    Ok(rows)
}

fn is_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .map_or(false, |value| value.eq_ignore_ascii_case("from"))
}
