use tracing::{debug, trace};

use super::{CellValue, Row, Table};

/// Force raw rows into a canonical [`Table`]:
///  - the first row's keys, in order, are the header set
///  - every row gets exactly those headers (trimmed), in that order
///  - each value becomes the trimmed string form of the input; absent or null → ""
///  - keys a later row has beyond the header set are dropped
///
/// Typed values (numbers, booleans) do not survive this step.
pub fn normalize(raw: &[Row]) -> Table {
    let Some(first) = raw.first() else {
        return Table::new();
    };
    let headers: Vec<&str> = first.keys().collect();

    let mut dropped = 0usize;
    let rows: Vec<Row> = raw
        .iter()
        .map(|row| {
            dropped += row.keys().filter(|k| !headers.contains(k)).count();
            let mut clean = Row::with_capacity(headers.len());
            for header in &headers {
                clean.insert(header.trim(), CellValue::Text(trimmed(row.get(header))));
            }
            clean
        })
        .collect();

    if dropped > 0 {
        trace!(dropped, "normalize: discarded cells outside the header set");
    }
    debug!(rows = rows.len(), headers = headers.len(), "normalized table");
    Table::from_rows(rows)
}

fn trimmed(value: Option<&CellValue>) -> String {
    match value {
        Some(CellValue::Text(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
        None => String::new(),
    }
}
