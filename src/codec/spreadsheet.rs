// src/codec/spreadsheet.rs
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{ColNum, Format as CellFormat, RowNum, Workbook};
use std::io::Cursor;
use tracing::{debug, instrument, warn};

use super::{cell, Codec, CodecError, Format};
use crate::table::{CellValue, Row, Table};

/// Name of the single sheet written on export.
pub const SHEET_NAME: &str = "TestData";

/// XLSX workbook: bold header row, string data cells, auto-fitted columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetCodec;

impl Codec for SpreadsheetCodec {
    fn format(&self) -> Format {
        Format::Xlsx
    }

    fn encode(&self, table: &Table) -> Result<Vec<u8>, CodecError> {
        encode(table)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, CodecError> {
        decode(bytes)
    }
}

fn row_num(index: usize) -> Result<RowNum, CodecError> {
    RowNum::try_from(index).map_err(|_| CodecError::OutOfBounds { axis: "row", index })
}

fn col_num(index: usize) -> Result<ColNum, CodecError> {
    ColNum::try_from(index).map_err(|_| CodecError::OutOfBounds {
        axis: "column",
        index,
    })
}

/// Every data value is written as its string form, numbers and booleans
/// included. An empty table still produces a workbook with an empty sheet.
#[instrument(level = "debug", skip_all, fields(rows = table.len()))]
pub fn encode(table: &Table) -> Result<Vec<u8>, CodecError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    if !table.is_empty() {
        let headers = table.headers();
        let bold = CellFormat::new().set_bold();

        for (c, header) in headers.iter().enumerate() {
            sheet.write_string_with_format(0, col_num(c)?, *header, &bold)?;
        }

        for (r, row) in table.rows.iter().enumerate() {
            let r = row_num(r + 1)?;
            for (c, header) in headers.iter().enumerate() {
                let value = row.get(header).map(ToString::to_string).unwrap_or_default();
                sheet.write_string(r, col_num(c)?, value)?;
            }
        }

        sheet.autofit();
    }

    let out = workbook.save_to_buffer()?;
    debug!(bytes = out.len(), "encoded workbook");
    Ok(out)
}

/// Read the first worksheet: its first row names the columns, every later row
/// yields one typed value per column (see [`cell::coerce`]). Formula cells read
/// as the empty string, whatever their cached result. Rows with no value in any
/// cell are skipped.
#[instrument(level = "debug", skip_all, fields(bytes = bytes.len()))]
pub fn decode(bytes: &[u8]) -> Result<Vec<Row>, CodecError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let Some(sheet) = workbook.sheet_names().into_iter().next() else {
        warn!("workbook has no worksheets");
        return Ok(Vec::new());
    };
    let range = workbook.worksheet_range(&sheet)?;
    let formulas = workbook.worksheet_formula(&sheet)?;
    let Some((top, left)) = range.start() else {
        return Ok(Vec::new());
    };

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Vec::new());
    };

    // The used range can be wider than the header row; ignore the blank tail.
    let mut headers: Vec<String> = header_row.iter().map(cell::header_name).collect();
    while headers.last().is_some_and(String::is_empty) {
        headers.pop();
    }

    let is_formula = |r: usize, c: usize| -> bool {
        let (Ok(r), Ok(c)) = (u32::try_from(r), u32::try_from(c)) else {
            return false;
        };
        formulas
            .get_value((top + r, left + c))
            .is_some_and(|f| !f.is_empty())
    };

    let mut skipped = 0usize;
    let mut rows = Vec::new();
    for (r, cells) in sheet_rows.enumerate() {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            skipped += 1;
            continue;
        }
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let value = if is_formula(r + 1, i) {
                    CellValue::Text(String::new())
                } else {
                    cell::coerce(cells.get(i))
                };
                (h.as_str(), value)
            })
            .collect();
        rows.push(row);
    }

    debug!(rows = rows.len(), headers = headers.len(), skipped, "decoded workbook");
    Ok(rows)
}
