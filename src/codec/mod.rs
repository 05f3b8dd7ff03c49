// src/codec/mod.rs
pub mod cell;
pub mod csv;
pub mod json;
pub mod spreadsheet;

use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::table::{Row, Table};

pub use self::csv::CsvCodec;
pub use self::json::JsonCodec;
pub use self::spreadsheet::SpreadsheetCodec;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unreadable spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("{axis} index {index} is beyond what a worksheet can hold")]
    OutOfBounds { axis: &'static str, index: usize },
}

/// A paired encode/decode routine for one file format.
///
/// `decode` returns raw rows: keys and typing are whatever the input held.
/// Callers run them through [`crate::table::normalize`] before treating them
/// as a [`Table`].
pub trait Codec: Send + Sync {
    fn format(&self) -> Format;
    fn encode(&self, table: &Table) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, CodecError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Csv,
    Xlsx,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Csv, Format::Xlsx];

    /// Pick a format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Xlsx => "xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Csv => "text/csv",
            Format::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Download name used for exports.
    pub fn file_name(self) -> &'static str {
        match self {
            Format::Json => "data.json",
            Format::Csv => "data.csv",
            Format::Xlsx => "data.xlsx",
        }
    }

    pub fn codec(self) -> &'static dyn Codec {
        match self {
            Format::Json => &JsonCodec,
            Format::Csv => &CsvCodec,
            Format::Xlsx => &SpreadsheetCodec,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
