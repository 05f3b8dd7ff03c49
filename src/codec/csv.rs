// src/codec/csv.rs
use std::borrow::Cow;
use tracing::{debug, instrument};

use super::{Codec, CodecError, Format};
use crate::table::{CellValue, Row, Table};

/// Comma-delimited text, one header line then one line per row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl Codec for CsvCodec {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn encode(&self, table: &Table) -> Result<Vec<u8>, CodecError> {
        Ok(encode(table))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, CodecError> {
        Ok(decode(bytes))
    }
}

/// Header names are written as-is; data fields go through [`escape_field`].
/// Every line ends in `\n`. An empty table encodes to nothing at all.
#[instrument(level = "debug", skip_all, fields(rows = table.len()))]
pub fn encode(table: &Table) -> Vec<u8> {
    if table.is_empty() {
        return Vec::new();
    }

    let headers = table.headers();
    let mut out = headers.join(",");
    out.push('\n');

    for row in &table.rows {
        let fields: Vec<String> = headers
            .iter()
            .map(|h| {
                let value = row.get(h).map(ToString::to_string).unwrap_or_default();
                escape_field(&value).into_owned()
            })
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    debug!(bytes = out.len(), "encoded csv");
    out.into_bytes()
}

/// Quote a field containing `,` or `"`, doubling any embedded quotes.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Parse CSV text into raw rows.
///
/// The header line is split on every comma, no quote handling, and each name
/// trimmed. Data lines go through [`split_line`]. Fields are trimmed and
/// assigned by position: short lines are padded with "", long lines truncated.
///
/// Doubled quotes are *not* collapsed back, so `encode` then `decode` is lossy
/// for values containing `"`.
#[instrument(level = "debug", skip_all, fields(bytes = bytes.len()))]
pub fn decode(bytes: &[u8]) -> Vec<Row> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines = split_lines(&text).into_iter();

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = split_header(header_line);

    let rows: Vec<Row> = lines
        .map(|line| {
            let fields = split_line(line);
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let value = fields.get(i).map(|f| f.trim()).unwrap_or("");
                    (*h, CellValue::from(value))
                })
                .collect()
        })
        .collect();

    debug!(rows = rows.len(), headers = headers.len(), "decoded csv");
    rows
}

// Lines end at `\n`, `\r\n` or a lone `\r`. A terminator at the very end
// does not open another line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

// Trailing empty names are dropped, as a plain string split would; a lone
// empty header line still yields one (empty) header.
fn split_header(line: &str) -> Vec<&str> {
    let mut names: Vec<&str> = line.split(',').collect();
    while names.len() > 1 && names.last() == Some(&"") {
        names.pop();
    }
    names.into_iter().map(str::trim).collect()
}

/// Quote-aware split: `"` flips an inside-quotes flag and is itself dropped;
/// a comma only separates fields outside quotes.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{generate, normalize};
    use anyhow::Result;

    fn table(rows: &[&[(&str, &str)]]) -> Table {
        Table::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|(k, v)| (*k, *v)).collect())
                .collect(),
        )
    }

    #[test]
    fn escapes_commas_and_quotes() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field(r#"He said, "hi""#), r#""He said, ""hi""""#);
    }

    #[test]
    fn encode_writes_header_and_rows() -> Result<()> {
        let t = table(&[
            &[("Name", "Ann"), ("Note", "x,y")],
            &[("Name", "Bob"), ("Note", "")],
        ]);
        let text = String::from_utf8(encode(&t))?;
        assert_eq!(text, "Name,Note\nAnn,\"x,y\"\nBob,\n");
        Ok(())
    }

    #[test]
    fn encode_null_and_missing_as_empty() -> Result<()> {
        let mut first = Row::new();
        first.insert("a", CellValue::Number(1.0));
        first.insert("b", CellValue::Null);
        let mut second = Row::new();
        second.insert("a", true);
        let text = String::from_utf8(encode(&Table::from_rows(vec![first, second])))?;
        assert_eq!(text, "a,b\n1,\ntrue,\n");
        Ok(())
    }

    #[test]
    fn empty_table_encodes_to_nothing() {
        assert!(encode(&Table::new()).is_empty());
    }

    #[test]
    fn decode_pads_and_truncates() {
        let rows = decode(b"a, b ,c\n1\n1,2,3,4\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(rows[0].get("b"), Some(&CellValue::from("")));
        assert_eq!(rows[1].get("c"), Some(&CellValue::from("3")));
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn decode_respects_quotes_and_trims() {
        let rows = decode(b"Name,Note\r\n  Ann , \"x, y\" \r\n");
        assert_eq!(rows[0].get("Name"), Some(&CellValue::from("Ann")));
        assert_eq!(rows[0].get("Note"), Some(&CellValue::from("x, y")));
    }

    #[test]
    fn decode_does_not_undouble_quotes() {
        let encoded = encode(&table(&[&[("q", r#"He said, "hi""#)]]));
        let rows = decode(&encoded);
        assert_eq!(rows[0].get("q"), Some(&CellValue::from("He said, hi")));
    }

    #[test]
    fn decode_header_is_not_quote_aware() {
        let rows = decode(b"\"a,b\",c\n1,2,3\n");
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["\"a", "b\"", "c"]);
    }

    #[test]
    fn decode_empty_input() {
        assert!(decode(b"").is_empty());
        assert!(decode(b"Name,Email\n").is_empty());
    }

    #[test]
    fn decode_accepts_every_line_ending() {
        let names = |rows: Vec<Row>| -> Vec<String> {
            rows.iter()
                .filter_map(|r| r.get("Name").map(ToString::to_string))
                .collect()
        };
        assert_eq!(names(decode(b"Name\rAnn\rBob")), vec!["Ann", "Bob"]);
        assert_eq!(names(decode(b"Name\r\nAnn\r\nBob\r\n")), vec!["Ann", "Bob"]);
        assert_eq!(names(decode(b"Name\nAnn\rBob\r\n")), vec!["Ann", "Bob"]);
    }

    #[test]
    fn round_trip_preserves_string_values() {
        let original = generate(&["Name", "Email", "City"], 5);
        let decoded = normalize(&decode(&encode(&original)));
        assert_eq!(decoded, original);

        let with_commas = table(&[&[("a", "1,2"), ("b", " padded ")]]);
        let decoded = normalize(&decode(&encode(&with_commas)));
        assert_eq!(decoded, table(&[&[("a", "1,2"), ("b", "padded")]]));
    }
}
