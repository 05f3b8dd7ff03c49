// src/form.rs
//! Reshaping of the flat edit form (`rowCount`, `headerCount`, `header_<c>`,
//! `cell_<r>_<c>`) into raw rows.

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use tracing::debug;

use crate::table::{CellValue, Row};

const ROW_COUNT: &str = "rowCount";
const HEADER_COUNT: &str = "headerCount";
// older form builds post the column count under this name
const LEGACY_HEADER_COUNT: &str = "colCount";

fn count(fields: &HashMap<String, String>, key: &str) -> Result<Option<usize>> {
    fields
        .get(key)
        .map(|raw| {
            raw.trim()
                .parse::<usize>()
                .with_context(|| format!("form field `{}` is not a count: {:?}", key, raw))
        })
        .transpose()
}

/// Build raw rows from a submitted edit form.
///
/// Missing header names or cells become null (the normalizer turns them into
/// ""). Both counts are required.
pub fn rows_from_form(fields: &HashMap<String, String>) -> Result<Vec<Row>> {
    let row_count = count(fields, ROW_COUNT)?
        .ok_or_else(|| anyhow!("form is missing `{}`", ROW_COUNT))?;
    let header_count = match count(fields, HEADER_COUNT)? {
        Some(n) => n,
        None => count(fields, LEGACY_HEADER_COUNT)?
            .ok_or_else(|| anyhow!("form is missing `{}`", HEADER_COUNT))?,
    };

    let headers: Vec<String> = (0..header_count)
        .map(|c| {
            fields
                .get(&format!("header_{}", c))
                .cloned()
                .unwrap_or_default()
        })
        .collect();

    let rows: Vec<Row> = (0..row_count)
        .map(|r| {
            headers
                .iter()
                .enumerate()
                .map(|(c, header)| {
                    let value = fields
                        .get(&format!("cell_{}_{}", r, c))
                        .map(|v| CellValue::Text(v.clone()))
                        .unwrap_or(CellValue::Null);
                    (header.as_str(), value)
                })
                .collect()
        })
        .collect();

    debug!(rows = row_count, headers = header_count, "reshaped edit form");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::normalize;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reshapes_cells_by_position() -> Result<()> {
        let fields = form(&[
            ("rowCount", "2"),
            ("headerCount", "2"),
            ("header_0", "Name"),
            ("header_1", "Email"),
            ("cell_0_0", "Ann"),
            ("cell_0_1", "ann@example.com"),
            ("cell_1_0", "Bob"),
        ]);

        let rows = rows_from_form(&fields)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["Name", "Email"]);
        assert_eq!(rows[1].get("Email"), Some(&CellValue::Null));

        let table = normalize(&rows);
        assert_eq!(table.rows[1].get("Email"), Some(&CellValue::from("")));
        Ok(())
    }

    #[test]
    fn accepts_legacy_column_count() -> Result<()> {
        let fields = form(&[("rowCount", "1"), ("colCount", "1"), ("header_0", "A"), ("cell_0_0", "x")]);
        let rows = rows_from_form(&fields)?;
        assert_eq!(rows[0].get("A"), Some(&CellValue::from("x")));
        Ok(())
    }

    #[test]
    fn counts_are_required_and_numeric() {
        assert!(rows_from_form(&form(&[("headerCount", "1")])).is_err());
        assert!(rows_from_form(&form(&[("rowCount", "1")])).is_err());
        assert!(rows_from_form(&form(&[("rowCount", "x"), ("headerCount", "1")])).is_err());
    }

    #[test]
    fn zero_rows_is_empty() -> Result<()> {
        let rows = rows_from_form(&form(&[("rowCount", "0"), ("headerCount", "3")]))?;
        assert!(rows.is_empty());
        Ok(())
    }
}
