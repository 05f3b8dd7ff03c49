use tracing::debug;

use super::{CellValue, Table};

impl Table {
    /// Append `name` (with an empty value) to every row that lacks it.
    /// Rows that already carry the key keep their value. Returns how many rows
    /// gained the column.
    pub fn add_header(&mut self, name: &str) -> usize {
        let mut added = 0;
        for row in &mut self.rows {
            if !row.contains_key(name) {
                row.insert(name, "");
                added += 1;
            }
        }
        debug!(header = name, added, "add_header");
        added
    }

    /// Overwrite one cell. An out-of-range row or a header the row does not
    /// have is ignored; the return value says whether anything changed.
    pub fn update_cell(
        &mut self,
        row_index: usize,
        header: &str,
        value: impl Into<CellValue>,
    ) -> bool {
        let Some(slot) = self
            .rows
            .get_mut(row_index)
            .and_then(|row| row.get_mut(header))
        else {
            debug!(row_index, header, "update_cell: no such cell, ignoring");
            return false;
        };
        *slot = value.into();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::generate;

    #[test]
    fn add_header_keeps_existing_values() {
        let mut table = generate(&["Name", "Email"], 3);
        table.rows[1].insert("Phone", "555");

        let added = table.add_header("Phone");

        assert_eq!(added, 2);
        assert_eq!(table.rows[0].get("Phone"), Some(&CellValue::from("")));
        assert_eq!(table.rows[1].get("Phone"), Some(&CellValue::from("555")));
        assert_eq!(table.rows[2].get("Phone"), Some(&CellValue::from("")));
        assert_eq!(table.headers(), vec!["Name", "Email", "Phone"]);
    }

    #[test]
    fn add_header_on_empty_table_is_noop() {
        let mut table = Table::new();
        assert_eq!(table.add_header("X"), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn update_cell_replaces_value() {
        let mut table = generate(&["Name", "Email"], 3);
        assert!(table.update_cell(2, "Email", "x@example.com"));
        assert_eq!(
            table.rows[2].get("Email"),
            Some(&CellValue::from("x@example.com"))
        );
    }

    #[test]
    fn update_cell_out_of_range_is_noop() {
        let mut table = generate(&["Name", "Email"], 3);
        let before = table.clone();

        assert!(!table.update_cell(99, "Name", "x"));
        assert!(!table.update_cell(0, "Missing", "x"));
        assert_eq!(table, before);
    }
}
