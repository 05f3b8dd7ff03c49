// src/table/types.rs

use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single cell. Every value that crosses a codec, normalizer or store
/// boundary travels as one of these.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    Text(String),
    /// Whole numbers read from JSON or an integer worksheet cell. Kept exact;
    /// `i128` holds every JSON integer serde can hand over.
    Integer(i128),
    Number(f64),
    Bool(bool),
    #[default]
    Null,
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Borrow the text payload, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Integral floats print without a fractional part (`3`, not `3.0`).
fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        Some(n as i64)
    } else {
        None
    }
}

/// The "string form" of a cell: what CSV, spreadsheet export and the
/// normalizer all write. Null renders as the empty string.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Null => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n.into())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            CellValue::Integer(i) => match i64::try_from(*i) {
                Ok(small) => serializer.serialize_i64(small),
                Err(_) => serializer.serialize_i128(*i),
            },
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Null => serializer.serialize_none(),
        }
    }
}

struct CellValueVisitor;

impl<'de> Visitor<'de> for CellValueVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null cell value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CellValue, E> {
        Ok(CellValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<CellValue, E> {
        Ok(CellValue::Text(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CellValue, E> {
        Ok(CellValue::Integer(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CellValue, E> {
        Ok(CellValue::Integer(v.into()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<CellValue, E> {
        Ok(CellValue::Integer(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CellValue, E> {
        Ok(CellValue::Number(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<CellValue, E> {
        Ok(CellValue::Bool(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<CellValue, D::Error> {
        CellValue::deserialize(d)
    }

    // Nested structures are not cells; keep their compact JSON text.
    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<CellValue, A::Error> {
        let nested = serde_json::Value::deserialize(SeqAccessDeserializer::new(seq))?;
        Ok(CellValue::Text(nested.to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<CellValue, A::Error> {
        let nested = serde_json::Value::deserialize(MapAccessDeserializer::new(map))?;
        Ok(CellValue::Text(nested.to_string()))
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }
}

/// One record, keyed by header name. Keys keep insertion order and are unique:
/// inserting an existing key overwrites its value where it stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut CellValue> {
        self.cells
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite `key`. Returns the previous value when the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Option<CellValue> {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.cells.push((key, value));
                None
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = Row;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping header names to cell values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Row, A::Error> {
        let mut row = Row::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, CellValue>()? {
            row.insert(key, value);
        }
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RowVisitor)
    }
}

/// A column name plus an optional declared type. The type is carried along for
/// display only; no conversion looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
}

impl Header {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }
}

/// The canonical in-memory document: an ordered list of uniformly keyed rows.
/// The first row's key order is the column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Header names in canonical (first row) order. Empty for an empty table.
    pub fn headers(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|r| r.keys().collect())
            .unwrap_or_default()
    }

    pub fn header_defs(&self) -> Vec<Header> {
        self.headers().into_iter().map(Header::new).collect()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn display_renders_string_form() {
        assert_eq!(CellValue::from("abc").to_string(), "abc");
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(-12.0).to_string(), "-12");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Integer(9_007_199_254_740_993).to_string(), "9007199254740993");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut row: Row = [("a", "1"), ("b", "2")].into_iter().collect();
        let prev = row.insert("a", "x");
        assert_eq!(prev, Some(CellValue::from("1")));
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&CellValue::from("x")));

        row.insert("c", true);
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn row_deserialization_keeps_key_order() -> Result<()> {
        let row: Row = serde_json::from_str(r#"{"zeta": 1, "alpha": "x", "mid": null}"#)?;
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(row.get("zeta"), Some(&CellValue::Integer(1)));
        assert_eq!(row.get("mid"), Some(&CellValue::Null));
        Ok(())
    }

    #[test]
    fn nested_values_become_json_text() -> Result<()> {
        let row: Row = serde_json::from_str(r#"{"tags": [1, "two"], "meta": {"k": true}}"#)?;
        assert_eq!(row.get("tags"), Some(&CellValue::from(r#"[1,"two"]"#)));
        assert_eq!(row.get("meta"), Some(&CellValue::from(r#"{"k":true}"#)));
        Ok(())
    }

    #[test]
    fn integral_numbers_serialize_as_integers() -> Result<()> {
        let row: Row = [("n", CellValue::Number(7.0)), ("f", CellValue::Number(0.5))]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&row)?, r#"{"n":7,"f":0.5}"#);
        Ok(())
    }

    #[test]
    fn headers_follow_first_row() {
        let table = Table::from_rows(vec![
            [("Name", "a"), ("Email", "b")].into_iter().collect(),
            [("Email", "c"), ("Name", "d")].into_iter().collect(),
        ]);
        assert_eq!(table.headers(), vec!["Name", "Email"]);
        assert_eq!(table.header_defs()[1], Header::new("Email"));
        assert!(Table::new().headers().is_empty());
    }
}
