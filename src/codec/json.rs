use tracing::{debug, instrument};

use super::{Codec, CodecError, Format};
use crate::table::{Row, Table};

/// Pretty-printed array of flat objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn encode(&self, table: &Table) -> Result<Vec<u8>, CodecError> {
        encode(table)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, CodecError> {
        decode(bytes)
    }
}

#[instrument(level = "debug", skip_all, fields(rows = table.len()))]
pub fn encode(table: &Table) -> Result<Vec<u8>, CodecError> {
    let out = serde_json::to_vec_pretty(&table.rows)?;
    debug!(bytes = out.len(), "encoded json");
    Ok(out)
}

/// The top level must be an array and every element an object; anything else
/// is a [`CodecError::Json`]. Blank input reads as no rows.
#[instrument(level = "debug", skip_all, fields(bytes = bytes.len()))]
pub fn decode(bytes: &[u8]) -> Result<Vec<Row>, CodecError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let rows: Vec<Row> = serde_json::from_slice(bytes)?;
    debug!(rows = rows.len(), "decoded json");
    Ok(rows)
}
