use calamine::Data;

use crate::table::CellValue;

/// Type-preserving read of one worksheet cell.
///
/// Strings stay text, numbers (date serials included) become numbers, booleans
/// stay booleans. Blanks, errors, ISO date/duration strings and missing cells
/// all read as the empty string.
pub fn coerce(cell: Option<&Data>) -> CellValue {
    match cell {
        Some(Data::String(s)) => CellValue::Text(s.clone()),
        Some(Data::Float(f)) => CellValue::Number(*f),
        Some(Data::Int(i)) => CellValue::Integer((*i).into()),
        Some(Data::Bool(b)) => CellValue::Bool(*b),
        Some(Data::DateTime(dt)) => CellValue::Number(dt.as_f64()),
        _ => CellValue::Text(String::new()),
    }
}

/// Header cells are read by their raw rendering, whatever their type.
pub fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
        Data::Empty => String::new(),
        other => coerce(Some(other)).to_string(),
    }
}
