use rand::Rng;
use tracing::info;

use super::{Row, Table};

/// Placeholder suffixes are drawn uniformly from this range.
pub const SAMPLE_RANGE: std::ops::RangeInclusive<u32> = 100..=999;

/// Produce `row_count` rows of `Sample_<n>` placeholders, one per header,
/// in the order the headers were given.
pub fn generate<S: AsRef<str>>(headers: &[S], row_count: usize) -> Table {
    generate_with(&mut rand::rng(), headers, row_count)
}

/// Same as [`generate`], drawing from a caller-supplied RNG.
pub fn generate_with<R, S>(rng: &mut R, headers: &[S], row_count: usize) -> Table
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    let rows = (0..row_count)
        .map(|_| {
            let mut row = Row::with_capacity(headers.len());
            for header in headers {
                let n = rng.random_range(SAMPLE_RANGE);
                row.insert(header.as_ref(), format!("Sample_{}", n));
            }
            row
        })
        .collect();

    info!(rows = row_count, headers = headers.len(), "generated sample table");
    Table::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CellValue;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    #[test]
    fn generates_requested_shape() {
        let table = generate(&["Name", "Email"], 3);
        let pattern = Regex::new(r"^Sample_\d{3}$").unwrap();

        assert_eq!(table.len(), 3);
        for row in &table.rows {
            assert_eq!(row.keys().collect::<Vec<_>>(), vec!["Name", "Email"]);
            for value in row.values() {
                let CellValue::Text(s) = value else {
                    panic!("expected text cell, got {:?}", value);
                };
                assert!(pattern.is_match(s), "{} does not look like a sample", s);
            }
        }
    }

    #[test]
    fn suffix_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = generate_with(&mut rng, &["v"], 500);
        for row in &table.rows {
            let s = row.get("v").and_then(CellValue::as_text).unwrap();
            let n: u32 = s.trim_start_matches("Sample_").parse().unwrap();
            assert!(SAMPLE_RANGE.contains(&n));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_with(&mut StdRng::seed_from_u64(42), &["a", "b"], 4);
        let b = generate_with(&mut StdRng::seed_from_u64(42), &["a", "b"], 4);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_inputs() {
        let none: [&str; 0] = [];
        let table = generate(&none, 2);
        assert_eq!(table.len(), 2);
        assert!(table.rows.iter().all(Row::is_empty));

        assert!(generate(&["Name"], 0).is_empty());
    }
}
