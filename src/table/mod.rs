// src/table/mod.rs
pub mod edit;
pub mod generate;
pub mod normalize;
pub mod store;
pub mod types;

pub use generate::{generate, generate_with};
pub use normalize::normalize;
pub use store::{MemoryStore, TableStore};
pub use types::{CellValue, Header, Row, Table};
