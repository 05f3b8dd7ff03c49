pub mod codec;
pub mod config;
pub mod form;
pub mod service;
pub mod table;

pub use codec::{Codec, CodecError, Format};
pub use config::Config;
pub use service::{Export, Workbench};
pub use table::{CellValue, Header, MemoryStore, Row, Table, TableStore};
