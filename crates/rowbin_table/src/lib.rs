pub mod codec;
pub mod crc;
pub mod error;
pub mod keys;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::TableError;
pub use reader::{TableCursor, TableReader};
pub use types::{Entry, TABLE_EXT, TABLE_MAGIC};
pub use writer::TableWriter;
