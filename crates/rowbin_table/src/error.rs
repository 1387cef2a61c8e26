use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("bad magic")]
    BadMagic,
    #[error("crc64 mismatch")]
    BadCrc,
    #[error("malformed table file: {0}")]
    Malformed(&'static str),
    #[error("bad row key {0:?}")]
    BadKey(String),
    #[error("row {pos} out of range (table has {count} rows)")]
    OutOfRange { pos: u64, count: u64 },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
