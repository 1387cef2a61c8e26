use std::path::PathBuf;

use rowbin_table::TableError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("partition directory or member not found: {0:?}")]
    NotFound(PathBuf),
    #[error("bad table file {file:?}: {source}")]
    Format {
        file: PathBuf,
        #[source]
        source: TableError,
    },
    #[error("scan out of range: start {start}, limit {limit:?}, partition has {total} rows")]
    Range {
        start: u64,
        limit: Option<u64>,
        total: u64,
    },
    #[error("checkpoint pinned to a partition of {expected} rows, this one has {actual}")]
    CheckpointMismatch { expected: u64, actual: u64 },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
