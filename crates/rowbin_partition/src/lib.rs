pub mod checkpoint;
pub mod error;
pub mod index;
pub mod scan;

pub use checkpoint::ScanCheckpoint;
pub use error::PartitionError;
pub use index::Partition;
pub use scan::PartitionScan;
