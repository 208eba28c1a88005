//! Grid decomposition and worker-local storage

pub mod partition;
pub mod slice;

pub use partition::Partition;
pub use slice::LocalSlice;
