//! Communication between the workers of a cohort
//!
//! The simulation is written against the [`Communicator`] trait so the same worker
//! code runs alone ([`SingleProcessComm`]) or as one rank of a thread cohort
//! ([`ThreadComm`]). All operations block the calling worker until they complete;
//! there is no background traffic.

mod single;
mod threaded;

pub use single::SingleProcessComm;
pub use threaded::ThreadComm;

use crate::error::CommError;

/// Point-to-point and collective operations available to a worker
///
/// Every worker of a cohort must issue the same sequence of collective calls.
pub trait Communicator: Send {
    /// This worker's rank
    fn rank(&self) -> usize;

    /// Number of workers in the cohort
    fn size(&self) -> usize;

    /// Send `send` to `peer` and receive the peer's row into `recv`
    ///
    /// Both sides call this with each other as `peer`. Returns once the outgoing row
    /// is accepted and the incoming row has been copied into `recv`.
    ///
    /// # Errors
    ///
    /// Fails if the peer is invalid or gone, or if the protocol is violated.
    fn send_recv(&self, peer: usize, send: &[f32], recv: &mut [f32]) -> Result<(), CommError>;

    /// Maximum of `local` over all workers
    ///
    /// # Errors
    ///
    /// Fails if any peer is gone or the protocol is violated.
    fn all_reduce_max(&self, local: f32) -> Result<f32, CommError>;

    /// Sum of `local` over all workers
    ///
    /// # Errors
    ///
    /// Fails if any peer is gone or the protocol is violated.
    fn all_reduce_sum(&self, local: u32) -> Result<u32, CommError>;

    /// Concatenate every worker's block in rank order on `root`
    ///
    /// Returns `Some(all_blocks)` on the root and `None` elsewhere.
    ///
    /// # Errors
    ///
    /// Fails if any peer is gone or the protocol is violated.
    fn gather(&self, root: usize, local: &[f32]) -> Result<Option<Vec<f32>>, CommError>;
}
