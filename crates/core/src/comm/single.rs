use super::Communicator;
use crate::error::CommError;

/// Communicator for a cohort of one
///
/// Collectives return the local value unchanged. There are no neighbors, so any
/// point-to-point request is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleProcessComm;

impl Communicator for SingleProcessComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn send_recv(&self, peer: usize, _send: &[f32], _recv: &mut [f32]) -> Result<(), CommError> {
        Err(CommError::InvalidPeer { peer, size: 1 })
    }

    fn all_reduce_max(&self, local: f32) -> Result<f32, CommError> {
        Ok(local)
    }

    fn all_reduce_sum(&self, local: u32) -> Result<u32, CommError> {
        Ok(local)
    }

    fn gather(&self, root: usize, local: &[f32]) -> Result<Option<Vec<f32>>, CommError> {
        if root != 0 {
            return Err(CommError::InvalidPeer { peer: root, size: 1 });
        }
        Ok(Some(local.to_vec()))
    }
}
