use super::Communicator;
use crate::error::CommError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::trace;

/// Messages exchanged between cohort members
#[derive(Debug)]
enum Packet {
    Row(Vec<f32>),
    Max(f32),
    Sum(u32),
    Block(Vec<f32>),
}

impl Packet {
    fn kind(&self) -> &'static str {
        match self {
            Self::Row(_) => "row",
            Self::Max(_) => "max",
            Self::Sum(_) => "sum",
            Self::Block(_) => "block",
        }
    }
}

/// One rank of an in-process worker cohort
///
/// Every ordered pair of ranks is connected by its own unbounded channel, so messages
/// between two workers arrive in the order they were sent and a send never blocks.
/// Dropping an endpoint disconnects all of its channels; peers see that as
/// [`CommError::PeerLost`] on their next operation involving this rank.
#[derive(Debug)]
pub struct ThreadComm {
    rank: usize,
    size: usize,
    outgoing: Vec<Option<Sender<Packet>>>,
    incoming: Vec<Option<Receiver<Packet>>>,
}

impl ThreadComm {
    /// Build all endpoints of a cohort of `size` workers, in rank order
    #[must_use]
    pub fn cohort(size: usize) -> Vec<Self> {
        let mut outgoing: Vec<Vec<Option<Sender<Packet>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();
        let mut incoming: Vec<Vec<Option<Receiver<Packet>>>> =
            (0..size).map(|_| (0..size).map(|_| None).collect()).collect();

        for from in 0..size {
            for to in 0..size {
                if from != to {
                    let (tx, rx) = unbounded();
                    outgoing[from][to] = Some(tx);
                    incoming[to][from] = Some(rx);
                }
            }
        }

        outgoing
            .into_iter()
            .zip(incoming)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| Self {
                rank,
                size,
                outgoing,
                incoming,
            })
            .collect()
    }

    fn check_peer(&self, peer: usize) -> Result<(), CommError> {
        if peer >= self.size || peer == self.rank {
            return Err(CommError::InvalidPeer {
                peer,
                size: self.size,
            });
        }
        Ok(())
    }

    fn send(&self, peer: usize, packet: Packet) -> Result<(), CommError> {
        self.check_peer(peer)?;
        let sender = self.outgoing[peer]
            .as_ref()
            .ok_or(CommError::PeerLost { peer })?;
        sender
            .send(packet)
            .map_err(|_| CommError::PeerLost { peer })
    }

    fn recv(&self, peer: usize) -> Result<Packet, CommError> {
        self.check_peer(peer)?;
        let receiver = self.incoming[peer]
            .as_ref()
            .ok_or(CommError::PeerLost { peer })?;
        receiver.recv().map_err(|_| CommError::PeerLost { peer })
    }

    fn peers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(move |&peer| peer != self.rank)
    }
}

fn unexpected(peer: usize, expected: &'static str, found: &Packet) -> CommError {
    CommError::Protocol {
        peer,
        expected,
        found: found.kind(),
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send_recv(&self, peer: usize, send: &[f32], recv: &mut [f32]) -> Result<(), CommError> {
        self.send(peer, Packet::Row(send.to_vec()))?;
        match self.recv(peer)? {
            Packet::Row(row) => {
                if row.len() != recv.len() {
                    return Err(CommError::LengthMismatch {
                        peer,
                        expected: recv.len(),
                        found: row.len(),
                    });
                }
                recv.copy_from_slice(&row);
                trace!(rank = self.rank, peer, len = row.len(), "row exchanged");
                Ok(())
            }
            other => Err(unexpected(peer, "row", &other)),
        }
    }

    fn all_reduce_max(&self, local: f32) -> Result<f32, CommError> {
        for peer in self.peers() {
            self.send(peer, Packet::Max(local))?;
        }
        let mut global = local;
        for peer in self.peers() {
            match self.recv(peer)? {
                Packet::Max(value) => global = global.max(value),
                other => return Err(unexpected(peer, "max", &other)),
            }
        }
        Ok(global)
    }

    fn all_reduce_sum(&self, local: u32) -> Result<u32, CommError> {
        for peer in self.peers() {
            self.send(peer, Packet::Sum(local))?;
        }
        let mut global = local;
        for peer in self.peers() {
            match self.recv(peer)? {
                Packet::Sum(value) => global += value,
                other => return Err(unexpected(peer, "sum", &other)),
            }
        }
        Ok(global)
    }

    fn gather(&self, root: usize, local: &[f32]) -> Result<Option<Vec<f32>>, CommError> {
        if root >= self.size {
            return Err(CommError::InvalidPeer {
                peer: root,
                size: self.size,
            });
        }
        if self.rank != root {
            self.send(root, Packet::Block(local.to_vec()))?;
            return Ok(None);
        }

        let mut all = Vec::with_capacity(local.len() * self.size);
        for peer in 0..self.size {
            if peer == root {
                all.extend_from_slice(local);
                continue;
            }
            match self.recv(peer)? {
                Packet::Block(block) if block.len() == local.len() => all.extend(block),
                Packet::Block(block) => {
                    return Err(CommError::LengthMismatch {
                        peer,
                        expected: local.len(),
                        found: block.len(),
                    })
                }
                other => return Err(unexpected(peer, "block", &other)),
            }
        }
        Ok(Some(all))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn run_cohort<T, F>(size: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(ThreadComm) -> T + Sync,
    {
        thread::scope(|scope| {
            let handles: Vec<_> = ThreadComm::cohort(size)
                .into_iter()
                .map(|comm| {
                    let f = &f;
                    scope.spawn(move || f(comm))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        })
    }

    #[test]
    fn test_cohort_ranks() {
        let cohort = ThreadComm::cohort(3);
        assert_eq!(cohort.len(), 3);
        for (rank, comm) in cohort.iter().enumerate() {
            assert_eq!(comm.rank(), rank);
            assert_eq!(comm.size(), 3);
        }
    }

    #[test]
    fn test_all_reduce_agrees_everywhere() {
        let results = run_cohort(4, |comm| {
            let rank = comm.rank();
            let max = comm.all_reduce_max(rank as f32 * 1.5).unwrap();
            let sum = comm.all_reduce_sum(rank as u32 + 1).unwrap();
            (max, sum)
        });
        assert!(results.iter().all(|&r| r == (4.5, 10)));
    }

    #[test]
    fn test_send_recv_pairs() {
        let results = run_cohort(2, |comm| {
            let peer = 1 - comm.rank();
            let send = vec![comm.rank() as f32; 3];
            let mut recv = vec![-1.0; 3];
            comm.send_recv(peer, &send, &mut recv).unwrap();
            recv
        });
        assert_eq!(results[0], vec![1.0; 3]);
        assert_eq!(results[1], vec![0.0; 3]);
    }

    #[test]
    fn test_gather_in_rank_order() {
        let results = run_cohort(3, |comm| {
            let block = vec![comm.rank() as f32; 2];
            comm.gather(0, &block).unwrap()
        });
        assert_eq!(results[0], Some(vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0]));
        assert_eq!(results[1], None);
        assert_eq!(results[2], None);
    }

    #[test]
    fn test_invalid_peer() {
        let cohort = ThreadComm::cohort(2);
        let mut recv = [0.0];
        assert_eq!(
            cohort[0].send_recv(0, &[1.0], &mut recv),
            Err(CommError::InvalidPeer { peer: 0, size: 2 })
        );
        assert_eq!(
            cohort[0].send_recv(5, &[1.0], &mut recv),
            Err(CommError::InvalidPeer { peer: 5, size: 2 })
        );
    }

    #[test]
    fn test_dropped_peer_is_reported() {
        let mut cohort = ThreadComm::cohort(2);
        drop(cohort.pop());
        let survivor = cohort.pop().unwrap();
        assert_eq!(
            survivor.all_reduce_sum(1),
            Err(CommError::PeerLost { peer: 1 })
        );
    }

    #[test]
    fn test_protocol_violation_detected() {
        let results = run_cohort(2, |comm| {
            if comm.rank() == 0 {
                comm.all_reduce_sum(1).map(|_| ())
            } else {
                comm.all_reduce_max(1.0).map(|_| ())
            }
        });
        assert_eq!(
            results[0],
            Err(CommError::Protocol {
                peer: 1,
                expected: "sum",
                found: "max"
            })
        );
        assert_eq!(
            results[1],
            Err(CommError::Protocol {
                peer: 0,
                expected: "max",
                found: "sum"
            })
        );
    }

    #[test]
    fn test_length_mismatch_detected() {
        let results = run_cohort(2, |comm| {
            let len = comm.rank() + 2;
            let send = vec![1.0; len];
            let mut recv = vec![0.0; len];
            let exchanged = comm.send_recv(1 - comm.rank(), &send, &mut recv);
            let gathered = comm.gather(0, &send).map(|_| ());
            (exchanged, gathered)
        });
        assert_eq!(
            results[0].0,
            Err(CommError::LengthMismatch {
                peer: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            results[1].0,
            Err(CommError::LengthMismatch {
                peer: 0,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            results[0].1,
            Err(CommError::LengthMismatch {
                peer: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(results[1].1, Ok(()));
    }
}
