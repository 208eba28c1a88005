//! Error types for the simulation core
//!
//! Every failure is terminal for the run. Errors raised on one worker make it drop its
//! communicator endpoint, which peers observe as [`CommError::PeerLost`], so a single
//! failure brings the whole cohort down instead of leaving it blocked in a collective.

use std::fmt;

/// Failure of a point-to-point or collective operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommError {
    /// The peer's endpoint is gone (the peer failed or finished early)
    PeerLost {
        /// Rank of the vanished peer
        peer: usize,
    },
    /// The peer sent a different message kind than the protocol step expects
    Protocol {
        /// Rank of the sender
        peer: usize,
        /// Message kind this worker was waiting for
        expected: &'static str,
        /// Message kind that arrived
        found: &'static str,
    },
    /// The rank is not part of the cohort or is this worker itself
    InvalidPeer {
        /// Requested rank
        peer: usize,
        /// Cohort size
        size: usize,
    },
    /// A received row or block does not match the receive buffer
    LengthMismatch {
        /// Rank of the sender
        peer: usize,
        /// Expected number of values
        expected: usize,
        /// Received number of values
        found: usize,
    },
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerLost { peer } => write!(f, "lost connection to worker {peer}"),
            Self::Protocol {
                peer,
                expected,
                found,
            } => write!(
                f,
                "protocol error: expected {expected} from worker {peer}, received {found}"
            ),
            Self::InvalidPeer { peer, size } => {
                write!(f, "worker {peer} is not a valid peer in a cohort of {size}")
            }
            Self::LengthMismatch {
                peer,
                expected,
                found,
            } => write!(
                f,
                "worker {peer} sent {found} values where {expected} were expected"
            ),
        }
    }
}

impl std::error::Error for CommError {}

/// Any failure of a simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The input configuration is malformed or fails validation
    InvalidConfig(String),
    /// The grid rows cannot be split evenly across the workers
    UnevenPartition {
        /// Global row count
        rows: usize,
        /// Requested worker count
        workers: usize,
    },
    /// A run was requested with zero workers
    NoWorkers,
    /// A buffer could not be allocated
    Allocation {
        /// Which buffer
        what: &'static str,
        /// Requested number of cells
        cells: usize,
    },
    /// Inter-worker communication failed
    Comm(CommError),
    /// A worker thread panicked
    WorkerPanicked {
        /// Rank of the worker
        rank: usize,
    },
    /// The cohort finished but the root produced no report
    MissingReport,
}

impl SimError {
    /// Shorthand for configuration errors
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether this error only reports that another worker went away
    ///
    /// Used to find the originating failure among the errors of an aborted cohort.
    #[must_use]
    pub fn is_cascade(&self) -> bool {
        matches!(self, Self::Comm(CommError::PeerLost { .. }))
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::UnevenPartition { rows, workers } => write!(
                f,
                "{rows} rows cannot be split evenly across {workers} workers"
            ),
            Self::NoWorkers => write!(f, "at least one worker is required"),
            Self::Allocation { what, cells } => {
                write!(f, "failed to allocate {what} ({cells} cells)")
            }
            Self::Comm(err) => write!(f, "communication failure: {err}"),
            Self::WorkerPanicked { rank } => write!(f, "worker {rank} panicked"),
            Self::MissingReport => write!(f, "root worker returned no report"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Comm(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CommError> for SimError {
    fn from(err: CommError) -> Self {
        Self::Comm(err)
    }
}

/// Result alias used across the crate
pub type SimResult<T> = Result<T, SimError>;
