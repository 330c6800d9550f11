//! Graph engine error types.
//!
//! Every variant is an expected, recoverable rejection. The engine state is
//! never modified by an operation that returns one of these.

use gn_core::{PipeId, StationId};

/// Rejections reported by [`GasNetwork`](crate::GasNetwork) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// A connection from a station to itself was requested.
    SelfLoop { station: StationId },

    /// The ordered pair is already connected.
    DuplicateConnection { from: StationId, to: StationId },

    /// The pipe was never registered with the engine.
    UnknownPipe { pipe: PipeId },

    /// The pipe already backs another connection.
    PipeInUse {
        pipe: PipeId,
        from: StationId,
        to: StationId,
    },

    /// Inserting the connection would close a directed cycle.
    CycleRejected {
        from: StationId,
        to: StationId,
        pipe: PipeId,
    },

    /// A path or flow endpoint does not appear in the graph.
    EndpointNotFound { station: StationId },

    /// Topological sort could not order every station.
    CycleDetectedAtSort { unordered: usize },

    /// No finite-weight route joins the endpoints.
    NoPathFound { source: StationId, sink: StationId },

    /// A route exists but its total length does not fit in an `f64`.
    DistanceOverflow { source: StationId, sink: StationId },

    /// A pipe snapshot carried a NaN or negative weight.
    InvalidSnapshot { pipe: PipeId },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::SelfLoop { station } => {
                write!(f, "Cannot connect station {} to itself", station)
            }
            NetworkError::DuplicateConnection { from, to } => {
                write!(f, "Connection {} -> {} already exists", from, to)
            }
            NetworkError::UnknownPipe { pipe } => {
                write!(f, "Pipe {} is not registered in the network", pipe)
            }
            NetworkError::PipeInUse { pipe, from, to } => {
                write!(
                    f,
                    "Pipe {} is already used by connection {} -> {}",
                    pipe, from, to
                )
            }
            NetworkError::CycleRejected { from, to, pipe } => {
                write!(
                    f,
                    "Connection {} -> {} (pipe {}) would create a cycle; the network must stay acyclic",
                    from, to, pipe
                )
            }
            NetworkError::EndpointNotFound { station } => {
                write!(f, "Station {} is not part of the network graph", station)
            }
            NetworkError::CycleDetectedAtSort { unordered } => {
                write!(
                    f,
                    "Topological sort impossible: {} station(s) lie on a cycle",
                    unordered
                )
            }
            NetworkError::NoPathFound { source, sink } => {
                write!(f, "No usable path from station {} to station {}", source, sink)
            }
            NetworkError::DistanceOverflow { source, sink } => {
                write!(
                    f,
                    "Path length from station {} to station {} exceeds the representable range",
                    source, sink
                )
            }
            NetworkError::InvalidSnapshot { pipe } => {
                write!(f, "Pipe {} has a NaN or negative length", pipe)
            }
        }
    }
}

impl std::error::Error for NetworkError {}

pub type NetworkResult<T> = Result<T, NetworkError>;
