//! Error types for the gn-app service layer.

use gn_core::{GnError, PipeId, StationId};
use gn_graph::NetworkError;

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for front ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network file error: {0}")]
    Project(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Station {0} not found")]
    StationNotFound(StationId),

    #[error("Pipe {0} not found")]
    PipeNotFound(PipeId),

    #[error("Station {0} already exists")]
    DuplicateStation(StationId),

    #[error("Pipe {0} already exists")]
    DuplicatePipe(PipeId),

    #[error("No unused pipe with diameter {diameter_mm} mm")]
    NoUnusedPipe { diameter_mm: u32 },

    #[error("Pipe {0} is not part of any connection")]
    NotConnected(PipeId),

    #[error("Stored connection #{index} rejected: {source}")]
    Replay {
        index: usize,
        source: NetworkError,
    },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gn-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<gn_project::ProjectError> for AppError {
    fn from(err: gn_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<GnError> for AppError {
    fn from(err: GnError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
