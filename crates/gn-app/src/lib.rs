//! Shared application service layer for the gas network tools.
//!
//! A [`Workspace`] owns the station and pipe registries together with the
//! connection graph and keeps them consistent across edits, so front ends
//! never touch the engine directly.

pub mod error;
pub mod workspace;

pub use error::{AppError, AppResult};
pub use workspace::Workspace;
