//! gn-core: stable foundation for the gas network engine.
//!
//! Contains:
//! - units (uom SI length + constructor)
//! - numeric (Real + tolerances + float helpers)
//! - ids (station and pipe identifiers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{GnError, GnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
