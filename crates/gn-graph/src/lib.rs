//! gn-graph: the gas network graph engine.
//!
//! Provides:
//! - Pipe and station value records, with diameter-derived capacity
//! - `GasNetwork`: directed acyclic connection store with a cycle guard
//! - Topological sort, shortest path, and maximum flow
//! - Flow/path reports and connection listings for presentation
//!
//! # Example
//!
//! ```
//! use gn_core::{PipeId, StationId};
//! use gn_graph::{GasNetwork, Pipe};
//!
//! let a = Pipe::new(PipeId::new(1), "A", 10.0, 500, false).unwrap();
//! let b = Pipe::new(PipeId::new(2), "B", 5.0, 700, false).unwrap();
//!
//! let mut net = GasNetwork::new();
//! net.register(&a).unwrap();
//! net.register(&b).unwrap();
//! net.add_connection(StationId::new(1), StationId::new(2), a.id).unwrap();
//! net.add_connection(StationId::new(2), StationId::new(3), b.id).unwrap();
//!
//! assert_eq!(net.max_flow(StationId::new(1), StationId::new(3)).unwrap().value, 60);
//! assert_eq!(net.shortest_path(StationId::new(1), StationId::new(3)).unwrap().distance, 15.0);
//! ```

pub(crate) mod cycle;
pub mod error;
pub mod flow;
pub mod inventory;
pub mod listing;
pub mod network;
pub mod path;
pub mod pipe;
pub mod report;
pub mod station;
pub mod topo;

// Re-exports for ergonomics
pub use error::{NetworkError, NetworkResult};
pub use flow::MaxFlow;
pub use inventory::{Inventory, PipeQuery, StationQuery};
pub use listing::ConnectionListing;
pub use network::{Edge, GasNetwork};
pub use path::Route;
pub use pipe::{Pipe, PipeSnapshot, STANDARD_DIAMETERS_MM, capacity_for_diameter};
pub use report::{FlowReport, HopReport, PathReport, StationLabel};
pub use station::Station;
