//! Flow and path reporting: composes shortest path and max flow into a
//! printable summary. Pure reads; nothing here mutates the network.

use std::fmt;

use gn_core::{PipeId, Real, StationId};

use crate::error::{NetworkError, NetworkResult};
use crate::inventory::Inventory;
use crate::network::GasNetwork;
use crate::path::Route;

/// A station id with its registry name, if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationLabel {
    pub id: StationId,
    pub name: Option<String>,
}

impl StationLabel {
    fn lookup(id: StationId, inventory: &Inventory) -> Self {
        Self {
            id,
            name: inventory.station_name(id).map(str::to_owned),
        }
    }
}

impl fmt::Display for StationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "KC {} ({})", self.id, name),
            None => write!(f, "KC {}", self.id),
        }
    }
}

/// One traversed pipe on a reported path.
#[derive(Debug, Clone, PartialEq)]
pub struct HopReport {
    pub from: StationId,
    pub to: StationId,
    pub pipe: PipeId,
    pub pipe_name: Option<String>,
    pub length_m: Real,
    pub capacity: u64,
}

/// Shortest path annotated with the pipes used on each hop.
#[derive(Debug, Clone, PartialEq)]
pub struct PathReport {
    pub stations: Vec<StationLabel>,
    pub hops: Vec<HopReport>,
    /// Sum of traversed pipe lengths in metres.
    pub total_distance: Real,
    /// Smallest capacity among traversed pipes; `None` without hops.
    pub bottleneck: Option<u64>,
}

impl PathReport {
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    fn from_route(route: &Route, network: &GasNetwork, inventory: &Inventory) -> Self {
        let hops: Vec<HopReport> = route
            .hops()
            .map(|(from, to, pipe)| {
                let record = inventory.pipe(pipe);
                let edge = network.edge_for_pipe(pipe);
                HopReport {
                    from,
                    to,
                    pipe,
                    pipe_name: record.map(|p| p.name.clone()),
                    length_m: record
                        .map(|p| p.length_m())
                        .or_else(|| edge.map(|e| e.weight))
                        .unwrap_or(0.0),
                    capacity: edge.map_or(0, |e| e.capacity),
                }
            })
            .collect();

        Self {
            stations: route
                .stations
                .iter()
                .map(|&id| StationLabel::lookup(id, inventory))
                .collect(),
            total_distance: hops.iter().map(|h| h.length_m).sum(),
            bottleneck: hops.iter().map(|h| h.capacity).min(),
            hops,
        }
    }
}

impl fmt::Display for PathReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Shortest Path (by distance) ---")?;
        for (i, station) in self.stations.iter().enumerate() {
            writeln!(f, "  [{}] {}", i, station)?;
            if let Some(hop) = self.hops.get(i) {
                let name = hop.pipe_name.as_deref().unwrap_or("?");
                writeln!(
                    f,
                    "        --[Pipe ID:{} Name:{} Len:{}m Cap:{}]-->",
                    hop.pipe, name, hop.length_m, hop.capacity
                )?;
            }
        }
        writeln!(f, "Path statistics:")?;
        writeln!(f, "  Total distance               : {} m", self.total_distance)?;
        match self.bottleneck {
            Some(cap) => writeln!(f, "  Path capacity (bottleneck)   : {}", cap)?,
            None => writeln!(
                f,
                "  Path capacity (bottleneck)   : undefined (no pipe traversed)"
            )?,
        }
        write!(f, "  Number of hops (edges)       : {}", self.hop_count())
    }
}

/// Max flow and shortest path between two stations.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowReport {
    pub source: StationLabel,
    pub sink: StationLabel,
    /// Zero when either endpoint is absent from the graph.
    pub max_flow: u64,
    pub path: Result<PathReport, NetworkError>,
}

impl fmt::Display for FlowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Flow analysis: {} -> {} ===", self.source, self.sink)?;
        writeln!(f, "Maximum flow: {}", self.max_flow)?;
        match &self.path {
            Ok(path) => write!(f, "{}", path),
            Err(err) => write!(f, "No path could be found: {}", err),
        }
    }
}

impl GasNetwork {
    /// Shortest path between two stations annotated from the inventory.
    pub fn path_report(
        &self,
        source: StationId,
        sink: StationId,
        inventory: &Inventory,
    ) -> NetworkResult<PathReport> {
        let route = self.shortest_path(source, sink)?;
        Ok(PathReport::from_route(&route, self, inventory))
    }

    /// Max flow plus shortest path for a source/sink pair.
    pub fn flow_report(&self, source: StationId, sink: StationId, inventory: &Inventory) -> FlowReport {
        FlowReport {
            source: StationLabel::lookup(source, inventory),
            sink: StationLabel::lookup(sink, inventory),
            max_flow: self.max_flow(source, sink).map_or(0, |flow| flow.value),
            path: self.path_report(source, sink, inventory),
        }
    }
}
