//! Text listing of connections grouped by source station.

use std::collections::BTreeMap;
use std::fmt;

use gn_core::{PipeId, StationId};

use crate::network::GasNetwork;

/// Connections grouped by ascending source station.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionListing {
    pub groups: BTreeMap<StationId, Vec<(StationId, PipeId)>>,
}

impl ConnectionListing {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl fmt::Display for ConnectionListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups.is_empty() {
            return write!(f, "No connections in the network.");
        }
        write!(f, "Network Connections:\nFormat: Source -> Destination (Pipe ID)")?;
        for (from, targets) in &self.groups {
            write!(f, "\n\nFrom KC {}:", from)?;
            for (to, pipe) in targets {
                write!(f, "\n  --> KC {} (Pipe ID: {})", to, pipe)?;
            }
        }
        Ok(())
    }
}

impl GasNetwork {
    pub fn listing(&self) -> ConnectionListing {
        let mut groups: BTreeMap<StationId, Vec<(StationId, PipeId)>> = BTreeMap::new();
        for edge in self.edges() {
            groups.entry(edge.from).or_default().push((edge.to, edge.pipe));
        }
        ConnectionListing { groups }
    }
}
