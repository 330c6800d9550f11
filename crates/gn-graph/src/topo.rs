//! Topological ordering of stations (Kahn's algorithm).

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use gn_core::StationId;
use tracing::warn;

use crate::error::{NetworkError, NetworkResult};
use crate::network::GasNetwork;

impl GasNetwork {
    /// Order `stations` so that every edge points forward.
    ///
    /// `stations` is the full registry: stations without edges are sources
    /// and appear in the output. Stations touched by an edge but missing
    /// from the registry are included as well. Among stations that become
    /// ready at the same time the lowest id goes first.
    pub fn topological_sort<I>(&self, stations: I) -> NetworkResult<Vec<StationId>>
    where
        I: IntoIterator<Item = StationId>,
    {
        let mut in_degree: BTreeMap<StationId, usize> =
            stations.into_iter().map(|s| (s, 0)).collect();
        for station in self.stations() {
            in_degree.entry(station).or_insert(0);
        }
        for edge in self.edges() {
            *in_degree.entry(edge.to).or_insert(0) += 1;
        }

        let mut ready: BinaryHeap<Reverse<StationId>> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&s, _)| Reverse(s))
            .collect();
        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(Reverse(station)) = ready.pop() {
            order.push(station);
            for edge in self.outgoing(station) {
                if let Some(degree) = in_degree.get_mut(&edge.to) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(edge.to));
                    }
                }
            }
        }

        if order.len() < in_degree.len() {
            let unordered = in_degree.len() - order.len();
            warn!(unordered, "topological sort found a cycle");
            return Err(NetworkError::CycleDetectedAtSort { unordered });
        }
        Ok(order)
    }
}
