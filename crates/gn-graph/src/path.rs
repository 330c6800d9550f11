//! Shortest path search (Dijkstra) over pipe lengths.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use gn_core::{PipeId, Real, StationId};
use tracing::warn;

use crate::error::{NetworkError, NetworkResult};
use crate::network::GasNetwork;

/// A route through the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Stations from source to sink inclusive.
    pub stations: Vec<StationId>,
    /// Pipe used on each hop; one shorter than `stations`.
    pub pipes: Vec<PipeId>,
    /// Sum of traversed edge weights (pipe lengths in metres).
    pub distance: Real,
}

impl Route {
    pub fn hop_count(&self) -> usize {
        self.pipes.len()
    }

    /// `(from, to, pipe)` for every hop.
    pub fn hops(&self) -> impl Iterator<Item = (StationId, StationId, PipeId)> + '_ {
        self.stations
            .windows(2)
            .zip(&self.pipes)
            .map(|(pair, &pipe)| (pair[0], pair[1], pipe))
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the smallest distance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    distance: Real,
    station: StationId,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.station.cmp(&self.station))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl GasNetwork {
    /// Shortest route from `source` to `sink` by total pipe length.
    ///
    /// Edges with infinite weight (pipes under repair) are never relaxed.
    /// `source == sink` yields the trivial one-station route.
    pub fn shortest_path(&self, source: StationId, sink: StationId) -> NetworkResult<Route> {
        let stations = self.stations();
        for endpoint in [source, sink] {
            if !stations.contains(&endpoint) {
                warn!(station = %endpoint, "shortest path endpoint not in network");
                return Err(NetworkError::EndpointNotFound { station: endpoint });
            }
        }

        let mut dist: BTreeMap<StationId, Real> =
            stations.iter().map(|&s| (s, Real::INFINITY)).collect();
        let mut prev: BTreeMap<StationId, (StationId, PipeId)> = BTreeMap::new();
        let mut heap = BinaryHeap::new();
        let mut overflowed = false;

        dist.insert(source, 0.0);
        heap.push(Candidate {
            distance: 0.0,
            station: source,
        });

        while let Some(Candidate { distance, station }) = heap.pop() {
            if station == sink {
                break;
            }
            if distance > tentative(&dist, station) {
                continue;
            }
            for edge in self.outgoing(station) {
                if !edge.weight.is_finite() {
                    continue;
                }
                let next = distance + edge.weight;
                if next.is_infinite() {
                    overflowed = true;
                    continue;
                }
                if next < tentative(&dist, edge.to) {
                    dist.insert(edge.to, next);
                    prev.insert(edge.to, (station, edge.pipe));
                    heap.push(Candidate {
                        distance: next,
                        station: edge.to,
                    });
                }
            }
        }

        let distance = tentative(&dist, sink);
        if !distance.is_finite() {
            // Some finite prefix ran past f64::MAX; the sink may only be
            // reachable through it.
            if overflowed {
                warn!(%source, %sink, "shortest path length overflowed");
                return Err(NetworkError::DistanceOverflow { source, sink });
            }
            return Err(NetworkError::NoPathFound { source, sink });
        }

        let mut route_stations = vec![sink];
        let mut pipes = Vec::new();
        let mut cursor = sink;
        while let Some(&(before, pipe)) = prev.get(&cursor) {
            route_stations.push(before);
            pipes.push(pipe);
            cursor = before;
        }
        route_stations.reverse();
        pipes.reverse();

        Ok(Route {
            stations: route_stations,
            pipes,
            distance,
        })
    }
}

fn tentative(dist: &BTreeMap<StationId, Real>, station: StationId) -> Real {
    dist.get(&station).copied().unwrap_or(Real::INFINITY)
}
