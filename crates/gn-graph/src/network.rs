//! The connection store: a directed acyclic multigraph of stations.

use std::collections::{BTreeMap, BTreeSet};

use gn_core::{PipeId, Real, StationId};
use tracing::{debug, warn};

use crate::cycle;
use crate::error::{NetworkError, NetworkResult};
use crate::pipe::{Pipe, PipeSnapshot};

/// A directed, pipe-backed link between two stations.
///
/// `capacity` and `weight` are copies of the pipe snapshot taken when the
/// edge was created or last refreshed by `update_pipe_in_network`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: StationId,
    pub to: StationId,
    pub pipe: PipeId,
    pub capacity: u64,
    pub weight: Real,
}

/// The graph engine.
///
/// Owns the pipe snapshot cache and the adjacency of connections. Every
/// insertion is checked for acyclicity; a rejected insertion leaves the
/// engine exactly as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GasNetwork {
    /// Cached snapshots of every registered pipe.
    pub(crate) pipes: BTreeMap<PipeId, PipeSnapshot>,

    /// Outgoing edges per source station. Keys with no edges are pruned.
    pub(crate) adjacency: BTreeMap<StationId, Vec<Edge>>,

    /// Pipe -> source station of the edge it backs.
    pub(crate) pipe_index: BTreeMap<PipeId, StationId>,

    /// Pipes of live connections in insertion order.
    pub(crate) sequence: Vec<PipeId>,
}

impl GasNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the cached snapshot for a pipe.
    ///
    /// Existing edges keep their attributes; use `update_pipe_in_network`
    /// to refresh them. A NaN or negative weight is refused.
    pub fn register_pipe(&mut self, pipe: PipeId, snapshot: PipeSnapshot) -> NetworkResult<()> {
        check_snapshot(pipe, snapshot)?;
        self.pipes.insert(pipe, snapshot);
        Ok(())
    }

    /// Register a pipe record by its current state.
    pub fn register(&mut self, pipe: &Pipe) -> NetworkResult<()> {
        self.register_pipe(pipe.id, pipe.snapshot())
    }

    pub fn is_registered(&self, pipe: PipeId) -> bool {
        self.pipes.contains_key(&pipe)
    }

    pub fn pipe_snapshot(&self, pipe: PipeId) -> Option<PipeSnapshot> {
        self.pipes.get(&pipe).copied()
    }

    /// Connect `from` to `to` through an unused, registered pipe.
    pub fn add_connection(
        &mut self,
        from: StationId,
        to: StationId,
        pipe: PipeId,
    ) -> NetworkResult<()> {
        let result = self.try_add_connection(from, to, pipe);
        match &result {
            Ok(()) => debug!(%from, %to, %pipe, "connection added"),
            Err(err) => warn!(%from, %to, %pipe, "connection rejected: {err}"),
        }
        result
    }

    fn try_add_connection(
        &mut self,
        from: StationId,
        to: StationId,
        pipe: PipeId,
    ) -> NetworkResult<()> {
        if from == to {
            return Err(NetworkError::SelfLoop { station: from });
        }
        if self.connection_exists(from, to) {
            return Err(NetworkError::DuplicateConnection { from, to });
        }
        let snapshot = self
            .pipes
            .get(&pipe)
            .copied()
            .ok_or(NetworkError::UnknownPipe { pipe })?;
        if let Some(edge) = self.edge_for_pipe(pipe) {
            return Err(NetworkError::PipeInUse {
                pipe,
                from: edge.from,
                to: edge.to,
            });
        }

        // Tentative insert, then a full scan of the resulting graph.
        self.adjacency.entry(from).or_default().push(Edge {
            from,
            to,
            pipe,
            capacity: snapshot.capacity,
            weight: snapshot.weight,
        });
        if cycle::has_cycle(&self.adjacency) {
            self.pop_tentative(from);
            return Err(NetworkError::CycleRejected { from, to, pipe });
        }

        self.pipe_index.insert(pipe, from);
        self.sequence.push(pipe);
        Ok(())
    }

    fn pop_tentative(&mut self, from: StationId) {
        if let Some(edges) = self.adjacency.get_mut(&from) {
            edges.pop();
            if edges.is_empty() {
                self.adjacency.remove(&from);
            }
        }
    }

    /// Refresh the cached snapshot and every edge backed by `pipe`.
    ///
    /// Returns the number of edges refreshed.
    pub fn update_pipe_in_network(
        &mut self,
        pipe: PipeId,
        snapshot: PipeSnapshot,
    ) -> NetworkResult<usize> {
        check_snapshot(pipe, snapshot)?;
        self.pipes.insert(pipe, snapshot);
        let mut refreshed = 0;
        for edge in self.adjacency.values_mut().flatten() {
            if edge.pipe == pipe {
                edge.capacity = snapshot.capacity;
                edge.weight = snapshot.weight;
                refreshed += 1;
            }
        }
        if refreshed > 0 {
            debug!(%pipe, capacity = snapshot.capacity, weight = snapshot.weight, "pipe refreshed");
        }
        Ok(refreshed)
    }

    /// Remove the connection backed by `pipe`, if any.
    pub fn remove_connection_by_pipe(&mut self, pipe: PipeId) -> Option<Edge> {
        let from = self.pipe_index.remove(&pipe)?;
        self.sequence.retain(|&p| p != pipe);

        let edges = self.adjacency.get_mut(&from)?;
        let pos = edges.iter().position(|e| e.pipe == pipe)?;
        let edge = edges.remove(pos);
        if edges.is_empty() {
            self.adjacency.remove(&from);
        }
        debug!(from = %edge.from, to = %edge.to, %pipe, "connection removed");
        Some(edge)
    }

    /// Remove every connection where `station` is source or destination.
    ///
    /// Returns the removed edges in insertion order.
    pub fn remove_connections_with_station(&mut self, station: StationId) -> Vec<Edge> {
        let doomed: Vec<PipeId> = self
            .connections()
            .filter(|e| e.from == station || e.to == station)
            .map(|e| e.pipe)
            .collect();
        doomed
            .into_iter()
            .filter_map(|pipe| self.remove_connection_by_pipe(pipe))
            .collect()
    }

    /// Drop a pipe from the cache together with any connection it backs.
    pub fn forget_pipe(&mut self, pipe: PipeId) -> Option<Edge> {
        let edge = self.remove_connection_by_pipe(pipe);
        self.pipes.remove(&pipe);
        edge
    }

    /// Remove all connections and cached pipes.
    pub fn clear(&mut self) {
        self.pipes.clear();
        self.adjacency.clear();
        self.pipe_index.clear();
        self.sequence.clear();
    }

    pub fn connection_exists(&self, from: StationId, to: StationId) -> bool {
        self.edge_between(from, to).is_some()
    }

    pub fn edge_between(&self, from: StationId, to: StationId) -> Option<&Edge> {
        self.outgoing(from).iter().find(|e| e.to == to)
    }

    pub fn edge_for_pipe(&self, pipe: PipeId) -> Option<&Edge> {
        let from = self.pipe_index.get(&pipe)?;
        self.outgoing(*from).iter().find(|e| e.pipe == pipe)
    }

    pub fn is_pipe_used(&self, pipe: PipeId) -> bool {
        self.pipe_index.contains_key(&pipe)
    }

    pub fn can_delete_pipe(&self, pipe: PipeId) -> bool {
        !self.is_pipe_used(pipe)
    }

    /// True iff no edge touches `station` in either direction.
    pub fn can_delete_station(&self, station: StationId) -> bool {
        !self.edges().any(|e| e.from == station || e.to == station)
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn connection_count(&self) -> usize {
        self.sequence.len()
    }

    /// Outgoing edges of a station (empty if it has none).
    pub fn outgoing(&self, station: StationId) -> &[Edge] {
        self.adjacency.get(&station).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges grouped by ascending source station.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.values().flatten()
    }

    /// All edges in the order they were added.
    pub fn connections(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.sequence.iter().filter_map(|&pipe| self.edge_for_pipe(pipe))
    }

    /// Every station that is the source or destination of some edge.
    pub fn stations(&self) -> BTreeSet<StationId> {
        graph_stations(&self.adjacency)
    }

    pub fn has_cycle(&self) -> bool {
        cycle::has_cycle(&self.adjacency)
    }

    /// Insert an edge without the acyclicity guard.
    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, from: StationId, to: StationId, pipe: PipeId) {
        let snapshot = self.pipes.get(&pipe).copied().unwrap_or(PipeSnapshot {
            capacity: 0,
            weight: Real::INFINITY,
        });
        self.adjacency.entry(from).or_default().push(Edge {
            from,
            to,
            pipe,
            capacity: snapshot.capacity,
            weight: snapshot.weight,
        });
        self.pipe_index.insert(pipe, from);
        self.sequence.push(pipe);
    }
}

fn check_snapshot(pipe: PipeId, snapshot: PipeSnapshot) -> NetworkResult<()> {
    if snapshot.is_valid() {
        Ok(())
    } else {
        warn!(%pipe, weight = snapshot.weight, "pipe snapshot refused");
        Err(NetworkError::InvalidSnapshot { pipe })
    }
}

pub(crate) fn graph_stations(adjacency: &BTreeMap<StationId, Vec<Edge>>) -> BTreeSet<StationId> {
    let mut stations = BTreeSet::new();
    for (&from, edges) in adjacency {
        stations.insert(from);
        stations.extend(edges.iter().map(|e| e.to));
    }
    stations
}
