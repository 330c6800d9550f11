//! Read-only view of the station and pipe registries.

use std::collections::BTreeMap;

use gn_core::{PipeId, Real, StationId};

use crate::network::GasNetwork;
use crate::pipe::Pipe;
use crate::station::Station;

/// Pipe search criteria.
#[derive(Debug, Clone, PartialEq)]
pub enum PipeQuery {
    /// Exact name match.
    Name(String),
    /// Repair flag equal to the given value.
    InRepair(bool),
}

impl PipeQuery {
    pub fn matches(&self, pipe: &Pipe) -> bool {
        match self {
            PipeQuery::Name(name) => pipe.name == *name,
            PipeQuery::InRepair(flag) => pipe.in_repair == *flag,
        }
    }
}

/// Station search criteria.
#[derive(Debug, Clone, PartialEq)]
pub enum StationQuery {
    /// Exact name match.
    Name(String),
    /// At least this percentage of workshops idle. Stations without
    /// workshops never match.
    MinIdlePercent(Real),
}

impl StationQuery {
    pub fn matches(&self, station: &Station) -> bool {
        match self {
            StationQuery::Name(name) => station.name == *name,
            StationQuery::MinIdlePercent(percent) => {
                station.workshops > 0 && station.idle_fraction() * 100.0 >= *percent
            }
        }
    }
}

/// Stations and pipes owned outside the engine.
///
/// The engine never mutates an inventory; callers keep the two in step
/// (`register`, `update_pipe_in_network`, removal on delete).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub stations: BTreeMap<StationId, Station>,
    pub pipes: BTreeMap<PipeId, Pipe>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a station, returning any record it replaced.
    pub fn insert_station(&mut self, station: Station) -> Option<Station> {
        self.stations.insert(station.id, station)
    }

    /// Insert a pipe, returning any record it replaced.
    pub fn insert_pipe(&mut self, pipe: Pipe) -> Option<Pipe> {
        self.pipes.insert(pipe.id, pipe)
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn pipe(&self, id: PipeId) -> Option<&Pipe> {
        self.pipes.get(&id)
    }

    pub fn station_name(&self, id: StationId) -> Option<&str> {
        self.station(id).map(|s| s.name.as_str())
    }

    pub fn station_ids(&self) -> impl Iterator<Item = StationId> + '_ {
        self.stations.keys().copied()
    }

    /// One past the highest station id (ids start at 1); `None` once the
    /// highest id is `u32::MAX`.
    pub fn next_station_id(&self) -> Option<StationId> {
        let last = self.stations.keys().next_back().map_or(0, |id| id.get());
        last.checked_add(1).map(StationId::new)
    }

    /// One past the highest pipe id (ids start at 1); `None` once the
    /// highest id is `u32::MAX`.
    pub fn next_pipe_id(&self) -> Option<PipeId> {
        let last = self.pipes.keys().next_back().map_or(0, |id| id.get());
        last.checked_add(1).map(PipeId::new)
    }

    /// Ids of pipes accepted by `predicate`, ascending.
    pub fn find_pipes<F>(&self, predicate: F) -> Vec<PipeId>
    where
        F: Fn(&Pipe) -> bool,
    {
        self.pipes
            .values()
            .filter(|&p| predicate(p))
            .map(|p| p.id)
            .collect()
    }

    /// Ids of stations accepted by `predicate`, ascending.
    pub fn find_stations<F>(&self, predicate: F) -> Vec<StationId>
    where
        F: Fn(&Station) -> bool,
    {
        self.stations
            .values()
            .filter(|&s| predicate(s))
            .map(|s| s.id)
            .collect()
    }

    /// Lowest-id pipe of the given diameter that no connection uses yet.
    pub fn unused_pipe_with_diameter(
        &self,
        diameter_mm: u32,
        network: &GasNetwork,
    ) -> Option<PipeId> {
        self.pipes
            .values()
            .find(|p| p.diameter_mm == diameter_mm && !network.is_pipe_used(p.id))
            .map(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe(raw: u32, diameter_mm: u32) -> Pipe {
        Pipe::new(PipeId::new(raw), format!("P{raw}"), 10.0, diameter_mm, false).unwrap()
    }

    #[test]
    fn next_ids_follow_highest() {
        let mut inv = Inventory::new();
        assert_eq!(inv.next_station_id(), Some(StationId::new(1)));
        assert_eq!(inv.next_pipe_id(), Some(PipeId::new(1)));

        inv.insert_pipe(pipe(4, 500));
        inv.insert_station(Station::new(StationId::new(9), "KC9", 1, 1, "A").unwrap());
        assert_eq!(inv.next_pipe_id(), Some(PipeId::new(5)));
        assert_eq!(inv.next_station_id(), Some(StationId::new(10)));
        assert_eq!(inv.station_name(StationId::new(9)), Some("KC9"));
    }

    #[test]
    fn next_ids_exhausted_at_max() {
        let mut inv = Inventory::new();
        inv.insert_station(Station::new(StationId::new(u32::MAX), "Last", 1, 1, "A").unwrap());
        inv.insert_pipe(pipe(u32::MAX, 500));
        assert_eq!(inv.next_station_id(), None);
        assert_eq!(inv.next_pipe_id(), None);
    }

    #[test]
    fn pipe_queries() {
        let mut inv = Inventory::new();
        inv.insert_pipe(pipe(1, 500));
        inv.insert_pipe(Pipe::new(PipeId::new(2), "Main", 3.0, 700, true).unwrap());
        inv.insert_pipe(Pipe::new(PipeId::new(3), "Main", 4.0, 700, false).unwrap());

        let by_name = PipeQuery::Name("Main".to_string());
        assert_eq!(inv.find_pipes(|p| by_name.matches(p)), vec![PipeId::new(2), PipeId::new(3)]);
        let repaired = PipeQuery::InRepair(true);
        assert_eq!(inv.find_pipes(|p| repaired.matches(p)), vec![PipeId::new(2)]);
        let working = PipeQuery::InRepair(false);
        assert_eq!(inv.find_pipes(|p| working.matches(p)), vec![PipeId::new(1), PipeId::new(3)]);
        assert!(inv.find_pipes(|p| p.name == "nope").is_empty());
    }

    #[test]
    fn station_queries() {
        let mut inv = Inventory::new();
        for (raw, total, active) in [(1, 4, 4), (2, 4, 1), (3, 0, 0), (4, 10, 5)] {
            inv.insert_station(
                Station::new(StationId::new(raw), format!("KC{raw}"), total, active, "A").unwrap(),
            );
        }
        let idle_half = StationQuery::MinIdlePercent(50.0);
        assert_eq!(
            inv.find_stations(|s| idle_half.matches(s)),
            vec![StationId::new(2), StationId::new(4)]
        );
        // no workshops means no idle share to speak of
        let any_idle = StationQuery::MinIdlePercent(0.0);
        assert!(!inv.find_stations(|s| any_idle.matches(s)).contains(&StationId::new(3)));
        let named = StationQuery::Name("KC3".to_string());
        assert_eq!(inv.find_stations(|s| named.matches(s)), vec![StationId::new(3)]);
    }

    #[test]
    fn unused_pipe_lookup_skips_used_ones() {
        let mut inv = Inventory::new();
        let mut net = GasNetwork::new();
        for p in [pipe(1, 500), pipe(2, 700), pipe(3, 500)] {
            net.register(&p).unwrap();
            inv.insert_pipe(p);
        }
        assert_eq!(inv.unused_pipe_with_diameter(500, &net), Some(PipeId::new(1)));

        net.add_connection(StationId::new(1), StationId::new(2), PipeId::new(1))
            .unwrap();
        assert_eq!(inv.unused_pipe_with_diameter(500, &net), Some(PipeId::new(3)));
        assert_eq!(inv.unused_pipe_with_diameter(1400, &net), None);
    }
}
