//! An open network: the inventory registries plus the graph engine built
//! from them, kept in step by every mutation.

use std::io::Write;
use std::path::Path;

use gn_core::{PipeId, StationId};
use gn_graph::{
    ConnectionListing, Edge, FlowReport, GasNetwork, Inventory, PathReport, Pipe, PipeQuery,
    Station, StationQuery,
};
use gn_project::{ConnectionDef, NetworkFile, PipeDef, StationDef};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Stations, pipes, and the connection graph of one network file.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub name: String,
    pub inventory: Inventory,
    pub network: GasNetwork,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load a YAML or JSON network file and rebuild the graph.
    pub fn load(path: &Path) -> AppResult<Self> {
        let file = gn_project::load_any(path)?;
        let workspace = Self::from_file(&file)?;
        info!(
            path = %path.display(),
            stations = workspace.inventory.stations.len(),
            pipes = workspace.inventory.pipes.len(),
            connections = workspace.network.connection_count(),
            "network loaded"
        );
        Ok(workspace)
    }

    /// Build records, register every pipe, then replay connections in order.
    pub fn from_file(file: &NetworkFile) -> AppResult<Self> {
        gn_project::validate_network_file(file).map_err(gn_project::ProjectError::from)?;
        let mut workspace = Self::new(file.name.clone());

        for def in &file.stations {
            workspace.inventory.insert_station(Station::new(
                def.id,
                def.name.clone(),
                def.workshops,
                def.workshops_in_operation,
                def.class.clone(),
            )?);
        }
        for def in &file.pipes {
            let pipe = Pipe::new(
                def.id,
                def.name.clone(),
                def.length_m,
                def.diameter_mm,
                def.in_repair,
            )?;
            workspace.network.register(&pipe)?;
            workspace.inventory.insert_pipe(pipe);
        }
        for (index, conn) in file.connections.iter().enumerate() {
            workspace
                .network
                .add_connection(conn.from, conn.to, conn.pipe)
                .map_err(|source| AppError::Replay { index, source })?;
        }
        Ok(workspace)
    }

    pub fn to_file(&self) -> NetworkFile {
        let mut file = NetworkFile::empty(self.name.clone());
        file.stations = self
            .inventory
            .stations
            .values()
            .map(|s| StationDef {
                id: s.id,
                name: s.name.clone(),
                workshops: s.workshops,
                workshops_in_operation: s.workshops_in_operation,
                class: s.class.clone(),
            })
            .collect();
        file.pipes = self
            .inventory
            .pipes
            .values()
            .map(|p| PipeDef {
                id: p.id,
                name: p.name.clone(),
                length_m: p.length_m(),
                diameter_mm: p.diameter_mm,
                in_repair: p.in_repair,
            })
            .collect();
        file.connections = self.connection_defs();
        file
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        gn_project::save_any(path, &self.to_file())?;
        info!(path = %path.display(), "network saved");
        Ok(())
    }

    /// Connections in the order they were made.
    pub fn connection_defs(&self) -> Vec<ConnectionDef> {
        self.network
            .connections()
            .map(|e| ConnectionDef {
                from: e.from,
                to: e.to,
                pipe: e.pipe,
            })
            .collect()
    }

    pub fn add_station(&mut self, station: Station) -> AppResult<StationId> {
        let id = station.id;
        if self.inventory.station(id).is_some() {
            return Err(AppError::DuplicateStation(id));
        }
        info!(station = %id, name = %station.name, "station added");
        self.inventory.insert_station(station);
        Ok(id)
    }

    /// Add a pipe to the registry and make it available to the engine.
    pub fn add_pipe(&mut self, pipe: Pipe) -> AppResult<PipeId> {
        let id = pipe.id;
        if self.inventory.pipe(id).is_some() {
            return Err(AppError::DuplicatePipe(id));
        }
        self.network.register(&pipe)?;
        info!(pipe = %id, name = %pipe.name, diameter_mm = pipe.diameter_mm, "pipe added");
        self.inventory.insert_pipe(pipe);
        Ok(id)
    }

    /// Id for the next station added through a front end.
    pub fn next_station_id(&self) -> AppResult<StationId> {
        self.inventory
            .next_station_id()
            .ok_or_else(|| AppError::InvalidInput("station ids are exhausted".to_string()))
    }

    /// Id for the next pipe added through a front end.
    pub fn next_pipe_id(&self) -> AppResult<PipeId> {
        self.inventory
            .next_pipe_id()
            .ok_or_else(|| AppError::InvalidInput("pipe ids are exhausted".to_string()))
    }

    pub fn find_pipes(&self, query: &PipeQuery) -> Vec<PipeId> {
        self.inventory.find_pipes(|p| query.matches(p))
    }

    pub fn find_stations(&self, query: &StationQuery) -> Vec<StationId> {
        self.inventory.find_stations(|s| query.matches(s))
    }

    /// Set how many of a station's workshops are running.
    pub fn set_workshops_in_operation(&mut self, station: StationId, count: u32) -> AppResult<()> {
        let record = self
            .inventory
            .stations
            .get_mut(&station)
            .ok_or(AppError::StationNotFound(station))?;
        record.set_workshops_in_operation(count)?;
        info!(%station, workshops_in_operation = count, "station workshops changed");
        Ok(())
    }

    fn require_station(&self, id: StationId) -> AppResult<()> {
        self.inventory
            .station(id)
            .map(|_| ())
            .ok_or(AppError::StationNotFound(id))
    }

    fn require_pipe(&self, id: PipeId) -> AppResult<&Pipe> {
        self.inventory.pipe(id).ok_or(AppError::PipeNotFound(id))
    }

    /// Connect two registered stations through a specific pipe.
    pub fn connect(&mut self, from: StationId, to: StationId, pipe: PipeId) -> AppResult<()> {
        self.require_station(from)?;
        self.require_station(to)?;
        self.require_pipe(pipe)?;
        self.network.add_connection(from, to, pipe)?;
        info!(%from, %to, %pipe, "stations connected");
        Ok(())
    }

    /// Connect through the lowest-id unused pipe of the given diameter.
    pub fn connect_by_diameter(
        &mut self,
        from: StationId,
        to: StationId,
        diameter_mm: u32,
    ) -> AppResult<PipeId> {
        let pipe = self
            .inventory
            .unused_pipe_with_diameter(diameter_mm, &self.network)
            .ok_or(AppError::NoUnusedPipe { diameter_mm })?;
        self.connect(from, to, pipe)?;
        Ok(pipe)
    }

    pub fn disconnect(&mut self, pipe: PipeId) -> AppResult<Edge> {
        let edge = self
            .network
            .remove_connection_by_pipe(pipe)
            .ok_or(AppError::NotConnected(pipe))?;
        info!(from = %edge.from, to = %edge.to, %pipe, "stations disconnected");
        Ok(edge)
    }

    /// Toggle the repair flag and push the new snapshot into the graph.
    ///
    /// Returns the number of connections refreshed.
    pub fn set_repair(&mut self, pipe: PipeId, in_repair: bool) -> AppResult<usize> {
        let record = self
            .inventory
            .pipes
            .get_mut(&pipe)
            .ok_or(AppError::PipeNotFound(pipe))?;
        let previous = record.in_repair;
        record.in_repair = in_repair;
        let refreshed = match self.network.update_pipe_in_network(pipe, record.snapshot()) {
            Ok(refreshed) => refreshed,
            Err(err) => {
                record.in_repair = previous;
                return Err(err.into());
            }
        };
        info!(%pipe, in_repair, refreshed, "pipe repair status changed");
        Ok(refreshed)
    }

    /// Set the repair flag on every listed pipe.
    ///
    /// All ids are checked before any pipe changes. Returns the total
    /// number of connections refreshed.
    pub fn set_repair_many(&mut self, pipes: &[PipeId], in_repair: bool) -> AppResult<usize> {
        for &pipe in pipes {
            self.require_pipe(pipe)?;
        }
        let mut refreshed = 0;
        for &pipe in pipes {
            refreshed += self.set_repair(pipe, in_repair)?;
        }
        info!(count = pipes.len(), in_repair, refreshed, "batch repair edit");
        Ok(refreshed)
    }

    /// Delete a pipe, detaching it from the network first.
    pub fn delete_pipe(&mut self, pipe: PipeId) -> AppResult<Option<Edge>> {
        self.require_pipe(pipe)?;
        let edge = self.network.forget_pipe(pipe);
        self.inventory.pipes.remove(&pipe);
        info!(%pipe, detached = edge.is_some(), "pipe deleted");
        Ok(edge)
    }

    /// Delete a station and every connection touching it.
    pub fn delete_station(&mut self, station: StationId) -> AppResult<Vec<Edge>> {
        self.require_station(station)?;
        let removed = self.network.remove_connections_with_station(station);
        self.inventory.stations.remove(&station);
        info!(%station, removed = removed.len(), "station deleted");
        Ok(removed)
    }

    /// Write the connections as a legacy `from to pipe` list.
    pub fn export_connections<W: Write>(&self, out: W) -> AppResult<usize> {
        let defs = self.connection_defs();
        gn_project::write_connections(out, &defs)?;
        info!(count = defs.len(), "connections exported");
        Ok(defs.len())
    }

    /// Replace all connections with `connections`, replayed in order.
    ///
    /// On a rejected entry the previous connections are restored.
    pub fn import_connections(&mut self, connections: &[ConnectionDef]) -> AppResult<usize> {
        let previous = self.network.clone();
        for pipe in self.connection_defs().into_iter().map(|c| c.pipe) {
            self.network.remove_connection_by_pipe(pipe);
        }
        for (index, conn) in connections.iter().enumerate() {
            if let Err(err) = self.replay_one(index, conn) {
                self.network = previous;
                return Err(err);
            }
        }
        info!(count = connections.len(), "connections imported");
        Ok(connections.len())
    }

    fn replay_one(&mut self, index: usize, conn: &ConnectionDef) -> AppResult<()> {
        self.require_station(conn.from)?;
        self.require_station(conn.to)?;
        self.network
            .add_connection(conn.from, conn.to, conn.pipe)
            .map_err(|source| AppError::Replay { index, source })
    }

    /// Stations in topological order, including unconnected ones.
    pub fn topological_order(&self) -> AppResult<Vec<StationId>> {
        Ok(self.network.topological_sort(self.inventory.station_ids())?)
    }

    pub fn listing(&self) -> ConnectionListing {
        self.network.listing()
    }

    pub fn path_report(&self, source: StationId, sink: StationId) -> AppResult<PathReport> {
        self.require_station(source)?;
        self.require_station(sink)?;
        Ok(self.network.path_report(source, sink, &self.inventory)?)
    }

    pub fn flow_report(&self, source: StationId, sink: StationId) -> AppResult<FlowReport> {
        self.require_station(source)?;
        self.require_station(sink)?;
        Ok(self.network.flow_report(source, sink, &self.inventory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kc(raw: u32) -> StationId {
        StationId::new(raw)
    }

    fn line() -> Workspace {
        let mut ws = Workspace::new("line");
        for raw in 1..=3 {
            ws.add_station(Station::new(kc(raw), format!("KC{raw}"), 2, 2, "A").unwrap())
                .unwrap();
        }
        ws.add_pipe(Pipe::new(PipeId::new(1), "A", 10.0, 500, false).unwrap())
            .unwrap();
        ws.add_pipe(Pipe::new(PipeId::new(2), "B", 5.0, 700, false).unwrap())
            .unwrap();
        ws.connect(kc(1), kc(2), PipeId::new(1)).unwrap();
        ws.connect(kc(2), kc(3), PipeId::new(2)).unwrap();
        ws
    }

    #[test]
    fn connect_requires_known_records() {
        let mut ws = line();
        assert!(matches!(
            ws.connect(kc(1), kc(9), PipeId::new(2)),
            Err(AppError::StationNotFound(_))
        ));
        assert!(matches!(
            ws.connect(kc(1), kc(3), PipeId::new(9)),
            Err(AppError::PipeNotFound(_))
        ));
        assert!(matches!(
            ws.connect(kc(3), kc(1), PipeId::new(1)),
            Err(AppError::Network(_))
        ));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut ws = line();
        assert!(matches!(
            ws.add_station(Station::new(kc(1), "again", 1, 1, "A").unwrap()),
            Err(AppError::DuplicateStation(_))
        ));
        assert!(matches!(
            ws.add_pipe(Pipe::new(PipeId::new(2), "again", 1.0, 500, false).unwrap()),
            Err(AppError::DuplicatePipe(_))
        ));
    }

    #[test]
    fn connect_by_diameter_picks_unused_pipe() {
        let mut ws = line();
        assert!(matches!(
            ws.connect_by_diameter(kc(1), kc(3), 500),
            Err(AppError::NoUnusedPipe { diameter_mm: 500 })
        ));
        ws.add_pipe(Pipe::new(PipeId::new(3), "C", 2.0, 500, false).unwrap())
            .unwrap();
        assert_eq!(ws.connect_by_diameter(kc(1), kc(3), 500).unwrap(), PipeId::new(3));
    }

    #[test]
    fn repair_flows_into_graph() {
        let mut ws = line();
        assert_eq!(ws.set_repair(PipeId::new(1), true).unwrap(), 1);
        assert!(ws.inventory.pipe(PipeId::new(1)).unwrap().in_repair);
        assert_eq!(ws.flow_report(kc(1), kc(3)).unwrap().max_flow, 0);
        assert!(ws.path_report(kc(1), kc(3)).is_err());

        ws.set_repair(PipeId::new(1), false).unwrap();
        assert_eq!(ws.flow_report(kc(1), kc(3)).unwrap().max_flow, 60);
    }

    #[test]
    fn batch_repair_over_search_results() {
        let mut ws = line();
        ws.add_pipe(Pipe::new(PipeId::new(3), "A", 2.0, 500, false).unwrap())
            .unwrap();
        let found = ws.find_pipes(&PipeQuery::Name("A".to_string()));
        assert_eq!(found, vec![PipeId::new(1), PipeId::new(3)]);

        assert_eq!(ws.set_repair_many(&found, true).unwrap(), 1);
        assert_eq!(ws.find_pipes(&PipeQuery::InRepair(true)), found);
        assert_eq!(ws.network.edge_for_pipe(PipeId::new(1)).unwrap().capacity, 0);
        assert_eq!(ws.flow_report(kc(1), kc(3)).unwrap().max_flow, 0);

        // unknown id anywhere in the batch: nothing changes
        assert!(matches!(
            ws.set_repair_many(&[PipeId::new(1), PipeId::new(99)], false),
            Err(AppError::PipeNotFound(_))
        ));
        assert!(ws.inventory.pipe(PipeId::new(1)).unwrap().in_repair);
    }

    #[test]
    fn workshop_edit_feeds_idle_search() {
        let mut ws = line();
        assert!(ws.find_stations(&StationQuery::MinIdlePercent(50.0)).is_empty());

        ws.set_workshops_in_operation(kc(2), 0).unwrap();
        assert_eq!(ws.find_stations(&StationQuery::MinIdlePercent(50.0)), vec![kc(2)]);
        assert_eq!(ws.find_stations(&StationQuery::Name("KC3".to_string())), vec![kc(3)]);

        assert!(matches!(
            ws.set_workshops_in_operation(kc(2), 3),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            ws.set_workshops_in_operation(kc(9), 0),
            Err(AppError::StationNotFound(_))
        ));
        assert_eq!(ws.inventory.station(kc(2)).unwrap().workshops_in_operation, 0);
    }

    #[test]
    fn next_ids_report_exhaustion() {
        let mut ws = line();
        assert_eq!(ws.next_station_id().unwrap(), kc(4));
        assert_eq!(ws.next_pipe_id().unwrap(), PipeId::new(3));

        ws.add_station(Station::new(kc(u32::MAX), "Last", 1, 1, "A").unwrap())
            .unwrap();
        ws.add_pipe(Pipe::new(PipeId::new(u32::MAX), "Last", 1.0, 500, false).unwrap())
            .unwrap();
        assert!(matches!(ws.next_station_id(), Err(AppError::InvalidInput(_))));
        assert!(matches!(ws.next_pipe_id(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn delete_pipe_and_station_keep_graph_in_step() {
        let mut ws = line();
        let edge = ws.delete_pipe(PipeId::new(2)).unwrap().unwrap();
        assert_eq!((edge.from, edge.to), (kc(2), kc(3)));
        assert!(!ws.network.is_registered(PipeId::new(2)));

        let removed = ws.delete_station(kc(1)).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(ws.network.is_empty());
        assert_eq!(ws.topological_order().unwrap(), vec![kc(2), kc(3)]);
    }

    #[test]
    fn file_round_trip_preserves_connection_order() {
        let mut ws = line();
        ws.disconnect(PipeId::new(1)).unwrap();
        ws.connect(kc(1), kc(2), PipeId::new(1)).unwrap();

        let file = ws.to_file();
        assert_eq!(file.connections[0].pipe, PipeId::new(2));
        let rebuilt = Workspace::from_file(&file).unwrap();
        assert_eq!(rebuilt.network, ws.network);
        assert_eq!(rebuilt.inventory, ws.inventory);
    }

    #[test]
    fn replay_reports_rejected_entry() {
        let mut file = line().to_file();
        file.connections.push(ConnectionDef {
            from: kc(3),
            to: kc(1),
            pipe: PipeId::new(2),
        });
        // validation catches the reused pipe before replay
        assert!(matches!(Workspace::from_file(&file), Err(AppError::Project(_))));

        file.connections.pop();
        file.pipes.push(PipeDef {
            id: PipeId::new(3),
            name: "C".to_string(),
            length_m: 1.0,
            diameter_mm: 500,
            in_repair: false,
        });
        file.connections.push(ConnectionDef {
            from: kc(3),
            to: kc(1),
            pipe: PipeId::new(3),
        });
        assert!(matches!(
            Workspace::from_file(&file),
            Err(AppError::Replay { index: 2, .. })
        ));
    }

    #[test]
    fn export_writes_legacy_lines() {
        let ws = line();
        let mut out = Vec::new();
        assert_eq!(ws.export_connections(&mut out).unwrap(), 2);
        let parsed = gn_project::read_connections(out.as_slice()).unwrap();
        assert_eq!(parsed, ws.connection_defs());
    }

    #[test]
    fn failed_import_restores_previous_connections() {
        let mut ws = line();
        let before = ws.network.clone();
        let bad = [
            ConnectionDef {
                from: kc(2),
                to: kc(1),
                pipe: PipeId::new(1),
            },
            ConnectionDef {
                from: kc(1),
                to: kc(2),
                pipe: PipeId::new(2),
            },
        ];
        assert!(matches!(
            ws.import_connections(&bad),
            Err(AppError::Replay { index: 1, .. })
        ));
        assert_eq!(ws.network, before);

        let good = [ConnectionDef {
            from: kc(3),
            to: kc(1),
            pipe: PipeId::new(2),
        }];
        assert_eq!(ws.import_connections(&good).unwrap(), 1);
        assert_eq!(ws.connection_defs(), good.to_vec());
    }
}
