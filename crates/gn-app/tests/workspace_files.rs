use std::path::PathBuf;

use gn_app::{AppError, Workspace};
use gn_core::{PipeId, StationId};
use gn_graph::{Pipe, Station};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gn-app-{}-{name}", std::process::id()))
}

fn kc(raw: u32) -> StationId {
    StationId::new(raw)
}

fn diamond() -> Workspace {
    let mut ws = Workspace::new("diamond");
    for raw in 1..=4 {
        ws.add_station(Station::new(kc(raw), format!("KC{raw}"), 4, 3, "B").unwrap())
            .unwrap();
    }
    let pipes = [(1, 10.0, 500), (2, 4.0, 700), (3, 1.0, 1000), (4, 8.0, 1400)];
    for (raw, len, dia) in pipes {
        ws.add_pipe(Pipe::new(PipeId::new(raw), format!("P{raw}"), len, dia, false).unwrap())
            .unwrap();
    }
    ws.connect(kc(1), kc(2), PipeId::new(1)).unwrap();
    ws.connect(kc(1), kc(3), PipeId::new(2)).unwrap();
    ws.connect(kc(2), kc(4), PipeId::new(3)).unwrap();
    ws.connect(kc(3), kc(4), PipeId::new(4)).unwrap();
    ws
}

#[test]
fn yaml_save_and_load_rebuilds_graph() {
    let ws = diamond();
    let path = temp_path("diamond.yaml");
    ws.save(&path).unwrap();
    let loaded = Workspace::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.name, "diamond");
    assert_eq!(loaded.network, ws.network);
    assert_eq!(loaded.connection_defs(), ws.connection_defs());
}

#[test]
fn json_round_trip_keeps_repair_state() {
    let mut ws = diamond();
    ws.set_repair(PipeId::new(2), true).unwrap();
    let path = temp_path("diamond.json");
    ws.save(&path).unwrap();
    let loaded = Workspace::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(loaded.inventory.pipe(PipeId::new(2)).unwrap().in_repair);
    assert_eq!(loaded.flow_report(kc(1), kc(4)).unwrap().max_flow, 60);
}

#[test]
fn analyses_over_diamond() {
    let ws = diamond();
    let order = ws.topological_order().unwrap();
    assert_eq!(order, vec![kc(1), kc(2), kc(3), kc(4)]);

    let path = ws.path_report(kc(1), kc(4)).unwrap();
    assert_eq!(path.total_distance, 11.0);
    assert_eq!(path.hop_count(), 2);

    // 1->2->4 limited to 60, 1->3->4 limited to 130
    assert_eq!(ws.flow_report(kc(1), kc(4)).unwrap().max_flow, 190);
}

#[test]
fn unknown_station_in_analysis() {
    let ws = diamond();
    assert!(matches!(
        ws.flow_report(kc(1), kc(99)),
        Err(AppError::StationNotFound(_))
    ));
}

#[test]
fn missing_file_is_project_error() {
    let path = temp_path("missing.yaml");
    assert!(matches!(Workspace::load(&path), Err(AppError::Project(_))));
}
