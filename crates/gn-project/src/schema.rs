//! Network file schema definitions.

use gn_core::{PipeId, StationId};
use serde::{Deserialize, Serialize};

/// Current network file version.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkFile {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub stations: Vec<StationDef>,
    #[serde(default)]
    pub pipes: Vec<PipeDef>,
    /// Replayed in order when the network is rebuilt.
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
}

impl NetworkFile {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            stations: Vec::new(),
            pipes: Vec::new(),
            connections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationDef {
    pub id: StationId,
    pub name: String,
    pub workshops: u32,
    pub workshops_in_operation: u32,
    #[serde(default)]
    pub class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipeDef {
    pub id: PipeId,
    pub name: String,
    pub length_m: f64,
    pub diameter_mm: u32,
    #[serde(default)]
    pub in_repair: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionDef {
    pub from: StationId,
    pub to: StationId,
    pub pipe: PipeId,
}
