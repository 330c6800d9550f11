//! Network file validation logic.

use crate::schema::{ConnectionDef, NetworkFile, PipeDef, StationDef};
use std::collections::{HashMap, HashSet};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Pipe {pipe} is used by more than one connection")]
    PipeReused { pipe: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_network_file(file: &NetworkFile) -> Result<(), ValidationError> {
    if file.version == 0 || file.version > crate::schema::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    let mut station_ids = HashSet::new();
    for station in &file.stations {
        validate_station(station)?;
        if !station_ids.insert(station.id) {
            return Err(ValidationError::DuplicateId {
                id: station.id.to_string(),
                context: "stations".to_string(),
            });
        }
    }

    let mut pipe_ids = HashSet::new();
    for pipe in &file.pipes {
        validate_pipe(pipe)?;
        if !pipe_ids.insert(pipe.id) {
            return Err(ValidationError::DuplicateId {
                id: pipe.id.to_string(),
                context: "pipes".to_string(),
            });
        }
    }

    let mut pipe_uses = HashMap::new();
    for conn in &file.connections {
        validate_connection_refs(conn, &station_ids, &pipe_ids)?;
        let uses = pipe_uses.entry(conn.pipe).or_insert(0usize);
        *uses += 1;
        if *uses > 1 {
            return Err(ValidationError::PipeReused {
                pipe: conn.pipe.to_string(),
            });
        }
    }

    Ok(())
}

fn validate_station(station: &StationDef) -> Result<(), ValidationError> {
    if station.id.get() == 0 {
        return Err(ValidationError::InvalidValue {
            field: "station.id".to_string(),
            value: "0".to_string(),
            reason: "ids start at 1".to_string(),
        });
    }
    if station.workshops_in_operation > station.workshops {
        return Err(ValidationError::InvalidValue {
            field: format!("station {}.workshops_in_operation", station.id),
            value: station.workshops_in_operation.to_string(),
            reason: format!("exceeds workshops ({})", station.workshops),
        });
    }
    Ok(())
}

fn validate_pipe(pipe: &PipeDef) -> Result<(), ValidationError> {
    if pipe.id.get() == 0 {
        return Err(ValidationError::InvalidValue {
            field: "pipe.id".to_string(),
            value: "0".to_string(),
            reason: "ids start at 1".to_string(),
        });
    }
    if !pipe.length_m.is_finite() || pipe.length_m < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: format!("pipe {}.length_m", pipe.id),
            value: pipe.length_m.to_string(),
            reason: "must be finite and non-negative".to_string(),
        });
    }
    if pipe.diameter_mm == 0 {
        return Err(ValidationError::InvalidValue {
            field: format!("pipe {}.diameter_mm", pipe.id),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_connection_refs(
    conn: &ConnectionDef,
    station_ids: &HashSet<gn_core::StationId>,
    pipe_ids: &HashSet<gn_core::PipeId>,
) -> Result<(), ValidationError> {
    for (station, end) in [(conn.from, "from"), (conn.to, "to")] {
        if !station_ids.contains(&station) {
            return Err(ValidationError::MissingReference {
                id: station.to_string(),
                context: format!("connection {}", end),
            });
        }
    }
    if !pipe_ids.contains(&conn.pipe) {
        return Err(ValidationError::MissingReference {
            id: conn.pipe.to_string(),
            context: "connection pipe".to_string(),
        });
    }
    Ok(())
}
