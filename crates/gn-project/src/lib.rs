//! gn-project: network file format, validation, and the legacy connection list.

pub mod legacy;
pub mod schema;
pub mod validate;

pub use legacy::{read_connections, write_connections};
pub use schema::*;
pub use validate::{ValidationError, validate_network_file};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Legacy connection list: {0}")]
    Legacy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<NetworkFile> {
    let content = std::fs::read_to_string(path)?;
    let file: NetworkFile = serde_yaml::from_str(&content)?;
    validate_network_file(&file)?;
    Ok(file)
}

pub fn save_yaml(path: &std::path::Path, file: &NetworkFile) -> ProjectResult<()> {
    validate_network_file(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<NetworkFile> {
    let content = std::fs::read_to_string(path)?;
    let file: NetworkFile = serde_json::from_str(&content)?;
    validate_network_file(&file)?;
    Ok(file)
}

pub fn save_json(path: &std::path::Path, file: &NetworkFile) -> ProjectResult<()> {
    validate_network_file(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` is JSON, anything else YAML.
pub fn load_any(path: &std::path::Path) -> ProjectResult<NetworkFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

/// Save by extension: `.json` is JSON, anything else YAML.
pub fn save_any(path: &std::path::Path, file: &NetworkFile) -> ProjectResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => save_json(path, file),
        _ => save_yaml(path, file),
    }
}
