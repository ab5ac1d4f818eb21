//! Error types for relnotes core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelNotesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RelNotesError>;
