//! Error types for towcheck

use serde::Serialize;
use thiserror::Error;

/// A record that could not be normalized into a typed spec.
///
/// Returned per record so batch processing can skip it and continue.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RecordError {
    #[error("{record} record is not an object")]
    NotAnObject { record: &'static str },

    #[error("field `{field}` is not numeric: {value}")]
    InvalidNumber { field: String, value: String },
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Report document export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to draw report document: {0}")]
    Drawing(String),

    #[error("Failed to write report document {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Export directory does not exist: {0}")]
    MissingDirectory(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record: {0}")]
    Record(#[from] RecordError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
