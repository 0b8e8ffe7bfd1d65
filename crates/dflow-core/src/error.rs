//! Core error types

use thiserror::Error;

/// Errors raised while loading server snapshots.
///
/// Classification itself never fails; these only cover the input boundary.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    #[error("Snapshot contains no servers")]
    EmptySnapshot,

    #[error("Snapshot must be a server document, a list of them, or a {{\"docs\": [...]}} page")]
    UnrecognizedSnapshot,

    #[error("Invalid server document at index {index}: {reason}")]
    InvalidDocument { index: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
