//! Snapshot loading
//!
//! A snapshot holds one server document, a list of them, or a paginated
//! `{ "docs": [...] }` envelope as returned by the backend's find endpoint.

use crate::error::{CoreError, Result};
use crate::model::{ServerDocument, ServerRecord};
use std::path::Path;

/// Encoding of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// `.yaml` / `.yml` files are YAML, everything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SnapshotFormat::Yaml
            }
            _ => SnapshotFormat::Json,
        }
    }
}

/// Key of the paginated envelope returned by the backend's find endpoint
const DOCS_KEY: &str = "docs";

/// Split a JSON snapshot into its server documents
fn json_documents(root: serde_json::Value) -> Result<Vec<serde_json::Value>> {
    use serde_json::Value;

    match root {
        Value::Array(docs) => Ok(docs),
        Value::Object(mut map) => match map.remove(DOCS_KEY) {
            Some(Value::Array(docs)) => Ok(docs),
            Some(other) => {
                map.insert(DOCS_KEY.to_string(), other);
                Ok(vec![Value::Object(map)])
            }
            None => Ok(vec![Value::Object(map)]),
        },
        _ => Err(CoreError::UnrecognizedSnapshot),
    }
}

/// Split a YAML snapshot into its server documents
fn yaml_documents(root: serde_yaml::Value) -> Result<Vec<serde_yaml::Value>> {
    use serde_yaml::Value;

    match root {
        Value::Sequence(docs) => Ok(docs),
        Value::Mapping(mut map) => match map.remove(DOCS_KEY) {
            Some(Value::Sequence(docs)) => Ok(docs),
            Some(other) => {
                map.insert(Value::from(DOCS_KEY), other);
                Ok(vec![Value::Mapping(map)])
            }
            None => Ok(vec![Value::Mapping(map)]),
        },
        _ => Err(CoreError::UnrecognizedSnapshot),
    }
}

fn invalid_document(index: usize, err: impl std::fmt::Display) -> CoreError {
    CoreError::InvalidDocument {
        index,
        reason: err.to_string(),
    }
}

/// Parse a snapshot into normalized records.
///
/// Each document is decoded on its own, so a malformed one is reported by
/// its position in the snapshot.
pub fn parse_servers(content: &str, format: SnapshotFormat) -> Result<Vec<ServerRecord>> {
    let documents: Vec<ServerDocument> = match format {
        SnapshotFormat::Json => json_documents(serde_json::from_str(content)?)?
            .into_iter()
            .enumerate()
            .map(|(index, doc)| serde_json::from_value(doc).map_err(|e| invalid_document(index, e)))
            .collect::<Result<_>>()?,
        SnapshotFormat::Yaml => yaml_documents(serde_yaml::from_str(content)?)?
            .into_iter()
            .enumerate()
            .map(|(index, doc)| serde_yaml::from_value(doc).map_err(|e| invalid_document(index, e)))
            .collect::<Result<_>>()?,
    };

    let records: Vec<ServerRecord> = documents.into_iter().map(ServerRecord::from).collect();

    tracing::debug!(servers = records.len(), ?format, "parsed server snapshot");
    Ok(records)
}

/// Read and parse a snapshot file
pub fn load_servers_file(path: &Path) -> Result<Vec<ServerRecord>> {
    tracing::debug!(path = %path.display(), "loading server snapshot");
    let content = std::fs::read_to_string(path)?;
    parse_servers(&content, SnapshotFormat::from_path(path))
}

/// Find a server by name or id
pub fn find_server<'a>(records: &'a [ServerRecord], key: &str) -> Result<&'a ServerRecord> {
    if records.is_empty() {
        return Err(CoreError::EmptySnapshot);
    }
    records
        .iter()
        .find(|r| r.name.as_deref() == Some(key) || r.id.as_deref() == Some(key))
        .ok_or_else(|| CoreError::ServerNotFound(key.to_string()))
}
