use std::path::Path;

use log::debug;
use serde_json::Value;

use super::ExtractError;

/// Read and parse a config document from disk
pub fn load_document(path: &Path) -> Result<Value, ExtractError> {
    let content = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    parse_document(&content, &path.display().to_string())
}

/// Parse raw document bytes, e.g. from a remote fetch. `origin` only labels
/// error messages.
pub fn parse_document(content: &[u8], origin: &str) -> Result<Value, ExtractError> {
    serde_json::from_slice(content).map_err(|source| ExtractError::Json {
        origin: origin.to_string(),
        source,
    })
}
