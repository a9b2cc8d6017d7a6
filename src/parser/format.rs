//! Value-level checks for fields that are present and well-shaped but still
//! have to satisfy a format: UUIDs, short ids, x25519 keys and ports.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

static KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{32,}$").unwrap());
static HEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]+$").unwrap());

/// Canonical hyphenated UUID length (8-4-4-4-12).
const UUID_LEN: usize = 36;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} at {path}: {constraint}, got: {value}")]
pub struct FormatError {
    pub field: &'static str,
    pub path: String,
    pub value: String,
    pub constraint: String,
}

impl FormatError {
    fn new(field: &'static str, path: &str, value: &str, constraint: impl Into<String>) -> Self {
        FormatError {
            field,
            path: path.to_string(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }
}

/// Key material is never echoed back in full.
fn redact(value: &str) -> String {
    let head: String = value.chars().take(4).collect();
    format!("{}... ({} chars)", head, value.chars().count())
}

pub fn validate_uuid(value: &str, path: &str) -> Result<(), FormatError> {
    if value.len() != UUID_LEN || Uuid::try_parse(value).is_err() {
        return Err(FormatError::new(
            "id",
            path,
            value,
            "must be a hyphenated UUID (8-4-4-4-12 hex digits)",
        ));
    }
    Ok(())
}

/// Checks the short id and returns it lowercased.
pub fn validate_short_id(value: &str, path: &str) -> Result<String, FormatError> {
    if !HEX_RE.is_match(value) {
        return Err(FormatError::new("shortId", path, value, "must be hex"));
    }
    if value.len() % 2 != 0 {
        return Err(FormatError::new(
            "shortId",
            path,
            value,
            format!("must have even length, len={}", value.len()),
        ));
    }
    Ok(value.to_ascii_lowercase())
}

/// URL-safe base64 alphabet, at least 32 characters. Used for both the
/// private key read from the config and the derived public key.
pub fn validate_key(field: &'static str, value: &str, path: &str) -> Result<(), FormatError> {
    if !KEY_RE.is_match(value) {
        return Err(FormatError::new(
            field,
            path,
            &redact(value),
            "must be at least 32 characters of [A-Za-z0-9_-]",
        ));
    }
    Ok(())
}

pub fn validate_port(value: i128, path: &str) -> Result<u16, FormatError> {
    match u16::try_from(value) {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err(FormatError::new(
            "port",
            path,
            &value.to_string(),
            "out of range 1..=65535",
        )),
    }
}
