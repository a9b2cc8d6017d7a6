//! Shape assertions for untyped JSON nodes
//!
//! Every accessor takes the node and the path it was read from, and either
//! returns the node narrowed to the expected shape or a [`SchemaError`] naming
//! that path. A missing key is seen as `null` because `serde_json` indexing
//! yields `Value::Null` for absent members.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Expected {expected} at {path}, got {found}")]
    Mismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path} is empty")]
    Empty { path: String },
}

impl SchemaError {
    pub fn path(&self) -> &str {
        match self {
            SchemaError::Mismatch { path, .. } | SchemaError::Empty { path } => path,
        }
    }
}

/// Dotted/indexed location of a node inside the document,
/// e.g. `inbounds[0].settings.clients[0].id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root(name: &str) -> Self {
        FieldPath(name.to_string())
    }

    pub fn key(&self, key: &str) -> Self {
        FieldPath(format!("{}.{}", self.0, key))
    }

    pub fn index(&self, index: usize) -> Self {
        FieldPath(format!("{}[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable name of the JSON shape of `value`
pub fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &FieldPath, expected: &'static str, value: &Value) -> SchemaError {
    SchemaError::Mismatch {
        path: path.to_string(),
        expected,
        found: shape_name(value),
    }
}

pub fn expect_object<'a>(
    value: &'a Value,
    path: &FieldPath,
) -> Result<&'a Map<String, Value>, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| mismatch(path, "object", value))
}

pub fn expect_array<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a [Value], SchemaError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| mismatch(path, "array", value))
}

/// Like [`expect_array`], but an empty sequence is rejected with
/// [`SchemaError::Empty`].
pub fn expect_non_empty_array<'a>(
    value: &'a Value,
    path: &FieldPath,
) -> Result<&'a [Value], SchemaError> {
    let items = expect_array(value, path)?;
    if items.is_empty() {
        return Err(SchemaError::Empty {
            path: path.to_string(),
        });
    }
    Ok(items)
}

/// Returns the string trimmed of surrounding whitespace. Blank strings are a
/// mismatch, not a separate error.
pub fn expect_str<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a str, SchemaError> {
    match value.as_str().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(mismatch(path, "non-empty string", value)),
    }
}

/// Widened to `i128` so every JSON integer, signed or not, reaches range
/// checks intact.
pub fn expect_int(value: &Value, path: &FieldPath) -> Result<i128, SchemaError> {
    // serde_json never coerces booleans into numbers, but keep the rejection
    // explicit so config sources with looser typing stay covered.
    if value.is_boolean() {
        return Err(mismatch(path, "integer", value));
    }
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
        .ok_or_else(|| mismatch(path, "integer", value))
}
