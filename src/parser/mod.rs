//! Xray server config parsing
//!
//! Turns a raw config document into a validated [`crate::models::RealityInbound`].

pub mod document;
pub mod format;
pub mod inbound;
pub mod schema;

use thiserror::Error;

pub use document::{load_document, parse_document};
pub use format::FormatError;
pub use inbound::{parse_inbound, select_inbound};
pub use schema::{FieldPath, SchemaError};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("{path} is not {expected}: {found}")]
    ProtocolMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("Inbound index {index} is out of range (0..={})", .len - 1)]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No matching inbound found (need protocol=vless + security=reality). Last error: {last}")]
    NoMatch { last: Box<ExtractError> },
}
