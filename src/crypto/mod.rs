//! Public key derivation for Reality private keys

pub mod x25519;

use thiserror::Error;

use crate::parser::FormatError;

pub use x25519::{parse_public_key, XrayDeriver};

/// Derives the Reality public key (`pbk`) from an inbound's private key.
pub trait KeyDeriver {
    fn derive(&self, private_key: &str) -> Result<String, DerivationError>;
}

#[derive(Error, Debug)]
pub enum DerivationError {
    #[error("{binary} binary not found in PATH. Install xray or set XRAY_BIN to the xray executable path")]
    NotFound { binary: String },

    #[error("Failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("xray x25519 -i failed ({status}). Output:\n{output}")]
    Failed { status: String, output: String },

    #[error("Failed to parse public key from xray output:\n{output}")]
    Unparsable { output: String },

    #[error("Derived public key has unexpected format: {0}")]
    Malformed(#[from] FormatError),
}
