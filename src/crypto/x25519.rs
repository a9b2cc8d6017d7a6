use std::io::ErrorKind;
use std::process::Command;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{DerivationError, KeyDeriver};
use crate::parser::format::validate_key;

// Xray 25.x labels the public key "Password:", older releases "PublicKey:".
static PUBLIC_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:Password|PublicKey):\s*(\S+)\s*$").unwrap());

pub const DEFAULT_XRAY_BIN: &str = "xray";

/// Runs `xray x25519 -i <private key>` once per call.
#[derive(Debug, Clone)]
pub struct XrayDeriver {
    binary: String,
}

impl XrayDeriver {
    pub fn new(binary: impl Into<String>) -> Self {
        XrayDeriver {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for XrayDeriver {
    fn default() -> Self {
        XrayDeriver::new(DEFAULT_XRAY_BIN)
    }
}

impl KeyDeriver for XrayDeriver {
    fn derive(&self, private_key: &str) -> Result<String, DerivationError> {
        debug!("Running {} x25519 -i <private key>", self.binary);
        let output = Command::new(&self.binary)
            .args(["x25519", "-i", private_key])
            .output()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => DerivationError::NotFound {
                    binary: self.binary.clone(),
                },
                _ => DerivationError::Spawn {
                    binary: self.binary.clone(),
                    source,
                },
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim().to_string();

        if !output.status.success() {
            return Err(DerivationError::Failed {
                status: output.status.to_string(),
                output: combined,
            });
        }

        parse_public_key(&combined)
    }
}

/// Find the labelled public key in `xray x25519` output and check its format.
pub fn parse_public_key(output: &str) -> Result<String, DerivationError> {
    let key = PUBLIC_KEY_RE
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DerivationError::Unparsable {
            output: output.to_string(),
        })?;
    validate_key("publicKey", &key, "xray output")?;
    Ok(key)
}
