use log::info;
use serde_json::Value;

use crate::crypto::KeyDeriver;
use crate::error::Result;
use crate::generator::vless::build_vless_link;
use crate::models::RealityInbound;
use crate::parser::select_inbound;

/// Caller-supplied parameters for a share link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    /// Public host or IP clients connect to
    pub server: String,
    /// Link remark (`#name`)
    pub name: String,
    /// uTLS fingerprint (`fp=`)
    pub fingerprint: String,
    /// Use this inbound instead of the first matching one
    pub inbound_index: Option<usize>,
}

/// Everything produced from one config document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareArtifacts {
    pub inbound: RealityInbound,
    pub public_key: String,
    pub link: String,
}

/// Select the inbound, derive its public key and build the share link.
///
/// Stops at the first failing stage.
pub fn generate_share<D: KeyDeriver + ?Sized>(
    document: &Value,
    request: &ShareRequest,
    deriver: &D,
) -> Result<ShareArtifacts> {
    let inbound = select_inbound(document, request.inbound_index)?;
    let public_key = deriver.derive(inbound.private_key())?;
    info!(
        "Derived public key for inbound on port {} ({})",
        inbound.port(),
        inbound.server_name()
    );

    let link = build_vless_link(
        &request.server,
        &request.name,
        &request.fingerprint,
        &inbound,
        &public_key,
    );
    Ok(ShareArtifacts {
        inbound,
        public_key,
        link,
    })
}
