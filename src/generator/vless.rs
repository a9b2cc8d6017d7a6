use crate::models::{RealityInbound, REALITY_SECURITY, VLESS_PROTOCOL};
use crate::utils::url::{encode_query, url_encode};

/// Build a VLESS Reality share link
///
/// Format:
/// `vless://{uuid}@{server}:{port}?type={network}&security=reality&sni={sni}&fp={fp}&pbk={publicKey}&sid={shortId}[&flow={flow}]#{name}`
///
/// Query values and the name fragment are percent-encoded; the uuid, server
/// and port are written as-is. `flow` is only appended when the inbound has
/// one, and always comes last.
///
/// # Arguments
/// * `server` - Public host or IP clients connect to
/// * `name` - Remark shown by clients, placed in the fragment
/// * `fingerprint` - uTLS fingerprint (`fp`), e.g. `chrome`
/// * `inbound` - Validated Reality inbound
/// * `public_key` - Public key derived from the inbound's private key
pub fn build_vless_link(
    server: &str,
    name: &str,
    fingerprint: &str,
    inbound: &RealityInbound,
    public_key: &str,
) -> String {
    let mut params = vec![
        ("type", inbound.network()),
        ("security", REALITY_SECURITY),
        ("sni", inbound.server_name()),
        ("fp", fingerprint),
        ("pbk", public_key),
        ("sid", inbound.short_id()),
    ];
    if let Some(flow) = inbound.flow() {
        params.push(("flow", flow));
    }

    format!(
        "{}://{}@{}:{}?{}#{}",
        VLESS_PROTOCOL,
        inbound.id(),
        server,
        inbound.port(),
        encode_query(params),
        url_encode(name)
    )
}
