use log::{debug, info};
use serde_json::Value;

use super::format::{validate_key, validate_port, validate_short_id, validate_uuid};
use super::schema::{
    expect_int, expect_non_empty_array, expect_object, expect_str, FieldPath, SchemaError,
};
use super::ExtractError;
use crate::models::{RealityInbound, REALITY_SECURITY, VLESS_PROTOCOL};

/// Pick the Reality inbound to share from a parsed server config.
///
/// With `index` set, only that inbound is considered and any problem with it
/// is returned as-is. Without it, inbounds are tried in order and the first
/// valid one wins; if none is valid the last rejection is reported inside
/// [`ExtractError::NoMatch`].
pub fn select_inbound(
    document: &Value,
    index: Option<usize>,
) -> Result<RealityInbound, ExtractError> {
    expect_object(document, &FieldPath::root("root"))?;
    let inbounds = expect_non_empty_array(&document["inbounds"], &FieldPath::root("inbounds"))?;

    if let Some(index) = index {
        let candidate = inbounds.get(index).ok_or(ExtractError::IndexOutOfRange {
            index,
            len: inbounds.len(),
        })?;
        let inbound = parse_inbound(index, candidate)?;
        info!("Using inbound {} (port {})", index, inbound.port());
        return Ok(inbound);
    }

    // Replaced by the first rejection; inbounds is known to be non-empty.
    let mut last_err = ExtractError::Schema(SchemaError::Empty {
        path: "inbounds".to_string(),
    });
    for (idx, candidate) in inbounds.iter().enumerate() {
        match parse_inbound(idx, candidate) {
            Ok(inbound) => {
                info!("Selected inbound {} (port {})", idx, inbound.port());
                return Ok(inbound);
            }
            Err(e) => {
                debug!("Skipping inbound {}: {}", idx, e);
                last_err = e;
            }
        }
    }

    Err(ExtractError::NoMatch {
        last: Box::new(last_err),
    })
}

/// Validate a single `inbounds[idx]` entry.
pub fn parse_inbound(idx: usize, candidate: &Value) -> Result<RealityInbound, ExtractError> {
    let base = FieldPath::root("inbounds").index(idx);
    expect_object(candidate, &base)?;

    let protocol = &candidate["protocol"];
    if protocol.as_str() != Some(VLESS_PROTOCOL) {
        return Err(ExtractError::ProtocolMismatch {
            path: base.key("protocol").to_string(),
            expected: VLESS_PROTOCOL,
            found: protocol.to_string(),
        });
    }

    let port_path = base.key("port");
    let port = validate_port(expect_int(&candidate["port"], &port_path)?, port_path.as_str())?;

    let settings_path = base.key("settings");
    let settings = &candidate["settings"];
    expect_object(settings, &settings_path)?;
    let clients_path = settings_path.key("clients");
    let clients = expect_non_empty_array(&settings["clients"], &clients_path)?;
    let client_path = clients_path.index(0);
    let client = &clients[0];
    expect_object(client, &client_path)?;
    let id_path = client_path.key("id");
    let id = expect_str(&client["id"], &id_path)?;
    let flow = match &client["flow"] {
        Value::Null => None,
        flow => Some(expect_str(flow, &client_path.key("flow"))?.to_string()),
    };

    let stream_path = base.key("streamSettings");
    let stream = &candidate["streamSettings"];
    expect_object(stream, &stream_path)?;
    let network = expect_str(&stream["network"], &stream_path.key("network"))?;
    let security_path = stream_path.key("security");
    let security = expect_str(&stream["security"], &security_path)?;
    if security != REALITY_SECURITY {
        return Err(ExtractError::ProtocolMismatch {
            path: security_path.to_string(),
            expected: REALITY_SECURITY,
            found: format!("{:?}", security),
        });
    }

    let reality_path = stream_path.key("realitySettings");
    let reality = &stream["realitySettings"];
    expect_object(reality, &reality_path)?;

    let names_path = reality_path.key("serverNames");
    let server_names = expect_non_empty_array(&reality["serverNames"], &names_path)?;
    let server_name = expect_str(&server_names[0], &names_path.index(0))?;

    let sids_path = reality_path.key("shortIds");
    let short_ids = expect_non_empty_array(&reality["shortIds"], &sids_path)?;
    let sid_path = sids_path.index(0);
    let short_id = validate_short_id(expect_str(&short_ids[0], &sid_path)?, sid_path.as_str())?;

    let key_path = reality_path.key("privateKey");
    let private_key = expect_str(&reality["privateKey"], &key_path)?;
    validate_key("privateKey", private_key, key_path.as_str())?;

    validate_uuid(id, id_path.as_str())?;

    Ok(RealityInbound::new(
        id,
        flow,
        port,
        network,
        server_name,
        short_id,
        private_key,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FormatError;
    use serde_json::json;

    const UUID: &str = "11111111-1111-1111-1111-111111111111";

    fn reality_inbound(port: u16, short_id: &str) -> Value {
        json!({
            "protocol": "vless",
            "port": port,
            "settings": {"clients": [{"id": UUID}]},
            "streamSettings": {
                "network": "tcp",
                "security": "reality",
                "realitySettings": {
                    "serverNames": ["example.com"],
                    "shortIds": [short_id],
                    "privateKey": "a".repeat(32)
                }
            }
        })
    }

    #[test]
    fn test_parse_valid_inbound() {
        let inbound = parse_inbound(0, &reality_inbound(443, "AB12")).unwrap();
        assert_eq!(inbound.id(), UUID);
        assert_eq!(inbound.flow(), None);
        assert_eq!(inbound.port(), 443);
        assert_eq!(inbound.network(), "tcp");
        assert_eq!(inbound.server_name(), "example.com");
        assert_eq!(inbound.short_id(), "ab12");
        assert_eq!(inbound.private_key(), "a".repeat(32));
    }

    #[test]
    fn test_flow_is_read_when_present() {
        let mut candidate = reality_inbound(443, "ab12");
        candidate["settings"]["clients"][0]["flow"] = json!("xtls-rprx-vision");
        let inbound = parse_inbound(0, &candidate).unwrap();
        assert_eq!(inbound.flow(), Some("xtls-rprx-vision"));

        candidate["settings"]["clients"][0]["flow"] = json!("");
        let err = parse_inbound(0, &candidate).unwrap_err();
        assert!(err
            .to_string()
            .contains("inbounds[0].settings.clients[0].flow"));
    }

    #[test]
    fn test_protocol_mismatch() {
        let mut candidate = reality_inbound(443, "ab12");
        candidate["protocol"] = json!("vmess");
        let err = parse_inbound(3, &candidate).unwrap_err();
        assert_eq!(
            err.to_string(),
            "inbounds[3].protocol is not vless: \"vmess\""
        );
    }

    #[test]
    fn test_security_mismatch() {
        let mut candidate = reality_inbound(443, "ab12");
        candidate["streamSettings"]["security"] = json!("tls");
        let err = parse_inbound(0, &candidate).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::ProtocolMismatch { expected: "reality", .. }
        ));
    }

    #[test]
    fn test_port_must_be_integer_in_range() {
        let mut candidate = reality_inbound(443, "ab12");
        candidate["port"] = json!(true);
        assert!(matches!(
            parse_inbound(0, &candidate),
            Err(ExtractError::Schema(SchemaError::Mismatch { found: "boolean", .. }))
        ));

        candidate["port"] = json!(70000);
        assert!(matches!(
            parse_inbound(0, &candidate),
            Err(ExtractError::Format(FormatError { field: "port", .. }))
        ));
    }

    #[test]
    fn test_odd_short_id_names_field() {
        let err = parse_inbound(0, &reality_inbound(443, "ab1")).unwrap_err();
        match err {
            ExtractError::Format(e) => {
                assert_eq!(e.field, "shortId");
                assert_eq!(
                    e.path,
                    "inbounds[0].streamSettings.realitySettings.shortIds[0]"
                );
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_lists_are_rejected() {
        let mut candidate = reality_inbound(443, "ab12");
        candidate["streamSettings"]["realitySettings"]["serverNames"] = json!([]);
        let err = parse_inbound(0, &candidate).unwrap_err();
        assert_eq!(
            err.to_string(),
            "inbounds[0].streamSettings.realitySettings.serverNames is empty"
        );

        let mut candidate = reality_inbound(443, "ab12");
        candidate["settings"]["clients"] = json!([]);
        assert!(matches!(
            parse_inbound(0, &candidate),
            Err(ExtractError::Schema(SchemaError::Empty { .. }))
        ));
    }

    #[test]
    fn test_bad_uuid() {
        let mut candidate = reality_inbound(443, "ab12");
        candidate["settings"]["clients"][0]["id"] = json!("not-a-uuid");
        assert!(matches!(
            parse_inbound(0, &candidate),
            Err(ExtractError::Format(FormatError { field: "id", .. }))
        ));
    }

    #[test]
    fn test_fallback_skips_invalid_candidates() {
        let mut first = reality_inbound(80, "ab12");
        first["protocol"] = json!("vmess");
        let doc = json!({"inbounds": [first, reality_inbound(8443, "cd34")]});
        let inbound = select_inbound(&doc, None).unwrap();
        assert_eq!(inbound.port(), 8443);
        assert_eq!(inbound.short_id(), "cd34");
    }

    #[test]
    fn test_fallback_skips_format_and_schema_failures() {
        let doc = json!({"inbounds": [reality_inbound(443, "ab1"), reality_inbound(8443, "cd34")]});
        assert_eq!(select_inbound(&doc, None).unwrap().port(), 8443);

        let mut bad_id = reality_inbound(443, "ab12");
        bad_id["settings"]["clients"][0]["id"] = json!("not-a-uuid");
        let mut no_clients = reality_inbound(444, "ab12");
        no_clients["settings"]["clients"] = json!([]);
        let doc = json!({"inbounds": [bad_id, no_clients, reality_inbound(8443, "cd34")]});
        let inbound = select_inbound(&doc, None).unwrap();
        assert_eq!(inbound.port(), 8443);
        assert_eq!(inbound.short_id(), "cd34");
    }

    #[test]
    fn test_port_above_i64_is_out_of_range() {
        let mut candidate = reality_inbound(443, "ab12");
        candidate["port"] = json!(u64::MAX);
        let err = parse_inbound(0, &candidate).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid port at inbounds[0].port: out of range 1..=65535, got: 18446744073709551615"
        );
    }

    #[test]
    fn test_explicit_index_does_not_fall_back() {
        let doc = json!({"inbounds": [reality_inbound(443, "ab1"), reality_inbound(8443, "cd34")]});
        assert!(matches!(
            select_inbound(&doc, Some(0)),
            Err(ExtractError::Format(FormatError { field: "shortId", .. }))
        ));
        assert_eq!(select_inbound(&doc, Some(1)).unwrap().port(), 8443);
    }

    #[test]
    fn test_explicit_index_out_of_range() {
        let doc = json!({"inbounds": [reality_inbound(443, "ab12"), reality_inbound(8443, "cd34")]});
        let err = select_inbound(&doc, Some(2)).unwrap_err();
        assert_eq!(err.to_string(), "Inbound index 2 is out of range (0..=1)");
    }

    #[test]
    fn test_no_match_reports_last_error() {
        let mut first = reality_inbound(443, "ab12");
        first["protocol"] = json!("trojan");
        let mut second = reality_inbound(443, "ab12");
        second["streamSettings"]["security"] = json!("tls");
        let doc = json!({"inbounds": [first, second]});

        let err = select_inbound(&doc, None).unwrap_err();
        match &err {
            ExtractError::NoMatch { last } => {
                assert!(matches!(**last, ExtractError::ProtocolMismatch { .. }));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(err
            .to_string()
            .contains("Last error: inbounds[1].streamSettings.security is not reality"));
    }

    #[test]
    fn test_document_shape() {
        assert!(matches!(
            select_inbound(&json!([]), None),
            Err(ExtractError::Schema(SchemaError::Mismatch { .. }))
        ));
        assert!(matches!(
            select_inbound(&json!({"inbounds": []}), None),
            Err(ExtractError::Schema(SchemaError::Empty { .. }))
        ));
        assert!(matches!(
            select_inbound(&json!({}), None),
            Err(ExtractError::Schema(SchemaError::Mismatch { found: "null", .. }))
        ));
    }
}
