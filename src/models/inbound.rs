//! Validated Reality inbound definitions

/// Required value of an inbound's `protocol` field
pub const VLESS_PROTOCOL: &str = "vless";
/// Required value of `streamSettings.security`
pub const REALITY_SECURITY: &str = "reality";

/// A VLESS inbound with Reality security, extracted and validated from an
/// Xray server config.
///
/// Values are immutable once extracted: construct one through
/// [`crate::parser::select_inbound`], or [`RealityInbound::new`] when the
/// fields are already known to be valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealityInbound {
    id: String,
    flow: Option<String>,
    port: u16,
    network: String,
    server_name: String,
    short_id: String,
    private_key: String,
}

impl RealityInbound {
    pub fn new(
        id: impl Into<String>,
        flow: Option<String>,
        port: u16,
        network: impl Into<String>,
        server_name: impl Into<String>,
        short_id: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        RealityInbound {
            id: id.into(),
            flow,
            port,
            network: network.into(),
            server_name: server_name.into(),
            short_id: short_id.into(),
            private_key: private_key.into(),
        }
    }

    /// Client UUID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Client flow, e.g. `xtls-rprx-vision`
    pub fn flow(&self) -> Option<&str> {
        self.flow.as_deref()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Transport network (`streamSettings.network`)
    pub fn network(&self) -> &str {
        &self.network
    }

    /// First entry of `realitySettings.serverNames`, used as SNI
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// First entry of `realitySettings.shortIds`, lowercased
    pub fn short_id(&self) -> &str {
        &self.short_id
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}
