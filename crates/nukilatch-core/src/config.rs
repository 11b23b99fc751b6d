// ── Runtime bridge configuration ──
//
// Describes *how* to reach one Nuki bridge and how to present its lock.
// Carries credential data and timing, but never touches disk. The binary
// builds a `BridgeConfig` from its config layers and hands it in.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default delay before the latch surface is returned to secured.
pub const DEFAULT_RELATCH_DELAY: Duration = Duration::from_millis(3000);

/// Default webhook listen address.
pub const DEFAULT_WEBHOOK_PORT: u16 = 8899;

/// Configuration for bridging a single lock.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Bridge base URL (e.g. `http://192.168.1.20:8080/`).
    pub bridge_url: Url,
    /// API token, sent as the `token` query parameter.
    pub token: SecretString,
    /// Device to bridge.
    pub nuki_id: u64,
    /// Display name used for the accessory and its services.
    pub name: String,
    /// URL the bridge should push state changes to. `None` skips
    /// callback registration.
    pub callback_url: Option<String>,
    /// Address the webhook receiver binds to.
    pub listen: SocketAddr,
    /// Delay between an unlatch and the latch surface snapping back.
    pub relatch_delay: Duration,
    /// Per-request timeout for bridge calls.
    pub timeout: Option<Duration>,
}

impl BridgeConfig {
    pub fn new(bridge_url: Url, token: SecretString, nuki_id: u64) -> Self {
        Self {
            bridge_url,
            token,
            nuki_id,
            name: "Nuki".into(),
            callback_url: None,
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_WEBHOOK_PORT)),
            relatch_delay: DEFAULT_RELATCH_DELAY,
            timeout: None,
        }
    }
}
