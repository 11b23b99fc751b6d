// ── Core error types ──
//
// Errors surfaced to the binary and to host callbacks. Transport-layer
// failures from `nukilatch_api` are folded into two families: the request
// never completed (`Transport`) or the bridge answered with something
// unusable (`Protocol`).

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Bridge errors ────────────────────────────────────────────────
    #[error("Cannot reach bridge at {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Bridge protocol error: {message}")]
    Protocol {
        message: String,
        /// HTTP status code, if the bridge answered with one.
        status: Option<u16>,
    },

    #[error("Bridge rejected {action}: {}", message.as_deref().unwrap_or("no reason given"))]
    ActionRejected {
        action: String,
        message: Option<String>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unrecognized lock state code {code}")]
    UnrecognizedState { code: i64 },

    #[error("Device {nuki_id} is not paired with the bridge")]
    DeviceNotFound { nuki_id: u64 },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Bridge stopped")]
    BridgeStopped,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the bridge could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nukilatch_api::Error> for CoreError {
    fn from(err: nukilatch_api::Error) -> Self {
        match err {
            nukilatch_api::Error::Transport(e) => CoreError::Transport {
                url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.without_url().to_string(),
            },
            nukilatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            nukilatch_api::Error::Client(message) => CoreError::Config { message },
            nukilatch_api::Error::Status { status, body } => CoreError::Protocol {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
                status: Some(status),
            },
            nukilatch_api::Error::Deserialization { message, body: _ } => CoreError::Protocol {
                message: format!("Deserialization error: {message}"),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Protocol {
            message: format!("Malformed payload: {err}"),
            status: None,
        }
    }
}
