use thiserror::Error;

/// Top-level error type for the `nukilatch-api` crate.
///
/// Splits failures into the two families the bridge can produce:
/// transport (the request never completed) and protocol (the bridge
/// answered with something we could not understand).
/// `nukilatch-core` maps these into its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or joining error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// The bridge answered with a non-success HTTP status.
    ///
    /// The bridge uses 401 for a bad token, 404 for an unknown device
    /// and 503 while it is busy.
    #[error("Bridge returned HTTP {status}")]
    Status { status: u16, body: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::InvalidUrl(_) | Self::Client(_))
    }

    /// Returns `true` if the bridge answered but the answer was unusable.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Deserialization { .. })
    }

    /// HTTP status code, if the bridge answered with one we rejected.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
