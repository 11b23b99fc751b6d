//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use nukilatch_config::ConfigError;
use nukilatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    /// Reported by clap itself on bad arguments.
    #[allow(dead_code)]
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const REJECTED: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the bridge at {url}")]
    #[diagnostic(
        code(nukilatch::connection_failed),
        help(
            "Check that the bridge is powered, on the same network, and that the\n\
             HTTP API is enabled in the Nuki app (Manage Bridge > Bridge API)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Bridge answered with something unusable: {message}")]
    #[diagnostic(
        code(nukilatch::protocol),
        help("HTTP 401 means the token is wrong. Run with -vv to see each request.")
    )]
    Protocol { message: String },

    // ── Lock ─────────────────────────────────────────────────────────
    #[error("Bridge rejected {action}: {message}")]
    #[diagnostic(
        code(nukilatch::rejected),
        help("The lock may be busy or out of range of the bridge. Try again shortly.")
    )]
    Rejected { action: String, message: String },

    #[error("Lock {nuki_id} is not paired with this bridge")]
    #[diagnostic(
        code(nukilatch::not_found),
        help("Run: nukilatch devices to see the paired locks and their nukiId")
    )]
    NotFound { nuki_id: u64 },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration problem: {source}")]
    #[diagnostic(
        code(nukilatch::config),
        help(
            "Expected config at: {path}\n\
             Point --config at another file, or set NUKILATCH_BRIDGE__HOST,\n\
             NUKILATCH_BRIDGE__NUKI_ID and NUKILATCH_TOKEN."
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("Bridge setup failed: {message}")]
    #[diagnostic(code(nukilatch::setup))]
    Setup { message: String },

    #[error("Bridge stopped before the request completed")]
    #[diagnostic(code(nukilatch::stopped))]
    Stopped,

    #[error("Internal error: {message}")]
    #[diagnostic(code(nukilatch::internal))]
    Internal { message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(nukilatch::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Config { .. } | Self::Setup { .. } => exit_code::CONFIG,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            _ => exit_code::GENERAL,
        }
    }

    pub fn config(path: &std::path::Path, source: ConfigError) -> Self {
        Self::Config {
            path: path.display().to_string(),
            source,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Protocol { message, status: _ } => CliError::Protocol { message },

            CoreError::ActionRejected { action, message } => CliError::Rejected {
                action,
                message: message.unwrap_or_else(|| "no reason given".into()),
            },

            CoreError::UnrecognizedState { code } => CliError::Protocol {
                message: format!("unrecognized lock state {code}"),
            },

            CoreError::DeviceNotFound { nuki_id } => CliError::NotFound { nuki_id },

            CoreError::BridgeStopped => CliError::Stopped,

            CoreError::Config { message } => CliError::Setup { message },
        }
    }
}

impl From<nukilatch_core::ApiError> for CliError {
    fn from(err: nukilatch_core::ApiError) -> Self {
        CoreError::from(err).into()
    }
}
