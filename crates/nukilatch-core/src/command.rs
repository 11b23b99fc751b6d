// ── Command API ──
//
// Host writes flow through the dispatcher's command channel as `Command`
// values. The processor answers each envelope once the vendor call has
// finished, whatever its outcome.

use crate::model::LockSecurity;

/// A command envelope sent through the command channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<()>,
}

/// Target-state writes the host can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Write to the lock surface's target state.
    SetLockTarget(LockSecurity),
    /// Write to the latch surface's target state.
    SetLatchTarget(LockSecurity),
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetLockTarget(target) => write!(f, "lock target -> {target}"),
            Self::SetLatchTarget(target) => write!(f, "latch target -> {target}"),
        }
    }
}
