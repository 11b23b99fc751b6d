// ── Action dispatch ──
//
// Host target-state writes become vendor lock actions. Surfaces only move
// after the bridge confirms; a rejected or failed action is logged and the
// surfaces stay at their last confirmed values. A queued write completes
// towards the host as soon as it is accepted, before the vendor answers,
// and never with an error.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use nukilatch_api::{ActionResponse, BridgeClient};

use crate::command::{Command, CommandEnvelope};
use crate::error::CoreError;
use crate::model::{LockAction, LockSecurity, LockState};
use crate::reconcile::StateReconciler;

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── Vendor seam ──────────────────────────────────────────────────────

/// The one vendor capability the dispatcher needs.
pub trait VendorActions: Send + Sync + 'static {
    fn lock_action(
        &self,
        nuki_id: u64,
        action: LockAction,
    ) -> impl Future<Output = Result<ActionResponse, nukilatch_api::Error>> + Send;
}

impl VendorActions for BridgeClient {
    fn lock_action(
        &self,
        nuki_id: u64,
        action: LockAction,
    ) -> impl Future<Output = Result<ActionResponse, nukilatch_api::Error>> + Send {
        BridgeClient::lock_action(self, nuki_id, action)
    }
}

// ── ActionDispatcher ─────────────────────────────────────────────────

/// Turns host writes into vendor actions for one device.
///
/// Cheaply cloneable. Writes can be issued directly through
/// [`set_lock_target_state`](Self::set_lock_target_state) and
/// [`set_latch_target_state`](Self::set_latch_target_state), or queued with
/// [`submit`](Self::submit) once [`start`](Self::start) has spawned the
/// command processor. Relatch timers always go through the queue.
pub struct ActionDispatcher<V: VendorActions = BridgeClient> {
    inner: Arc<DispatcherInner<V>>,
}

impl<V: VendorActions> Clone for ActionDispatcher<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DispatcherInner<V> {
    vendor: Arc<V>,
    nuki_id: u64,
    reconciler: Arc<StateReconciler>,
    relatch_delay: Duration,
    cancel: CancellationToken,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    pending_relatches: AtomicUsize,
}

impl<V: VendorActions> ActionDispatcher<V> {
    pub fn new(
        vendor: Arc<V>,
        nuki_id: u64,
        reconciler: Arc<StateReconciler>,
        relatch_delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        Self {
            inner: Arc::new(DispatcherInner {
                vendor,
                nuki_id,
                reconciler,
                relatch_delay,
                cancel,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                pending_relatches: AtomicUsize::new(0),
            }),
        }
    }

    /// Spawn the command processor. Returns `None` if it is already running.
    pub async fn start(&self) -> Option<JoinHandle<()>> {
        let rx = self.inner.command_rx.lock().await.take()?;
        Some(tokio::spawn(command_processor_task(self.clone(), rx)))
    }

    /// Queue a command and wait for the processor to accept it.
    ///
    /// Resolves once the vendor call has been started; the call and any
    /// confirmed surface update carry on in the background. Only fails when
    /// the processor is gone, vendor failures never surface here.
    pub async fn submit(&self, command: Command) -> Result<(), CoreError> {
        let (tx, rx) = oneshot::channel();

        self.inner
            .command_tx
            .send(CommandEnvelope {
                command,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::BridgeStopped)?;

        rx.await.map_err(|_| CoreError::BridgeStopped)
    }

    /// Run one command to completion on the current task.
    pub async fn execute(&self, command: Command) {
        debug!(%command, "dispatching");
        match command {
            Command::SetLockTarget(target) => self.set_lock_target_state(target).await,
            Command::SetLatchTarget(target) => self.set_latch_target_state(target).await,
        }
    }

    /// Host write to the lock surface's target state.
    pub async fn set_lock_target_state(&self, target: LockSecurity) {
        match target {
            LockSecurity::Secured => {
                if self.perform(LockAction::Lock).await {
                    self.inner.reconciler.apply_lock_state(LockState::Locked);
                }
            }
            LockSecurity::Unsecured => {
                if self.perform(LockAction::Unlock).await {
                    self.inner.reconciler.apply_lock_state(LockState::Unlocked);
                }
            }
            other => self.inner.reconciler.store().lock().set_target_state(other),
        }
    }

    /// Host write to the latch surface's target state.
    pub async fn set_latch_target_state(&self, target: LockSecurity) {
        if target == LockSecurity::Unsecured {
            if self.perform(LockAction::Unlatch).await {
                self.inner.reconciler.apply_lock_state(LockState::Unlatched);
                self.schedule_relatch();
            }
        } else {
            self.inner.reconciler.store().latch().set_target_state(target);
        }
    }

    /// Relatch timers that have been scheduled and not yet fired.
    pub fn pending_relatches(&self) -> usize {
        self.inner.pending_relatches.load(Ordering::Acquire)
    }

    /// Issue one vendor action. Returns `true` only on `{success: true}`.
    async fn perform(&self, action: LockAction) -> bool {
        let nuki_id = self.inner.nuki_id;
        match self.inner.vendor.lock_action(nuki_id, action).await {
            Ok(ActionResponse { success: true, .. }) => {
                info!(nuki_id, %action, "action confirmed by bridge");
                true
            }
            Ok(ActionResponse { message, .. }) => {
                let err = CoreError::ActionRejected {
                    action: action.to_string(),
                    message,
                };
                error!(nuki_id, error = %err, "surfaces left unchanged");
                false
            }
            Err(e) => {
                let err = CoreError::from(e);
                error!(nuki_id, %action, error = %err, "action failed");
                false
            }
        }
    }

    /// Schedule an independent relatch. Earlier timers are left running.
    ///
    /// The relatch only moves the latch target to Secured. The latch current
    /// state stays Unsecured until the bridge pushes its next snapshot.
    fn schedule_relatch(&self) {
        self.inner.pending_relatches.fetch_add(1, Ordering::AcqRel);
        let dispatcher = self.clone();
        let delay = self.inner.relatch_delay;
        let cancel = self.inner.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    dispatcher.inner.pending_relatches.fetch_sub(1, Ordering::AcqRel);
                    debug!("relatch cancelled by shutdown");
                }
                () = tokio::time::sleep(delay) => {
                    dispatcher.inner.pending_relatches.fetch_sub(1, Ordering::AcqRel);
                    debug!(delay_ms = delay.as_millis(), "relatching");
                    if let Err(e) = dispatcher.submit(Command::SetLatchTarget(LockSecurity::Secured)).await {
                        debug!(error = %e, "relatch dropped");
                    }
                }
            }
        });
    }
}

/// Drain the command channel. Each command runs on its own task so a
/// stalled vendor call never holds up the next write or its completion.
async fn command_processor_task<V: VendorActions>(
    dispatcher: ActionDispatcher<V>,
    mut rx: mpsc::Receiver<CommandEnvelope>,
) {
    let cancel = dispatcher.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(CommandEnvelope { command, response_tx }) = envelope else { break };
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move { dispatcher.execute(command).await });
                let _ = response_tx.send(());
            }
        }
    }
}
