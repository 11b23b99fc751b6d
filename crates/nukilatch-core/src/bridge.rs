// ── Bridge context ──
//
// Owns everything one bridged lock needs: the vendor client, the accessory
// store, the reconciler, the dispatcher and the shared shutdown token. The
// webhook receiver and the dispatcher both get their collaborators from
// here instead of from process-wide state.

use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use nukilatch_api::{BridgeClient, CallbackRegistration, TransportConfig};

use crate::command::Command;
use crate::config::BridgeConfig;
use crate::dispatch::ActionDispatcher;
use crate::error::CoreError;
use crate::model::{Device, LockSecurity};
use crate::reconcile::{Reconciliation, StateReconciler};
use crate::store::AccessoryStore;
use crate::webhook;

/// What [`Bridge::start`] did.
#[derive(Debug, Clone, Serialize)]
pub struct StartupReport {
    /// `None` when no callback URL is configured.
    #[serde(skip)]
    pub registration: Option<CallbackRegistration>,
    pub device: Device,
    /// `None` when the bridge had no last known state for the device.
    pub reconciliation: Option<Reconciliation>,
}

/// The main entry point for the binary.
///
/// Cheaply cloneable via `Arc<BridgeInner>`.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    config: BridgeConfig,
    client: Arc<BridgeClient>,
    store: Arc<AccessoryStore>,
    reconciler: Arc<StateReconciler>,
    dispatcher: ActionDispatcher,
    cancel: CancellationToken,
    device: OnceLock<Device>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Bridge {
    /// Build a bridge and its HTTP client from configuration. Does not
    /// touch the network; call [`start()`](Self::start) for that.
    pub fn new(config: BridgeConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = BridgeClient::new(config.bridge_url.clone(), config.token.clone(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Build a bridge around an existing client.
    pub fn with_client(config: BridgeConfig, client: BridgeClient) -> Self {
        let client = Arc::new(client);
        let store = Arc::new(AccessoryStore::new(&config.name));
        let reconciler = Arc::new(StateReconciler::new(Arc::clone(&store)));
        let cancel = CancellationToken::new();
        let dispatcher = ActionDispatcher::new(
            Arc::clone(&client),
            config.nuki_id,
            Arc::clone(&reconciler),
            config.relatch_delay,
            cancel.clone(),
        );

        Self {
            inner: Arc::new(BridgeInner {
                config,
                client,
                store,
                reconciler,
                dispatcher,
                cancel,
                device: OnceLock::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &Arc<BridgeClient> {
        &self.inner.client
    }

    pub fn store(&self) -> &Arc<AccessoryStore> {
        &self.inner.store
    }

    pub fn reconciler(&self) -> &Arc<StateReconciler> {
        &self.inner.reconciler
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.inner.dispatcher
    }

    /// The device discovered at startup, once [`start()`](Self::start) has run.
    pub fn device(&self) -> Option<&Device> {
        self.inner.device.get()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Register the callback URL, discover the device and prime the
    /// surfaces from its last known state. Spawns the command processor.
    ///
    /// Registration failures are reported in the result, not returned as
    /// errors. Discovery failures are returned; the dispatcher is already
    /// running by then.
    pub async fn start(&self) -> Result<StartupReport, CoreError> {
        if let Some(handle) = self.inner.dispatcher.start().await {
            self.inner.task_handles.lock().await.push(handle);
        }

        let registration = match &self.inner.config.callback_url {
            Some(url) => Some(self.inner.client.register_webhook(url).await),
            None => {
                debug!("no callback URL configured, skipping registration");
                None
            }
        };

        let nuki_id = self.inner.config.nuki_id;
        let device = self
            .inner
            .client
            .find_device(nuki_id)
            .await?
            .ok_or(CoreError::DeviceNotFound { nuki_id })?;
        info!(nuki_id, name = %device.name, "discovered device");

        let reconciliation = match &device.last_known_state {
            Some(snapshot) => Some(self.inner.reconciler.reconcile(snapshot)),
            None => {
                warn!(nuki_id, "bridge has no last known state, surfaces stay unknown");
                None
            }
        };

        let _ = self.inner.device.set(device.clone());

        Ok(StartupReport {
            registration,
            device,
            reconciliation,
        })
    }

    /// The webhook router, bound to this bridge's reconciler.
    pub fn webhook_router(&self) -> axum::Router {
        webhook::router(Arc::clone(&self.inner.reconciler))
    }

    /// Serve the webhook receiver until [`shutdown()`](Self::shutdown).
    pub async fn serve_webhook(&self, listener: TcpListener) -> std::io::Result<()> {
        webhook::serve(listener, self.webhook_router(), self.inner.cancel.clone()).await
    }

    /// Cancel background tasks and pending relatch timers, then wait for
    /// the command processor to exit.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("bridge stopped");
    }

    /// Token cancelled by [`shutdown()`](Self::shutdown).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    // ── Host writes ──────────────────────────────────────────────────

    /// Queue a command. Resolves once it is accepted, before the bridge
    /// answers.
    pub async fn submit(&self, command: Command) -> Result<(), CoreError> {
        self.inner.dispatcher.submit(command).await
    }

    /// Host write to the lock target state.
    pub async fn set_lock_target_state(&self, target: LockSecurity) -> Result<(), CoreError> {
        self.submit(Command::SetLockTarget(target)).await
    }

    /// Host write to the latch target state.
    pub async fn set_latch_target_state(&self, target: LockSecurity) -> Result<(), CoreError> {
        self.submit(Command::SetLatchTarget(target)).await
    }
}
