//! The long-running bridge service.
//!
//! Registers the callback, primes the surfaces, serves the webhook and logs
//! every surface change until ctrl-c.

use std::fmt::Debug;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use nukilatch_core::{Bridge, CallbackRegistration, StartupReport};

use crate::config::Loaded;
use crate::error::CliError;

pub async fn handle(loaded: &Loaded) -> Result<(), CliError> {
    let config = loaded.bridge_config()?;
    let listen = config.listen;
    let bridge = Bridge::new(config)?;

    let listener = TcpListener::bind(listen).await?;
    spawn_surface_loggers(&bridge);

    match bridge.start().await {
        Ok(report) => log_startup(&report),
        Err(e) => error!(error = %e, "startup discovery failed, surfaces stay unknown until a callback arrives"),
    }

    let mut server = tokio::spawn({
        let bridge = bridge.clone();
        async move { bridge.serve_webhook(listener).await }
    });

    tokio::select! {
        res = &mut server => {
            bridge.shutdown().await;
            return match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.into()),
                Err(e) => Err(CliError::Internal { message: e.to_string() }),
            };
        }
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "failed to listen for ctrl-c");
            }
            info!("shutting down");
        }
    }

    bridge.shutdown().await;
    match server.await {
        Ok(res) => res.map_err(CliError::from),
        Err(e) => Err(CliError::Internal {
            message: e.to_string(),
        }),
    }
}

fn log_startup(report: &StartupReport) {
    match &report.registration {
        Some(CallbackRegistration::Registered) => info!("callback registered"),
        Some(CallbackRegistration::AlreadyRegistered) => info!("callback already registered"),
        Some(other) => warn!(outcome = ?other, "callback not registered, state changes will not be pushed"),
        None => warn!("no callback URL configured, state changes will not be pushed"),
    }
    info!(
        nuki_id = report.device.nuki_id,
        name = %report.device.name,
        reconciliation = ?report.reconciliation,
        "bridge ready"
    );
}

// ── Surface loggers ─────────────────────────────────────────────────

/// Stand-in for the accessory host: log each service as it changes.
fn spawn_surface_loggers(bridge: &Bridge) {
    let store = bridge.store();
    let cancel = bridge.cancellation_token();

    tokio::spawn(log_changes(
        store.lock().name().to_owned(),
        store.lock().subscribe(),
        cancel.clone(),
    ));
    tokio::spawn(log_changes(
        store.latch().name().to_owned(),
        store.latch().subscribe(),
        cancel.clone(),
    ));
    tokio::spawn(log_changes(
        format!("{} Door", store.information().name),
        store.contact().subscribe(),
        cancel.clone(),
    ));
    tokio::spawn(log_changes(
        format!("{} Battery", store.information().name),
        store.battery().subscribe(),
        cancel,
    ));
}

async fn log_changes<T>(service: String, mut rx: watch::Receiver<T>, cancel: CancellationToken)
where
    T: Debug + Send + Sync + 'static,
{
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let value = format!("{:?}", *rx.borrow_and_update());
                info!(service = %service, value = %value, "surface changed");
            }
        }
    }
}
