// ── Webhook receiver ──
//
// The bridge pushes state changes to one registered URL. Every request,
// whatever its method or path, is parsed as a snapshot and handed to the
// reconciler. The bridge never retries, so the answer is always an empty
// 200, including for bodies we could not parse.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::reconcile::StateReconciler;

/// Build the receiver. It has a single fallback route.
pub fn router(reconciler: Arc<StateReconciler>) -> Router {
    Router::new().fallback(receive).with_state(reconciler)
}

async fn receive(
    State(reconciler): State<Arc<StateReconciler>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> StatusCode {
    debug!(%method, path = uri.path(), bytes = body.len(), "callback received");

    match reconciler.reconcile_slice(&body) {
        Ok(report) => debug!(?report, "callback applied"),
        Err(e) => warn!(error = %e, "dropping callback"),
    }

    StatusCode::OK
}

/// Serve `router` on `listener` until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "webhook receiver listening");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
}
