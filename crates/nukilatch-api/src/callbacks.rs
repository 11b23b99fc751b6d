// Callback endpoints
//
// The bridge pushes state changes to registered callback URLs. Registration
// is idempotent: the list is consulted first and `/callback/add` is only
// issued for a URL the bridge does not already know.

use tracing::{debug, error, info};

use crate::client::BridgeClient;
use crate::error::Error;
use crate::models::{ActionResponse, Callback, CallbackList, CallbackRegistration};

impl BridgeClient {
    /// List registered callbacks.
    ///
    /// `GET /callback/list?token=...`
    pub async fn list_callbacks(&self) -> Result<Vec<Callback>, Error> {
        debug!("loading callbacks");
        let list: CallbackList = self.get("callback/list", &[]).await?;
        Ok(list.callbacks)
    }

    /// Register a callback URL unconditionally.
    ///
    /// `GET /callback/add?token=...&url=...`
    pub async fn add_callback(&self, url: &str) -> Result<ActionResponse, Error> {
        debug!(url, "adding callback");
        self.get("callback/add", &[("url", url.to_owned())]).await
    }

    /// Ensure `url` is registered as a callback.
    ///
    /// Never fails: every outcome is logged and returned as a
    /// [`CallbackRegistration`].
    pub async fn register_webhook(&self, url: &str) -> CallbackRegistration {
        let callbacks = match self.list_callbacks().await {
            Ok(callbacks) => callbacks,
            Err(e) => {
                error!(url, error = %e, "failed to load callbacks");
                return CallbackRegistration::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if callbacks.iter().any(|c| c.url == url) {
            debug!(url, "callback already registered");
            return CallbackRegistration::AlreadyRegistered;
        }

        match self.add_callback(url).await {
            Ok(resp) if resp.success => {
                info!(url, "callback registered");
                CallbackRegistration::Registered
            }
            Ok(resp) => {
                error!(
                    url,
                    message = resp.message.as_deref().unwrap_or(""),
                    "callback registration rejected"
                );
                CallbackRegistration::Rejected {
                    message: resp.message,
                }
            }
            Err(e) => {
                error!(url, error = %e, "callback registration failed");
                CallbackRegistration::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
