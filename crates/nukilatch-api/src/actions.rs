// Lock action endpoints
//
// `/lockAction` with a fixed action code per operation. The bridge answers
// with `{success, message?}`; a `success: false` is returned to the caller
// as data, not as an error.

use tracing::debug;

use crate::client::BridgeClient;
use crate::error::Error;
use crate::models::{ActionResponse, LockAction};

impl BridgeClient {
    /// Issue a lock action.
    ///
    /// `GET /lockAction?token=...&nukiId=...&action=...`
    pub async fn lock_action(
        &self,
        nuki_id: u64,
        action: LockAction,
    ) -> Result<ActionResponse, Error> {
        debug!(nuki_id, %action, "issuing lock action");
        self.get(
            "lockAction",
            &[
                ("nukiId", nuki_id.to_string()),
                ("action", action.code().to_string()),
            ],
        )
        .await
    }

    /// Lock the device (action 2).
    pub async fn lock(&self, nuki_id: u64) -> Result<ActionResponse, Error> {
        self.lock_action(nuki_id, LockAction::Lock).await
    }

    /// Unlock the device without releasing the latch (action 1).
    pub async fn unlock(&self, nuki_id: u64) -> Result<ActionResponse, Error> {
        self.lock_action(nuki_id, LockAction::Unlock).await
    }

    /// Unlock and pull the latch (action 3).
    pub async fn unlatch(&self, nuki_id: u64) -> Result<ActionResponse, Error> {
        self.lock_action(nuki_id, LockAction::Unlatch).await
    }
}
