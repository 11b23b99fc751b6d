// Device endpoints
//
// Discovery of paired devices via `/list`.

use tracing::debug;

use crate::client::BridgeClient;
use crate::error::Error;
use crate::models::Device;

impl BridgeClient {
    /// List all devices paired with the bridge, each with its last known state.
    ///
    /// `GET /list?token=...`
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        debug!("loading devices");
        let devices: Vec<Device> = self.get("list", &[]).await?;
        debug!(count = devices.len(), "devices loaded");
        Ok(devices)
    }

    /// Find a single device by its `nukiId`.
    ///
    /// Returns `None` if the bridge does not know the device.
    pub async fn find_device(&self, nuki_id: u64) -> Result<Option<Device>, Error> {
        let devices = self.list_devices().await?;
        Ok(devices.into_iter().find(|d| d.nuki_id == nuki_id))
    }
}
