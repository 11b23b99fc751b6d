// ── Accessory store ──
//
// Holds the live accessory surfaces. Every service is a `watch` cell, so
// the host (or anything else) can subscribe to changes instead of polling.

mod services;

pub use services::{BatteryService, ContactSensorService, LockService};

use serde::Serialize;

use crate::model::{AccessoryInformation, BatteryStatus, ContactState, LockSurface};

/// The services a single lock exposes to the host.
///
/// `lock` tracks the bolt, `latch` tracks the door latch. Both start in
/// [`LockSecurity::Unknown`](crate::model::LockSecurity::Unknown) until the
/// first snapshot arrives.
pub struct AccessoryStore {
    information: AccessoryInformation,
    lock: LockService,
    latch: LockService,
    contact: ContactSensorService,
    battery: BatteryService,
}

/// Point-in-time copy of every surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorySnapshot {
    pub information: AccessoryInformation,
    pub lock: LockSurface,
    pub latch: LockSurface,
    pub contact: Option<ContactState>,
    pub battery: BatteryStatus,
}

impl AccessoryStore {
    pub fn new(name: &str) -> Self {
        Self {
            information: AccessoryInformation::new(name),
            lock: LockService::new(format!("{name} Lock")),
            latch: LockService::new(format!("{name} Latch")),
            contact: ContactSensorService::new(),
            battery: BatteryService::new(),
        }
    }

    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    pub fn lock(&self) -> &LockService {
        &self.lock
    }

    pub fn latch(&self) -> &LockService {
        &self.latch
    }

    pub fn contact(&self) -> &ContactSensorService {
        &self.contact
    }

    pub fn battery(&self) -> &BatteryService {
        &self.battery
    }

    pub fn snapshot(&self) -> AccessorySnapshot {
        AccessorySnapshot {
            information: self.information.clone(),
            lock: self.lock.surface(),
            latch: self.latch.surface(),
            contact: self.contact.contact_state(),
            battery: self.battery.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LockSecurity;

    #[test]
    fn new_store_is_unknown() {
        let store = AccessoryStore::new("Front Door");
        let snapshot = store.snapshot();

        assert_eq!(snapshot.information.name, "Front Door");
        assert_eq!(snapshot.lock, LockSurface::settled(LockSecurity::Unknown));
        assert_eq!(snapshot.latch, LockSurface::settled(LockSecurity::Unknown));
        assert_eq!(snapshot.contact, None);
        assert_eq!(snapshot.battery, BatteryStatus::default());
        assert_eq!(store.lock().name(), "Front Door Lock");
        assert_eq!(store.latch().name(), "Front Door Latch");
    }
}
