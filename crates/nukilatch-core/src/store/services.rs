// ── Accessory services ──
//
// One watch-backed cell per service. Setters only notify subscribers when
// the value actually changes, so a repeated snapshot does not wake the host.

use tokio::sync::watch;

use crate::model::{BatteryStatus, ChargingState, ContactState, LockSecurity, LockSurface, LowBattery};

/// A lock mechanism service: the bolt or the latch.
pub struct LockService {
    name: String,
    state: watch::Sender<LockSurface>,
}

impl LockService {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        let (state, _) = watch::channel(LockSurface::default());
        Self {
            name: name.into(),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_target_state(&self, target: LockSecurity) {
        self.state.send_if_modified(|surface| {
            let changed = surface.target != target;
            surface.target = target;
            changed
        });
    }

    pub fn set_current_state(&self, current: LockSecurity) {
        self.state.send_if_modified(|surface| {
            let changed = surface.current != current;
            surface.current = current;
            changed
        });
    }

    /// Set target and current together in a single notification.
    pub fn settle(&self, state: LockSecurity) {
        let settled = LockSurface::settled(state);
        self.state.send_if_modified(|surface| {
            let changed = *surface != settled;
            *surface = settled;
            changed
        });
    }

    pub fn surface(&self) -> LockSurface {
        *self.state.borrow()
    }

    pub fn target_state(&self) -> LockSecurity {
        self.state.borrow().target
    }

    pub fn current_state(&self) -> LockSecurity {
        self.state.borrow().current
    }

    pub fn subscribe(&self) -> watch::Receiver<LockSurface> {
        self.state.subscribe()
    }
}

/// Door contact sensor. Holds `None` until the first door-sensor reading.
pub struct ContactSensorService {
    state: watch::Sender<Option<ContactState>>,
}

impl ContactSensorService {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    pub fn set_contact_state(&self, contact: ContactState) {
        self.state.send_if_modified(|current| {
            let changed = *current != Some(contact);
            *current = Some(contact);
            changed
        });
    }

    pub fn contact_state(&self) -> Option<ContactState> {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ContactState>> {
        self.state.subscribe()
    }
}

/// Battery service.
pub struct BatteryService {
    state: watch::Sender<BatteryStatus>,
}

impl BatteryService {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(BatteryStatus::default());
        Self { state }
    }

    pub fn set_low_battery(&self, low_battery: LowBattery) {
        self.state.send_if_modified(|status| {
            let changed = status.low_battery != low_battery;
            status.low_battery = low_battery;
            changed
        });
    }

    pub fn set_charging_state(&self, charging: ChargingState) {
        self.state.send_if_modified(|status| {
            let changed = status.charging != charging;
            status.charging = charging;
            changed
        });
    }

    pub fn set_level(&self, level: u8) {
        self.state.send_if_modified(|status| {
            let changed = status.level != Some(level);
            status.level = Some(level);
            changed
        });
    }

    pub fn status(&self) -> BatteryStatus {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<BatteryStatus> {
        self.state.subscribe()
    }
}
