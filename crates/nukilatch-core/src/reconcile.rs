// ── State reconciliation ──
//
// Maps vendor snapshots onto the accessory surfaces. The lock state and
// door sensor axes are applied independently and only when present, so a
// partial callback never clobbers the other. The battery flags are read on
// every snapshot, an absent flag meaning "not set"; only the charge level
// is applied conditionally.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{
    BatteryStatus, ChargingState, ContactState, DoorSensorState, LockSecurity, LockSnapshot,
    LockState, LowBattery,
};
use crate::store::AccessoryStore;

/// What happened to the lock axis of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "code")]
pub enum LockAxis {
    /// The snapshot carried no `state`.
    Absent,
    /// A recognized state was mapped onto both surfaces.
    Applied(LockState),
    /// The code is outside the mapping table; surfaces were left alone.
    Unrecognized(i64),
}

/// Summary of one reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub lock: LockAxis,
    /// Contact reading applied, if the door sensor reported a known state.
    pub contact: Option<ContactState>,
    /// Battery service values after the pass.
    pub battery: BatteryStatus,
}

/// Applies vendor snapshots to an [`AccessoryStore`].
pub struct StateReconciler {
    store: Arc<AccessoryStore>,
    unknown: AtomicBool,
}

impl StateReconciler {
    pub fn new(store: Arc<AccessoryStore>) -> Self {
        Self {
            store,
            unknown: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<AccessoryStore> {
        &self.store
    }

    /// `true` after the last lock state seen was outside the mapping table.
    pub fn is_state_unknown(&self) -> bool {
        self.unknown.load(Ordering::Acquire)
    }

    /// Apply every axis present in `snapshot`.
    pub fn reconcile(&self, snapshot: &LockSnapshot) -> Reconciliation {
        let lock = match snapshot.state {
            Some(state) => self.apply_lock_state(state),
            None => LockAxis::Absent,
        };

        let contact = snapshot
            .door_sensor_state
            .and_then(|door| self.apply_door_state(door));

        let battery = self.apply_battery(snapshot);

        debug!(?lock, ?contact, ?battery, "reconciled snapshot");
        Reconciliation {
            lock,
            contact,
            battery,
        }
    }

    /// Parse a raw pushed payload and reconcile it.
    pub fn reconcile_slice(&self, body: &[u8]) -> Result<Reconciliation, CoreError> {
        let snapshot = LockSnapshot::from_slice(body)?;
        Ok(self.reconcile(&snapshot))
    }

    /// Map a lock state onto the lock and latch surfaces.
    ///
    /// | state      | lock      | latch     |
    /// |------------|-----------|-----------|
    /// | locked     | secured   | secured   |
    /// | unlocked   | unsecured | secured   |
    /// | unlatched  | unsecured | unsecured |
    /// | jammed     | jammed    | jammed    |
    ///
    /// Both target and current are set, so the host never shows the
    /// mechanism as moving after a snapshot.
    pub fn apply_lock_state(&self, state: LockState) -> LockAxis {
        let (lock, latch) = match state {
            LockState::Locked => (LockSecurity::Secured, LockSecurity::Secured),
            LockState::Unlocked => (LockSecurity::Unsecured, LockSecurity::Secured),
            LockState::Unlatched => (LockSecurity::Unsecured, LockSecurity::Unsecured),
            LockState::Jammed => (LockSecurity::Jammed, LockSecurity::Jammed),
            LockState::Other(code) => {
                let err = CoreError::UnrecognizedState { code };
                warn!(error = %err, "leaving lock surfaces unchanged");
                self.unknown.store(true, Ordering::Release);
                return LockAxis::Unrecognized(code);
            }
        };

        self.store.lock().settle(lock);
        self.store.latch().settle(latch);
        self.unknown.store(false, Ordering::Release);
        LockAxis::Applied(state)
    }

    fn apply_door_state(&self, door: DoorSensorState) -> Option<ContactState> {
        let contact = match door {
            DoorSensorState::Closed => ContactState::Detected,
            DoorSensorState::Opened => ContactState::NotDetected,
            DoorSensorState::Other(code) => {
                debug!(code, "ignoring door sensor state");
                return None;
            }
        };
        self.store.contact().set_contact_state(contact);
        Some(contact)
    }

    fn apply_battery(&self, snapshot: &LockSnapshot) -> BatteryStatus {
        let battery = self.store.battery();

        battery.set_low_battery(if snapshot.battery_critical == Some(true) {
            LowBattery::Low
        } else {
            LowBattery::Normal
        });
        battery.set_charging_state(if snapshot.battery_charging == Some(true) {
            ChargingState::Charging
        } else {
            ChargingState::NotCharging
        });
        if let Some(level) = snapshot.battery_charge_state {
            battery.set_level(level);
        }

        battery.status()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::LockSurface;

    fn reconciler() -> StateReconciler {
        StateReconciler::new(Arc::new(AccessoryStore::new("Front Door")))
    }

    fn surfaces(r: &StateReconciler) -> (LockSurface, LockSurface) {
        (r.store().lock().surface(), r.store().latch().surface())
    }

    #[test]
    fn lock_state_table() {
        use LockSecurity::{Jammed, Secured, Unsecured};

        let cases = [
            (LockState::Locked, Secured, Secured),
            (LockState::Unlocked, Unsecured, Secured),
            (LockState::Unlatched, Unsecured, Unsecured),
            (LockState::Jammed, Jammed, Jammed),
        ];

        let r = reconciler();
        for (state, lock, latch) in cases {
            assert_eq!(r.apply_lock_state(state), LockAxis::Applied(state));
            assert_eq!(
                surfaces(&r),
                (LockSurface::settled(lock), LockSurface::settled(latch)),
                "state {state:?}"
            );
            assert!(!r.is_state_unknown());
        }
    }

    #[test]
    fn unrecognized_state_leaves_surfaces_and_sets_marker() {
        let r = reconciler();
        r.apply_lock_state(LockState::Unlocked);
        let before = surfaces(&r);

        assert_eq!(r.apply_lock_state(LockState::Other(7)), LockAxis::Unrecognized(7));
        assert_eq!(surfaces(&r), before);
        assert!(r.is_state_unknown());

        r.apply_lock_state(LockState::Locked);
        assert!(!r.is_state_unknown());
    }

    #[test]
    fn full_payload() {
        let r = reconciler();
        let report = r
            .reconcile_slice(
                br#"{"state":1,"doorsensorState":2,"batteryCritical":false,"batteryCharging":true,"batteryChargeState":80}"#,
            )
            .unwrap();

        assert_eq!(
            report,
            Reconciliation {
                lock: LockAxis::Applied(LockState::Locked),
                contact: Some(ContactState::Detected),
                battery: BatteryStatus {
                    low_battery: LowBattery::Normal,
                    charging: ChargingState::Charging,
                    level: Some(80),
                },
            }
        );
        assert_eq!(
            surfaces(&r),
            (
                LockSurface::settled(LockSecurity::Secured),
                LockSurface::settled(LockSecurity::Secured)
            )
        );
        assert_eq!(
            r.store().battery().status(),
            BatteryStatus {
                low_battery: LowBattery::Normal,
                charging: ChargingState::Charging,
                level: Some(80),
            }
        );
    }

    #[test]
    fn door_only_payload_leaves_lock_surfaces() {
        let r = reconciler();
        r.apply_lock_state(LockState::Unlatched);
        let before = surfaces(&r);

        let report = r.reconcile_slice(br#"{"doorsensorState":3}"#).unwrap();

        assert_eq!(report.lock, LockAxis::Absent);
        assert_eq!(report.contact, Some(ContactState::NotDetected));
        assert_eq!(report.battery, BatteryStatus::default());
        assert_eq!(surfaces(&r), before);
    }

    #[test]
    fn missing_battery_flags_reset_to_normal() {
        let r = reconciler();
        r.reconcile_slice(br#"{"state":1,"batteryCritical":true,"batteryCharging":true,"batteryChargeState":9}"#)
            .unwrap();
        assert_eq!(r.store().battery().status().low_battery, LowBattery::Low);

        let report = r.reconcile_slice(br#"{"state":3}"#).unwrap();

        let expected = BatteryStatus {
            low_battery: LowBattery::Normal,
            charging: ChargingState::NotCharging,
            level: Some(9),
        };
        assert_eq!(report.battery, expected);
        assert_eq!(r.store().battery().status(), expected);
    }

    #[test]
    fn wrapped_payload() {
        let r = reconciler();
        r.reconcile_slice(br#"{"nukiId":1,"lastKnownState":{"state":3,"batteryCritical":true}}"#)
            .unwrap();

        assert_eq!(r.store().lock().current_state(), LockSecurity::Unsecured);
        assert_eq!(r.store().latch().current_state(), LockSecurity::Secured);
        assert_eq!(r.store().battery().status().low_battery, LowBattery::Low);
    }

    #[test]
    fn unknown_door_code_is_ignored() {
        let r = reconciler();
        let report = r.reconcile_slice(br#"{"doorsensorState":4}"#).unwrap();
        assert_eq!(report.contact, None);
        assert_eq!(r.store().contact().contact_state(), None);
    }

    #[test]
    fn malformed_payload_is_protocol_error() {
        let r = reconciler();
        let err = r.reconcile_slice(b"{not json").unwrap_err();
        assert!(matches!(err, CoreError::Protocol { .. }));
        assert_eq!(r.store().lock().surface(), LockSurface::default());
    }
}
