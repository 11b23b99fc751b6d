// ── Domain model ──
//
// Accessory-facing values. Vendor-side types (lock codes, snapshots,
// devices) come from `nukilatch_api` and are re-exported here so
// consumers only depend on the core crate.

mod accessory;

pub use accessory::{
    AccessoryInformation, BatteryStatus, ChargingState, ContactState, LockSecurity, LockSurface,
    LowBattery,
};
pub use nukilatch_api::{Device, DoorSensorState, LockAction, LockSnapshot, LockState};
