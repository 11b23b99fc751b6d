//! Accessory-side logic for a Nuki bridge.
//!
//! Sits between `nukilatch-api` and the home-automation host:
//!
//! - **[`Bridge`]**: One context per bridged lock. [`start()`](Bridge::start)
//!   registers the callback URL, discovers the device and primes the
//!   surfaces; [`serve_webhook()`](Bridge::serve_webhook) runs the receiver.
//!
//! - **[`AccessoryStore`]**: The lock, latch, contact sensor and battery
//!   services, each a `tokio::sync::watch` cell the host can subscribe to.
//!
//! - **[`StateReconciler`]**: Maps vendor snapshots onto the surfaces, one
//!   independent axis at a time.
//!
//! - **[`ActionDispatcher`]**: Turns target-state writes into vendor lock
//!   actions, updates surfaces only on confirmation and re-latches after an
//!   unlatch.

pub mod bridge;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod store;
pub mod webhook;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bridge::{Bridge, StartupReport};
pub use command::Command;
pub use config::BridgeConfig;
pub use dispatch::{ActionDispatcher, VendorActions};
pub use error::CoreError;
pub use reconcile::{LockAxis, Reconciliation, StateReconciler};
pub use store::{AccessorySnapshot, AccessoryStore};

pub use model::{
    AccessoryInformation, BatteryStatus, ChargingState, ContactState, Device, DoorSensorState,
    LockAction, LockSecurity, LockSnapshot, LockState, LockSurface, LowBattery,
};
pub use nukilatch_api::Error as ApiError;
pub use nukilatch_api::{
    ActionResponse, BridgeClient, Callback, CallbackRegistration, TransportConfig,
};
