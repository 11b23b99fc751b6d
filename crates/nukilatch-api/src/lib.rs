// nukilatch-api: Async Rust client for the Nuki Bridge HTTP API

pub mod actions;
pub mod callbacks;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use client::BridgeClient;
pub use error::Error;
pub use models::{
    ActionResponse, Callback, CallbackRegistration, Device, DoorSensorState, LockAction,
    LockSnapshot, LockState,
};
pub use transport::TransportConfig;
