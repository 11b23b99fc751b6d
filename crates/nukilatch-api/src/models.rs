// Bridge API response types
//
// Models for the Nuki Bridge HTTP API. Numeric state codes are mapped onto
// closed enums with an `Other` catch-all so an unknown firmware code never
// fails deserialization. Fields use `#[serde(default)]` liberally because
// the bridge omits keys depending on device type and firmware.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Lock state ───────────────────────────────────────────────────────

/// Lock state reported by the bridge (`state` field).
///
/// Only the codes the accessory surfaces understand get their own variant;
/// everything else, transitional states included, lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum LockState {
    Locked,
    Jammed,
    Unlocked,
    Unlatched,
    Other(i64),
}

impl LockState {
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Locked,
            2 => Self::Jammed,
            3 => Self::Unlocked,
            5 => Self::Unlatched,
            other => Self::Other(other),
        }
    }

    pub const fn code(self) -> i64 {
        match self {
            Self::Locked => 1,
            Self::Jammed => 2,
            Self::Unlocked => 3,
            Self::Unlatched => 5,
            Self::Other(code) => code,
        }
    }
}

impl From<i64> for LockState {
    fn from(code: i64) -> Self {
        Self::from_code(code)
    }
}

impl From<LockState> for i64 {
    fn from(state: LockState) -> Self {
        state.code()
    }
}

// ── Door sensor state ────────────────────────────────────────────────

/// Door sensor state reported by the bridge (`doorsensorState` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum DoorSensorState {
    Closed,
    Opened,
    Other(i64),
}

impl DoorSensorState {
    pub const fn from_code(code: i64) -> Self {
        match code {
            2 => Self::Closed,
            3 => Self::Opened,
            other => Self::Other(other),
        }
    }

    pub const fn code(self) -> i64 {
        match self {
            Self::Closed => 2,
            Self::Opened => 3,
            Self::Other(code) => code,
        }
    }
}

impl From<i64> for DoorSensorState {
    fn from(code: i64) -> Self {
        Self::from_code(code)
    }
}

impl From<DoorSensorState> for i64 {
    fn from(state: DoorSensorState) -> Self {
        state.code()
    }
}

// ── State snapshot ───────────────────────────────────────────────────

/// One state snapshot, as carried by `lastKnownState` in `/list` and by
/// the callbacks the bridge pushes.
///
/// Every field is optional: a callback may carry only the axis that changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<LockState>,
    #[serde(default, rename = "doorsensorState", skip_serializing_if = "Option::is_none")]
    pub door_sensor_state: Option<DoorSensorState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_critical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_charging: Option<bool>,
    /// Charge level in percent (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_charge_state: Option<u8>,
}

impl LockSnapshot {
    /// Parse a pushed payload that is either a bare snapshot or an object
    /// wrapping one in `lastKnownState`.
    ///
    /// A `lastKnownState` that is missing, `null` or not an object falls back
    /// to the surrounding object. Non-object payloads are an error.
    pub fn from_payload(payload: Value) -> Result<Self, serde_json::Error> {
        let inner = match payload {
            Value::Object(mut map) => match map.remove("lastKnownState") {
                Some(state) if state.is_object() => state,
                _ => Value::Object(map),
            },
            other => other,
        };
        serde_json::from_value(inner)
    }

    /// Parse raw bytes as a pushed payload (see [`from_payload`](Self::from_payload)).
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let payload: Value = serde_json::from_slice(body)?;
        Self::from_payload(payload)
    }
}

// ── Device ───────────────────────────────────────────────────────────

/// A paired device from `/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "nukiId")]
    pub nuki_id: u64,
    #[serde(default)]
    pub name: String,
    /// 0 = Smart Lock 1.0/2.0, 2 = Opener, 3 = Smart Door, 4 = Smart Lock 3.0/4.0.
    #[serde(default, rename = "deviceType", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<u8>,
    #[serde(default, rename = "firmwareVersion", skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(default, rename = "lastKnownState", skip_serializing_if = "Option::is_none")]
    pub last_known_state: Option<LockSnapshot>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Callbacks ────────────────────────────────────────────────────────

/// Response of `/callback/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackList {
    #[serde(default)]
    pub callbacks: Vec<Callback>,
}

/// A registered callback URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub url: String,
}

/// Outcome of [`BridgeClient::register_webhook`](crate::BridgeClient::register_webhook).
///
/// Registration is not on the startup-critical path, so failures are
/// reported as values rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackRegistration {
    /// The URL was already in the bridge's callback list.
    AlreadyRegistered,
    /// The URL was added.
    Registered,
    /// The bridge answered `{success: false}`.
    Rejected { message: Option<String> },
    /// Listing or adding failed before the bridge could answer.
    Failed { reason: String },
}

impl CallbackRegistration {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::AlreadyRegistered | Self::Registered)
    }
}

// ── Actions ──────────────────────────────────────────────────────────

/// Lock action codes for `/lockAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockAction {
    Unlock,
    Lock,
    Unlatch,
}

impl LockAction {
    pub const fn code(self) -> u8 {
        match self {
            Self::Unlock => 1,
            Self::Lock => 2,
            Self::Unlatch => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unlock => "unlock",
            Self::Lock => "lock",
            Self::Unlatch => "unlatch",
        }
    }
}

impl std::fmt::Display for LockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `{success, message?}` envelope returned by `/lockAction` and
/// `/callback/add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, rename = "batteryCritical", skip_serializing_if = "Option::is_none")]
    pub battery_critical: Option<bool>,
}
