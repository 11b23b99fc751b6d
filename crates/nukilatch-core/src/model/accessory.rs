// ── Accessory-facing value types ──
//
// What the home-automation host sees. These mirror the characteristic
// values of a lock mechanism, a contact sensor and a battery service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Target or current state of a lock mechanism (the bolt or the latch).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LockSecurity {
    Unsecured,
    Secured,
    Jammed,
    #[default]
    Unknown,
}

/// The `{target, current}` pair of one lock mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockSurface {
    pub target: LockSecurity,
    pub current: LockSecurity,
}

impl LockSurface {
    /// A surface at rest: target and current agree.
    pub const fn settled(state: LockSecurity) -> Self {
        Self {
            target: state,
            current: state,
        }
    }

    /// `true` while the host would render the mechanism as moving.
    pub fn in_transit(&self) -> bool {
        self.target != self.current
    }
}

impl std::fmt::Display for LockSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.target, self.current)
    }
}

/// Contact sensor reading. `Detected` means the door is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactState {
    Detected,
    NotDetected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LowBattery {
    #[default]
    Normal,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChargingState {
    #[default]
    NotCharging,
    Charging,
}

/// Battery service values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub low_battery: LowBattery,
    pub charging: ChargingState,
    /// Charge level in percent. `None` until the bridge reports one.
    pub level: Option<u8>,
}

/// Static identification shown by the host next to the services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInformation {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub firmware_revision: String,
}

impl AccessoryInformation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manufacturer: env!("CARGO_PKG_AUTHORS").to_owned(),
            model: "nukilatch".to_owned(),
            firmware_revision: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surfaces_start_unknown() {
        let surface = LockSurface::default();
        assert_eq!(surface, LockSurface::settled(LockSecurity::Unknown));
        assert!(!surface.in_transit());
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(LockSecurity::Unsecured.to_string(), "unsecured");
        assert_eq!(ContactState::NotDetected.to_string(), "not_detected");
        assert_eq!(
            LockSurface {
                target: LockSecurity::Secured,
                current: LockSecurity::Unsecured
            }
            .to_string(),
            "secured/unsecured"
        );
    }

    #[test]
    fn lock_security_parses() {
        assert_eq!("secured".parse::<LockSecurity>().ok(), Some(LockSecurity::Secured));
        assert!("open".parse::<LockSecurity>().is_err());
    }
}
