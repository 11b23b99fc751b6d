//! Device command handlers.

use tabled::Tabled;

use nukilatch_core::{Device, DoorSensorState, LockSnapshot, LockState};

use crate::cli::GlobalOpts;
use crate::config::Loaded;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Nuki ID")]
    nuki_id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Door")]
    door: String,
    #[tabled(rename = "Battery")]
    battery: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        let snapshot = d.last_known_state.as_ref();
        Self {
            nuki_id: d.nuki_id,
            name: d.name.clone(),
            device_type: device_type_label(d.device_type),
            firmware: d.firmware_version.clone().unwrap_or_default(),
            state: snapshot
                .and_then(|s| s.state)
                .map(lock_state_label)
                .unwrap_or_default(),
            door: snapshot
                .and_then(|s| s.door_sensor_state)
                .map(door_label)
                .unwrap_or_default(),
            battery: snapshot.map(battery_label).unwrap_or_default(),
        }
    }
}

fn device_type_label(device_type: Option<u8>) -> String {
    match device_type {
        Some(0) => "smart lock".into(),
        Some(2) => "opener".into(),
        Some(3) => "smart door".into(),
        Some(4) => "smart lock 3".into(),
        Some(other) => format!("type {other}"),
        None => String::new(),
    }
}

pub(crate) fn lock_state_label(state: LockState) -> String {
    match state {
        LockState::Locked => "locked".into(),
        LockState::Jammed => "jammed".into(),
        LockState::Unlocked => "unlocked".into(),
        LockState::Unlatched => "unlatched".into(),
        LockState::Other(code) => format!("state {code}"),
    }
}

fn door_label(door: DoorSensorState) -> String {
    match door {
        DoorSensorState::Closed => "closed".into(),
        DoorSensorState::Opened => "open".into(),
        DoorSensorState::Other(code) => format!("sensor {code}"),
    }
}

fn battery_label(snapshot: &LockSnapshot) -> String {
    let mut label = snapshot
        .battery_charge_state
        .map(|level| format!("{level}%"))
        .unwrap_or_default();
    if snapshot.battery_critical == Some(true) {
        label.push_str(" critical");
    }
    if snapshot.battery_charging == Some(true) {
        label.push_str(" charging");
    }
    label.trim().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(loaded: &Loaded, global: &GlobalOpts) -> Result<(), CliError> {
    let client = loaded.client()?;
    let devices = client.list_devices().await?;

    let out = output::render_list(
        global.output,
        &devices,
        |d| DeviceRow::from(d),
        |d| d.nuki_id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battery_label_combines_flags() {
        let snapshot = LockSnapshot {
            battery_charge_state: Some(12),
            battery_critical: Some(true),
            battery_charging: Some(false),
            ..LockSnapshot::default()
        };
        assert_eq!(battery_label(&snapshot), "12% critical");
        assert_eq!(battery_label(&LockSnapshot::default()), "");
    }

    #[test]
    fn unknown_codes_are_labelled() {
        assert_eq!(lock_state_label(LockState::Other(7)), "state 7");
        assert_eq!(door_label(DoorSensorState::Other(4)), "sensor 4");
        assert_eq!(device_type_label(Some(9)), "type 9");
    }
}
