use serde::{Deserialize, Serialize};

use super::keys::ToolQualityId;

/// Existence phase of a device, as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    #[default]
    Uninitialized,
    Active,
    Destroyed,
}

/// Replicated view of one device after any handled event.
///
/// Entity references are carried as raw entity bits; chip occupancy is read
/// from the slot at snapshot time, never stored on the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub device: u64,
    pub name: Option<String>,
    pub phase: LifecyclePhase,
    pub has_chip_slot: bool,
    pub chip_occupied: bool,
    pub chip_extraction_method: ToolQualityId,
    pub last_user: Option<u64>,
    pub midi_action_granted: bool,
    pub map_action_granted: bool,
    pub bricked: bool,
    pub searching: bool,
    pub occupant: Option<u64>,
}
