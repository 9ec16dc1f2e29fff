use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;
use serde::Serialize;

use crate::id::HandleSeq;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceRecordKind {
    SlotEnsured,
    CapabilitiesGranted,
    CapabilitiesRevoked,
    ChipInserted,
    ChipRemoved,
    Activated,
    GhostRoleOpened,
    OccupantJoined,
    OccupantWiped,
    Scrambled,
    Bricked,
    Deleted,
}

/// One recorded device state transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRecord {
    pub id: u64,
    pub tick: u64,
    /// Raw entity bits of the device.
    pub device: u64,
    pub kind: DeviceRecordKind,
    pub data: serde_json::Value,
}

/// Audit trail of device transitions, accumulated between flushes.
#[derive(Resource, Debug, Clone, Default)]
pub struct DeviceLog {
    pub records: Vec<DeviceRecord>,
    seq: HandleSeq,
}

impl DeviceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        tick: u64,
        device: Entity,
        kind: DeviceRecordKind,
        data: serde_json::Value,
    ) -> u64 {
        let id = self.seq.next_raw();
        self.records.push(DeviceRecord {
            id,
            tick,
            device: device.to_bits(),
            kind,
            data,
        });
        id
    }

    pub fn for_device(&self, device: Entity) -> impl Iterator<Item = &DeviceRecord> {
        let bits = device.to_bits();
        self.records.iter().filter(move |r| r.device == bits)
    }

    pub fn count(&self, device: Entity, kind: DeviceRecordKind) -> usize {
        self.for_device(device).filter(|r| r.kind == kind).count()
    }

    /// Drop accumulated records. Record ids keep increasing across clears.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
