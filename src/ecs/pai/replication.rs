use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use bevy_ecs::world::World;

use crate::ecs::components::{Named, PaiDevice};
use crate::ecs::relationships::InhabitedBy;
use crate::model::DeviceSnapshot;

use super::chip::chip_occupancy;

/// Observer view of one device; `None` when `device` is not a pAI.
pub fn device_snapshot(world: &World, device: Entity) -> Option<DeviceSnapshot> {
    let pai = world.get::<PaiDevice>(device)?;
    Some(DeviceSnapshot {
        device: device.to_bits(),
        name: world.get::<Named>(device).map(|n| n.0.clone()),
        phase: pai.phase,
        has_chip_slot: pai.chip_slot.is_some(),
        chip_occupied: chip_occupancy(world, device) > 0,
        chip_extraction_method: pai.chip_extraction_method.clone(),
        last_user: pai.last_user.map(Entity::to_bits),
        midi_action_granted: pai.midi_action.is_some(),
        map_action_granted: pai.map_action.is_some(),
        bricked: pai.bricked,
        searching: pai.searching,
        occupant: world.get::<InhabitedBy>(device).map(|o| o.0.to_bits()),
    })
}

/// Snapshots of every device, ordered by entity bits.
pub fn snapshot_all(world: &mut World) -> Vec<DeviceSnapshot> {
    let mut devices: Vec<Entity> = world
        .query_filtered::<Entity, With<PaiDevice>>()
        .iter(world)
        .collect();
    devices.sort_by_key(|e| e.to_bits());
    devices
        .into_iter()
        .filter_map(|device| device_snapshot(world, device))
        .collect()
}
