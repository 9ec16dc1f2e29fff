use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::{AiChip, CHIP_SLOT_ID, PaiDevice, ToolQualities};
use crate::ecs::containers::{self, ContainerId};
use crate::ecs::error::DeviceError;

/// How many chips the device's tracked slot holds right now.
pub fn chip_occupancy(world: &World, device: Entity) -> u32 {
    let Some(pai) = world.get::<PaiDevice>(device) else {
        return 0;
    };
    if pai.chip_slot.is_none() {
        return 0;
    }
    u32::from(containers::contents(world, device, CHIP_SLOT_ID).is_some())
}

/// Put `chip` into the device's chip slot.
///
/// The chip-slot event is queued immediately and reaches the chip slot policy
/// on the next tick, after any device event queued before it.
pub fn try_insert_chip(world: &mut World, device: Entity, chip: Entity) -> Result<ContainerId, DeviceError> {
    let pai = world
        .get::<PaiDevice>(device)
        .ok_or(DeviceError::NotADevice(device))?;
    if pai.chip_slot.is_none() {
        return Err(DeviceError::NoChipSlot(device));
    }
    let capacity = pai.chip_slot_capacity;
    if world.get::<AiChip>(chip).is_none() {
        return Err(DeviceError::NotAChip(chip));
    }
    if chip_occupancy(world, device) >= capacity {
        return Err(DeviceError::ChipSlotFull { device, capacity });
    }
    Ok(containers::insert_into(world, device, CHIP_SLOT_ID, chip)?)
}

/// Pry the chip out using `tool`, which must offer the device's extraction
/// quality.
pub fn try_extract_chip(world: &mut World, device: Entity, tool: Entity) -> Result<Entity, DeviceError> {
    let pai = world
        .get::<PaiDevice>(device)
        .ok_or(DeviceError::NotADevice(device))?;
    if pai.chip_slot.is_none() {
        return Err(DeviceError::NoChipSlot(device));
    }
    let required = &pai.chip_extraction_method;
    let offers = world
        .get::<ToolQualities>(tool)
        .is_some_and(|q| q.offers(required));
    if !offers {
        return Err(DeviceError::MissingToolQuality(required.clone()));
    }
    Ok(containers::remove_from(world, device, CHIP_SLOT_ID)?)
}

#[cfg(test)]
mod tests {
    use bevy_ecs::message::MessageRegistry;

    use super::*;
    use crate::ecs::containers::{ContainerManager, ensure_container_slot};
    use crate::ecs::error::ContainerError;
    use crate::ecs::events::ContainerMessage;
    use crate::model::ToolQualityId;

    fn setup() -> (World, Entity) {
        let mut world = World::new();
        MessageRegistry::register_message::<ContainerMessage>(&mut world);
        let device = world.spawn((PaiDevice::default(), ContainerManager::default())).id();
        let slot = ensure_container_slot(&mut world, device, CHIP_SLOT_ID);
        world.get_mut::<PaiDevice>(device).unwrap().chip_slot = slot;
        (world, device)
    }

    #[test]
    fn insert_respects_capacity() {
        let (mut world, device) = setup();
        let first = world.spawn(AiChip).id();
        let second = world.spawn(AiChip).id();

        try_insert_chip(&mut world, device, first).unwrap();
        assert_eq!(chip_occupancy(&world, device), 1);
        assert_eq!(
            try_insert_chip(&mut world, device, second),
            Err(DeviceError::ChipSlotFull { device, capacity: 1 })
        );
    }

    #[test]
    fn zero_capacity_accepts_nothing() {
        let (mut world, device) = setup();
        world.get_mut::<PaiDevice>(device).unwrap().chip_slot_capacity = 0;
        let chip = world.spawn(AiChip).id();
        assert!(matches!(
            try_insert_chip(&mut world, device, chip),
            Err(DeviceError::ChipSlotFull { capacity: 0, .. })
        ));
        assert_eq!(chip_occupancy(&world, device), 0);
    }

    #[test]
    fn only_chips_fit() {
        let (mut world, device) = setup();
        let rock = world.spawn_empty().id();
        assert_eq!(
            try_insert_chip(&mut world, device, rock),
            Err(DeviceError::NotAChip(rock))
        );
    }

    #[test]
    fn insert_before_startup_has_no_slot() {
        let mut world = World::new();
        let device = world.spawn(PaiDevice::default()).id();
        let chip = world.spawn(AiChip).id();
        assert_eq!(
            try_insert_chip(&mut world, device, chip),
            Err(DeviceError::NoChipSlot(device))
        );
    }

    #[test]
    fn extraction_needs_the_right_tool() {
        let (mut world, device) = setup();
        let chip = world.spawn(AiChip).id();
        try_insert_chip(&mut world, device, chip).unwrap();

        let wrench = world.spawn(ToolQualities(vec![ToolQualityId::new("Anchoring")])).id();
        assert_eq!(
            try_extract_chip(&mut world, device, wrench),
            Err(DeviceError::MissingToolQuality(ToolQualityId::new("Screwing")))
        );

        let screwdriver = world.spawn(ToolQualities(vec![ToolQualityId::new("Screwing")])).id();
        assert_eq!(try_extract_chip(&mut world, device, screwdriver), Ok(chip));
        assert_eq!(chip_occupancy(&world, device), 0);
    }

    #[test]
    fn extracting_from_empty_slot_fails() {
        let (mut world, device) = setup();
        let screwdriver = world.spawn(ToolQualities(vec![ToolQualityId::new("Screwing")])).id();
        assert!(matches!(
            try_extract_chip(&mut world, device, screwdriver),
            Err(DeviceError::Container(ContainerError::Empty { .. }))
        ));
    }
}
