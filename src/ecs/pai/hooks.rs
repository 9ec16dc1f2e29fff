use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

use crate::ecs::components::PaiDevice;
use crate::ecs::containers::ContainerId;
use crate::ecs::events::PaiReaction;

/// An actual insertion into or removal from a device's tracked chip slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipSlotChange {
    pub device: Entity,
    pub container: ContainerId,
    pub item: Entity,
}

/// What a chip insertion or removal does.
///
/// The controller calls these exactly once per transition of the tracked slot
/// and never for other containers. Both default to doing nothing.
pub trait ChipSlotPolicy: Send + Sync {
    fn on_inserted(
        &mut self,
        _change: &ChipSlotChange,
        _device: &mut PaiDevice,
        _reactions: &mut Vec<PaiReaction>,
    ) {
    }

    fn on_removed(
        &mut self,
        _change: &ChipSlotChange,
        _device: &mut PaiDevice,
        _reactions: &mut Vec<PaiReaction>,
    ) {
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChipPolicy;

impl ChipSlotPolicy for NoopChipPolicy {}

/// Authoritative-host policy: play the device's insertion and extraction cues.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChipAudioPolicy;

impl ChipSlotPolicy for ChipAudioPolicy {
    fn on_inserted(
        &mut self,
        change: &ChipSlotChange,
        device: &mut PaiDevice,
        reactions: &mut Vec<PaiReaction>,
    ) {
        reactions.push(PaiReaction::PlaySound {
            device: change.device,
            sound: device.chip_insertion_sound.clone(),
        });
    }

    fn on_removed(
        &mut self,
        change: &ChipSlotChange,
        device: &mut PaiDevice,
        reactions: &mut Vec<PaiReaction>,
    ) {
        reactions.push(PaiReaction::PlaySound {
            device: change.device,
            sound: device.chip_extraction_sound.clone(),
        });
    }
}

/// The chip slot policy in effect.
#[derive(Resource)]
pub struct ChipSlotHooks(pub Box<dyn ChipSlotPolicy>);

impl ChipSlotHooks {
    pub fn new(policy: impl ChipSlotPolicy + 'static) -> Self {
        Self(Box::new(policy))
    }
}

impl Default for ChipSlotHooks {
    fn default() -> Self {
        Self::new(NoopChipPolicy)
    }
}
