use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

use crate::ecs::containers::ContainerId;
use crate::ecs::resources::ActionHandle;
use crate::model::{
    ActionProtoId, LifecyclePhase, LocId, PaiPrototype, SoundPath, ToolQualityId,
};

/// Container name of the chip slot on every device.
pub const CHIP_SLOT_ID: &str = "smallaichip_slot";

/// Persistent state of one personal AI device.
///
/// A pAI is a portable ghost-role generator: whoever activates it opens a role
/// that the first interested player takes. The chip slot holds one removable
/// AI chip; the two action handles are present exactly while granted.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PaiDevice {
    /// Chip slot container, recorded on startup. `None` until then, and for
    /// the whole session when the entity has no container manager.
    pub chip_slot: Option<ContainerId>,
    /// Tool quality needed to pry the chip out.
    pub chip_extraction_method: ToolQualityId,
    pub chip_insertion_sound: SoundPath,
    pub chip_extraction_sound: SoundPath,
    pub chip_slot_capacity: u32,

    /// Whoever last activated the device. Lookup only; the entity may be gone.
    pub last_user: Option<Entity>,

    pub midi_action_id: Option<ActionProtoId>,
    pub midi_action: Option<ActionHandle>,
    pub map_action_id: ActionProtoId,
    pub map_action: Option<ActionHandle>,

    /// Chance that a microwave bricks the device, kicking its occupant out.
    pub brick_chance: f32,
    pub brick_popup: LocId,
    pub scramble_popup: LocId,

    pub phase: LifecyclePhase,
    pub bricked: bool,
    /// Ghost role is open and waiting for a player.
    pub searching: bool,
}

impl PaiDevice {
    pub fn from_prototype(proto: &PaiPrototype) -> Self {
        Self {
            chip_slot: None,
            chip_extraction_method: proto.chip_extraction_method.clone(),
            chip_insertion_sound: proto.chip_insertion_sound.clone(),
            chip_extraction_sound: proto.chip_extraction_sound.clone(),
            chip_slot_capacity: proto.chip_slots,
            last_user: None,
            midi_action_id: proto.midi_action_id.clone(),
            midi_action: None,
            map_action_id: proto.map_action_id.clone(),
            map_action: None,
            brick_chance: proto.normalized_brick_chance(),
            brick_popup: proto.brick_popup.clone(),
            scramble_popup: proto.scramble_popup.clone(),
            phase: LifecyclePhase::Uninitialized,
            bricked: false,
            searching: false,
        }
    }

    /// Bricked and destroyed devices never open a ghost role again.
    pub fn is_usable(&self) -> bool {
        !self.bricked && self.phase != LifecyclePhase::Destroyed
    }

    pub fn granted_actions(&self) -> usize {
        usize::from(self.midi_action.is_some()) + usize::from(self.map_action.is_some())
    }
}

impl Default for PaiDevice {
    fn default() -> Self {
        Self::from_prototype(&PaiPrototype::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_device_is_uninitialized_and_ungranted() {
        let pai = PaiDevice::default();
        assert_eq!(pai.phase, LifecyclePhase::Uninitialized);
        assert!(pai.chip_slot.is_none());
        assert_eq!(pai.granted_actions(), 0);
        assert_eq!(pai.chip_slot_capacity, 1);
        assert_eq!(pai.chip_extraction_method.as_str(), "Screwing");
        assert!(pai.is_usable());
    }

    #[test]
    fn nan_brick_chance_becomes_zero() {
        let proto = PaiPrototype {
            brick_chance: f32::NAN,
            ..PaiPrototype::default()
        };
        assert_eq!(PaiDevice::from_prototype(&proto).brick_chance, 0.0);
    }

    #[test]
    fn bricked_or_destroyed_devices_are_unusable() {
        let mut pai = PaiDevice::default();
        pai.bricked = true;
        assert!(!pai.is_usable());

        let mut pai = PaiDevice::default();
        pai.phase = LifecyclePhase::Destroyed;
        assert!(!pai.is_usable());
    }
}
