use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;

use crate::ecs::containers::ContainerId;
use crate::model::{LocId, SoundPath};

/// Inputs to the pAI lifecycle controller, drained once per tick in write order.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum DeviceEvent {
    // -- Lifecycle --
    /// Component attached or entity loaded. Ensures the chip slot.
    Startup { device: Entity },
    /// Entity fully placed into the world. Grants the device's actions.
    MapInit { device: Entity },
    /// Component detached or entity going away. Revokes the device's actions.
    Shutdown { device: Entity },
    /// Shutdown followed by teardown of the chip slot and despawn.
    Delete { device: Entity },

    // -- Chip slot (queued by the container service for the tracked slot) --
    ChipInserted {
        device: Entity,
        container: ContainerId,
        item: Entity,
    },
    ChipRemoved {
        device: Entity,
        container: ContainerId,
        item: Entity,
    },

    // -- Requests --
    Activated { device: Entity, actor: Entity },
    /// Heat exposure; may brick the device.
    Microwaved { device: Entity },
    Wipe { device: Entity, requester: Entity },
    TakeGhostRole { device: Entity, player: Entity },
}

impl DeviceEvent {
    /// The device this event is addressed to.
    pub fn device(&self) -> Entity {
        match self {
            DeviceEvent::Startup { device }
            | DeviceEvent::MapInit { device }
            | DeviceEvent::Shutdown { device }
            | DeviceEvent::Delete { device }
            | DeviceEvent::ChipInserted { device, .. }
            | DeviceEvent::ChipRemoved { device, .. }
            | DeviceEvent::Activated { device, .. }
            | DeviceEvent::Microwaved { device }
            | DeviceEvent::Wipe { device, .. }
            | DeviceEvent::TakeGhostRole { device, .. } => *device,
        }
    }
}

/// Notifications written by the container service.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerMessage {
    Inserted {
        owner: Entity,
        container: ContainerId,
        item: Entity,
    },
    Removed {
        owner: Entity,
        container: ContainerId,
        item: Entity,
    },
}

/// Outputs for presentation and replication layers.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum PaiReaction {
    Popup { device: Entity, loc_id: LocId },
    PlaySound { device: Entity, sound: SoundPath },
    CapabilitiesGranted { device: Entity, count: usize },
    CapabilitiesRevoked { device: Entity, count: usize },
    GhostRoleOpened { device: Entity },
    OccupantJoined { device: Entity, player: Entity },
    OccupantWiped {
        device: Entity,
        player: Entity,
        requester: Option<Entity>,
    },
    Bricked { device: Entity },
}
