use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::ecs::containers::ContainerId;
use crate::ecs::resources::ActionHandle;
use crate::model::{ActionProtoId, ToolQualityId};

/// Failures reported by a capability registry. The lifecycle controller never
/// recovers from these; they propagate out of the tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("no action template named `{0}`")]
    UnknownTemplate(ActionProtoId),
    #[error("action handle {0:?} is not granted")]
    UnknownHandle(ActionHandle),
    #[error("action handle {handle:?} belongs to {owner:?}, not {requester:?}")]
    NotOwner {
        handle: ActionHandle,
        owner: Entity,
        requester: Entity,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("entity {0:?} has no container manager")]
    NoContainerManager(Entity),
    #[error("entity {owner:?} has no container named `{name}`")]
    NoSuchContainer { owner: Entity, name: String },
    #[error("container {container:?} on {owner:?} is already occupied")]
    Occupied { owner: Entity, container: ContainerId },
    #[error("container {container:?} on {owner:?} is empty")]
    Empty { owner: Entity, container: ContainerId },
    #[error("entity {0:?} cannot be inserted into itself")]
    SelfInsertion(Entity),
    #[error("entity {0:?} does not exist")]
    MissingEntity(Entity),
    #[error("entity {item:?} is already inside a container on {holder:?}")]
    AlreadyContained { item: Entity, holder: Entity },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error("entity {0:?} is not a pAI device")]
    NotADevice(Entity),
    #[error("entity {0:?} is not an AI chip")]
    NotAChip(Entity),
    #[error("device {0:?} has no chip slot")]
    NoChipSlot(Entity),
    #[error("chip slot on {device:?} is full ({capacity} slot(s))")]
    ChipSlotFull { device: Entity, capacity: u32 },
    #[error("extracting the chip requires tool quality `{0}`")]
    MissingToolQuality(ToolQualityId),
}
