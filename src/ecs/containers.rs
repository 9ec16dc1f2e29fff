//! Named single-item container slots owned by an entity.
//!
//! Every mutation writes a `ContainerMessage` keyed by owner and container id,
//! so listeners can tell one slot from another on the same owner. A change to
//! a device's tracked chip slot also queues the matching `DeviceEvent` right
//! away.

use std::collections::BTreeMap;

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;
use serde::Serialize;

use crate::ecs::error::ContainerError;
use crate::ecs::events::ContainerMessage;
use crate::ecs::pai::route_chip_slot_change;
use crate::id::HandleSeq;

/// Process-unique identity of one container slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ContainerId(u64);

impl ContainerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSlot {
    pub id: ContainerId,
    pub contents: Option<Entity>,
}

/// Container-holding facility. Entities without it cannot own slots.
#[derive(Component, Debug, Clone, Default)]
pub struct ContainerManager {
    slots: BTreeMap<String, ContainerSlot>,
}

impl ContainerManager {
    pub fn get(&self, name: &str) -> Option<&ContainerSlot> {
        self.slots.get(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Back-reference from a contained item to where it sits.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InContainer {
    pub owner: Entity,
    pub container: ContainerId,
}

/// Allocator for container ids.
#[derive(Resource, Debug, Default)]
pub struct ContainerIds(HandleSeq);

fn write_message(world: &mut World, message: ContainerMessage) {
    match world.get_resource_mut::<Messages<ContainerMessage>>() {
        Some(mut messages) => {
            messages.write(message);
        }
        None => tracing::debug!(?message, "ContainerMessage not registered; notification dropped"),
    }
    route_chip_slot_change(world, &message);
}

/// Return the slot called `name` on `owner`, creating it if needed.
///
/// `None` when `owner` has no `ContainerManager`. An existing slot keeps its
/// id and contents.
pub fn ensure_container_slot(world: &mut World, owner: Entity, name: &str) -> Option<ContainerId> {
    if let Some(existing) = world.get::<ContainerManager>(owner)?.get(name) {
        return Some(existing.id);
    }

    let id = {
        let mut ids = world.get_resource_or_insert_with(ContainerIds::default);
        ContainerId(ids.0.next_raw())
    };
    world.get_mut::<ContainerManager>(owner)?.slots.insert(
        name.to_string(),
        ContainerSlot { id, contents: None },
    );
    Some(id)
}

/// Current occupant of a slot, if the slot exists and is filled.
pub fn contents(world: &World, owner: Entity, name: &str) -> Option<Entity> {
    world
        .get::<ContainerManager>(owner)?
        .get(name)
        .and_then(|slot| slot.contents)
}

pub fn insert_into(
    world: &mut World,
    owner: Entity,
    name: &str,
    item: Entity,
) -> Result<ContainerId, ContainerError> {
    if owner == item {
        return Err(ContainerError::SelfInsertion(item));
    }
    if world.get_entity(item).is_err() {
        return Err(ContainerError::MissingEntity(item));
    }
    if let Some(held) = world.get::<InContainer>(item) {
        return Err(ContainerError::AlreadyContained {
            item,
            holder: held.owner,
        });
    }

    let container = {
        let mut manager = world
            .get_mut::<ContainerManager>(owner)
            .ok_or(ContainerError::NoContainerManager(owner))?;
        let slot = manager
            .slots
            .get_mut(name)
            .ok_or_else(|| ContainerError::NoSuchContainer {
                owner,
                name: name.to_string(),
            })?;
        if slot.contents.is_some() {
            return Err(ContainerError::Occupied {
                owner,
                container: slot.id,
            });
        }
        slot.contents = Some(item);
        slot.id
    };

    world.entity_mut(item).insert(InContainer { owner, container });
    write_message(
        world,
        ContainerMessage::Inserted {
            owner,
            container,
            item,
        },
    );
    Ok(container)
}

pub fn remove_from(world: &mut World, owner: Entity, name: &str) -> Result<Entity, ContainerError> {
    let (container, item) = {
        let mut manager = world
            .get_mut::<ContainerManager>(owner)
            .ok_or(ContainerError::NoContainerManager(owner))?;
        let slot = manager
            .slots
            .get_mut(name)
            .ok_or_else(|| ContainerError::NoSuchContainer {
                owner,
                name: name.to_string(),
            })?;
        let item = slot.contents.take().ok_or(ContainerError::Empty {
            owner,
            container: slot.id,
        })?;
        (slot.id, item)
    };

    if let Ok(mut item_ref) = world.get_entity_mut(item) {
        item_ref.remove::<InContainer>();
    }
    write_message(
        world,
        ContainerMessage::Removed {
            owner,
            container,
            item,
        },
    );
    Ok(item)
}

/// Despawn everything held by `owner`'s slots. Returns how many items went.
///
/// Used when the owner itself is deleted; no removal notifications are sent.
pub fn teardown(world: &mut World, owner: Entity) -> usize {
    let items: Vec<Entity> = match world.get_mut::<ContainerManager>(owner) {
        Some(mut manager) => manager
            .slots
            .values_mut()
            .filter_map(|slot| slot.contents.take())
            .collect(),
        None => return 0,
    };
    for item in &items {
        world.despawn(*item);
    }
    items.len()
}
