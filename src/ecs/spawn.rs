use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use crate::ecs::components::{AiChip, Named, PaiDevice, ToolQualities};
use crate::ecs::containers::ContainerManager;
use crate::ecs::events::DeviceEvent;
use crate::ecs::resources::DeviceSimConfig;
use crate::model::{PaiPrototype, ToolQualityId};

/// Queue a device event for the next tick.
pub fn write_device_event(world: &mut World, event: DeviceEvent) {
    match world.get_resource_mut::<Messages<DeviceEvent>>() {
        Some(mut messages) => {
            messages.write(event);
        }
        None => tracing::warn!(?event, "DeviceEvent not registered; event dropped"),
    }
}

/// Spawn a device entity without queueing any lifecycle events.
///
/// `with_containers` controls whether the entity gets a container manager
/// (and so a chip slot on startup).
pub fn spawn_pai_unstarted(
    world: &mut World,
    name: impl Into<String>,
    proto: &PaiPrototype,
    with_containers: bool,
) -> Entity {
    let mut entity = world.spawn((PaiDevice::from_prototype(proto), Named(name.into())));
    if with_containers {
        entity.insert(ContainerManager::default());
    }
    entity.id()
}

/// Spawn a device from the app's configured template and queue `Startup` then
/// `MapInit`, as when it is placed into the world.
pub fn spawn_pai(world: &mut World, name: impl Into<String>) -> Entity {
    let proto = world
        .get_resource::<DeviceSimConfig>()
        .map(|config| config.prototype.clone())
        .unwrap_or_default();
    spawn_pai_with(world, name, &proto)
}

/// Like `spawn_pai`, but built from an explicit template.
pub fn spawn_pai_with(world: &mut World, name: impl Into<String>, proto: &PaiPrototype) -> Entity {
    let device = spawn_pai_unstarted(world, name, proto, true);
    write_device_event(world, DeviceEvent::Startup { device });
    write_device_event(world, DeviceEvent::MapInit { device });
    device
}

/// Queue deletion of a device: shutdown, chip slot teardown, despawn.
pub fn despawn_pai(world: &mut World, device: Entity) {
    write_device_event(world, DeviceEvent::Delete { device });
}

pub fn spawn_chip(world: &mut World, name: impl Into<String>) -> Entity {
    world.spawn((AiChip, Named(name.into()))).id()
}

pub fn spawn_tool(world: &mut World, qualities: &[&str]) -> Entity {
    let qualities = qualities.iter().map(|q| ToolQualityId::new(*q)).collect();
    world.spawn(ToolQualities(qualities)).id()
}

/// Spawn a named actor (a player or anything else that can use a device).
pub fn spawn_actor(world: &mut World, name: impl Into<String>) -> Entity {
    world.spawn(Named(name.into())).id()
}
