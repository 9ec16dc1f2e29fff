use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use crate::ecs::clock::DeviceClock;
use crate::ecs::error::DeviceError;
use crate::ecs::events::{DeviceEvent, PaiReaction};
use crate::ecs::resources::{Capabilities, DeviceLog, DeviceRandom, DeviceRecordKind};

use super::apply_brick;
use super::apply_chip;
use super::apply_lifecycle;
use super::apply_occupancy;
use super::hooks::{ChipSlotChange, ChipSlotHooks};

/// Collaborators and outputs handed to every `apply_*` handler, extracted from
/// the world for the duration of one batch.
pub(crate) struct DeviceCtx {
    pub capabilities: Capabilities,
    pub random: DeviceRandom,
    pub hooks: ChipSlotHooks,
    pub log: DeviceLog,
    pub tick: u64,
    pub reactions: Vec<PaiReaction>,
}

impl DeviceCtx {
    fn extract(world: &mut World) -> Self {
        Self {
            capabilities: world.remove_resource::<Capabilities>().unwrap_or_default(),
            random: world.remove_resource::<DeviceRandom>().unwrap_or_default(),
            hooks: world.remove_resource::<ChipSlotHooks>().unwrap_or_default(),
            log: world.remove_resource::<DeviceLog>().unwrap_or_default(),
            tick: world.get_resource::<DeviceClock>().map_or(0, |c| c.tick),
            reactions: Vec::new(),
        }
    }

    fn restore(self, world: &mut World) {
        if let Some(mut messages) = world.get_resource_mut::<Messages<PaiReaction>>() {
            messages.write_batch(self.reactions);
        }
        world.insert_resource(self.capabilities);
        world.insert_resource(self.random);
        world.insert_resource(self.hooks);
        world.insert_resource(self.log);
    }

    pub(crate) fn record(&mut self, device: Entity, kind: DeviceRecordKind, data: serde_json::Value) {
        self.log.record(self.tick, device, kind, data);
    }

    pub(crate) fn emit(&mut self, reaction: PaiReaction) {
        self.reactions.push(reaction);
    }
}

fn dispatch(ctx: &mut DeviceCtx, world: &mut World, event: &DeviceEvent) -> Result<(), DeviceError> {
    match *event {
        // Lifecycle
        DeviceEvent::Startup { device } => apply_lifecycle::apply_startup(ctx, world, device),
        DeviceEvent::MapInit { device } => apply_lifecycle::apply_map_init(ctx, world, device)?,
        DeviceEvent::Shutdown { device } => apply_lifecycle::apply_shutdown(ctx, world, device)?,
        DeviceEvent::Delete { device } => apply_lifecycle::apply_delete(ctx, world, device)?,

        // Chip slot
        DeviceEvent::ChipInserted {
            device,
            container,
            item,
        } => apply_chip::apply_chip_inserted(
            ctx,
            world,
            ChipSlotChange {
                device,
                container,
                item,
            },
        ),
        DeviceEvent::ChipRemoved {
            device,
            container,
            item,
        } => apply_chip::apply_chip_removed(
            ctx,
            world,
            ChipSlotChange {
                device,
                container,
                item,
            },
        ),

        // Requests
        DeviceEvent::Activated { device, actor } => {
            apply_occupancy::apply_activated(ctx, world, device, actor)
        }
        DeviceEvent::Microwaved { device } => apply_brick::apply_microwaved(ctx, world, device),
        DeviceEvent::Wipe { device, requester } => {
            apply_occupancy::apply_wipe(ctx, world, device, requester)
        }
        DeviceEvent::TakeGhostRole { device, player } => {
            apply_occupancy::apply_take_ghost_role(ctx, world, device, player)
        }
    }
    Ok(())
}

/// Run a batch of device events against the world, in order.
///
/// Stops at the first capability failure and returns it; events before the
/// failure stay applied and their reactions are still written.
pub fn handle_device_events(
    world: &mut World,
    events: impl IntoIterator<Item = DeviceEvent>,
) -> Result<(), DeviceError> {
    let mut ctx = DeviceCtx::extract(world);
    let outcome = events.into_iter().try_for_each(|event| {
        dispatch(&mut ctx, world, &event).inspect_err(|err| {
            tracing::warn!(device = ?event.device(), %err, "device event failed");
        })
    });
    ctx.restore(world);
    outcome
}

/// Exclusive system that drains all pending `DeviceEvent` messages and runs
/// them through the lifecycle controller.
///
/// Runs in `TickPhase::Update`. A capability failure is returned as a system
/// error and handled by bevy's error handler.
pub fn process_device_events(world: &mut World) -> bevy_ecs::error::Result {
    let events: Vec<DeviceEvent> = {
        let Some(mut messages) = world.get_resource_mut::<Messages<DeviceEvent>>() else {
            return Ok(());
        };
        messages.drain().collect()
    };

    if events.is_empty() {
        return Ok(());
    }

    handle_device_events(world, events)?;
    Ok(())
}
