//! pAI device systems.
//!
//! Insertions into and removals from a device's tracked chip slot are turned
//! into `DeviceEvent::ChipInserted` / `ChipRemoved` when the container changes,
//! so they queue in causal order with every other device event. Notifications
//! for any other container are dropped.
//!
//! `process_device_events` (Update) drains every `DeviceEvent` in write order
//! through the lifecycle controller. Reactions are collected into
//! `ReactionFeed` in `TickPhase::Last`.

mod apply_brick;
mod apply_chip;
mod apply_lifecycle;
mod apply_occupancy;
pub mod chip;
pub mod controller;
pub mod hooks;
pub mod replication;

use bevy_app::{App, Plugin};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::world::World;

use crate::ecs::components::PaiDevice;
use crate::ecs::events::{ContainerMessage, DeviceEvent};
use crate::ecs::resources::collect_reactions;
use crate::ecs::schedule::{DeviceTick, TickPhase};
use crate::ecs::spawn::write_device_event;

pub use chip::{chip_occupancy, try_extract_chip, try_insert_chip};
pub use controller::{handle_device_events, process_device_events};
pub use hooks::{ChipAudioPolicy, ChipSlotChange, ChipSlotHooks, ChipSlotPolicy, NoopChipPolicy};
pub use replication::{device_snapshot, snapshot_all};

pub struct PaiPlugin;

impl Plugin for PaiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(DeviceTick, process_device_events.in_set(TickPhase::Update));
        app.add_systems(DeviceTick, collect_reactions.in_set(TickPhase::Last));
    }
}

/// Queue the chip-slot device event for a container change, if the container
/// is the owner's tracked chip slot.
pub(crate) fn route_chip_slot_change(world: &mut World, message: &ContainerMessage) {
    let (owner, container, item, inserted) = match *message {
        ContainerMessage::Inserted {
            owner,
            container,
            item,
        } => (owner, container, item, true),
        ContainerMessage::Removed {
            owner,
            container,
            item,
        } => (owner, container, item, false),
    };
    let tracked = world
        .get::<PaiDevice>(owner)
        .is_some_and(|pai| pai.chip_slot == Some(container));
    if !tracked {
        return;
    }
    let event = if inserted {
        DeviceEvent::ChipInserted {
            device: owner,
            container,
            item,
        }
    } else {
        DeviceEvent::ChipRemoved {
            device: owner,
            container,
            item,
        }
    };
    write_device_event(world, event);
}
