use bevy_ecs::world::World;
use serde_json::json;

use crate::ecs::components::PaiDevice;
use crate::ecs::resources::DeviceRecordKind;
use crate::model::LifecyclePhase;

use super::controller::DeviceCtx;
use super::hooks::ChipSlotChange;

/// The change hit the device's tracked slot and the device is still live.
fn tracked(pai: &PaiDevice, change: &ChipSlotChange) -> bool {
    pai.chip_slot == Some(change.container) && pai.phase != LifecyclePhase::Destroyed
}

pub(crate) fn apply_chip_inserted(ctx: &mut DeviceCtx, world: &mut World, change: ChipSlotChange) {
    let Some(mut pai) = world.get_mut::<PaiDevice>(change.device) else {
        return;
    };
    if !tracked(&pai, &change) {
        return;
    }
    ctx.hooks.0.on_inserted(&change, &mut pai, &mut ctx.reactions);
    ctx.record(
        change.device,
        DeviceRecordKind::ChipInserted,
        json!({ "chip": change.item.to_bits() }),
    );
}

pub(crate) fn apply_chip_removed(ctx: &mut DeviceCtx, world: &mut World, change: ChipSlotChange) {
    let Some(mut pai) = world.get_mut::<PaiDevice>(change.device) else {
        return;
    };
    if !tracked(&pai, &change) {
        return;
    }
    ctx.hooks.0.on_removed(&change, &mut pai, &mut ctx.reactions);
    ctx.record(
        change.device,
        DeviceRecordKind::ChipRemoved,
        json!({ "chip": change.item.to_bits() }),
    );
}
