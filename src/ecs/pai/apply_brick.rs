use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use serde_json::json;

use crate::ecs::components::PaiDevice;
use crate::ecs::events::PaiReaction;
use crate::ecs::resources::DeviceRecordKind;
use crate::model::LifecyclePhase;

use super::apply_occupancy::evict_occupant;
use super::controller::DeviceCtx;

/// Heat exposure: roll once against the brick chance.
///
/// A roll below the chance bricks the device for good, evicting its occupant
/// and showing the brick popup. Anything else shows the scramble popup and
/// changes nothing. Bricked devices ignore further exposure without rolling.
pub(crate) fn apply_microwaved(ctx: &mut DeviceCtx, world: &mut World, device: Entity) {
    let (chance, brick_popup, scramble_popup) = {
        let Some(pai) = world.get::<PaiDevice>(device) else {
            tracing::warn!(?device, "Microwaved for an entity without PaiDevice");
            return;
        };
        if pai.bricked {
            tracing::debug!(?device, "device already bricked; exposure ignored");
            return;
        }
        if pai.phase == LifecyclePhase::Destroyed {
            return;
        }
        (
            pai.brick_chance,
            pai.brick_popup.clone(),
            pai.scramble_popup.clone(),
        )
    };

    let roll = ctx.random.0.next_unit();

    // A NaN chance compares false and scrambles.
    let bricks = roll < chance;
    if !bricks {
        ctx.record(
            device,
            DeviceRecordKind::Scrambled,
            json!({ "roll": roll, "chance": chance }),
        );
        ctx.emit(PaiReaction::Popup {
            device,
            loc_id: scramble_popup,
        });
        return;
    }

    if let Some(mut pai) = world.get_mut::<PaiDevice>(device) {
        pai.bricked = true;
        pai.searching = false;
    }
    let evicted = evict_occupant(world, device);
    tracing::info!(?device, roll, chance, ?evicted, "device bricked");

    ctx.record(
        device,
        DeviceRecordKind::Bricked,
        json!({
            "roll": roll,
            "chance": chance,
            "evicted": evicted.map(Entity::to_bits),
        }),
    );
    ctx.emit(PaiReaction::Bricked { device });
    if let Some(player) = evicted {
        ctx.emit(PaiReaction::OccupantWiped {
            device,
            player,
            requester: None,
        });
    }
    ctx.emit(PaiReaction::Popup {
        device,
        loc_id: brick_popup,
    });
}
