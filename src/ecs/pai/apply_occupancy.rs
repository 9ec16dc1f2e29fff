use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use serde_json::json;

use crate::ecs::components::{Named, PaiDevice};
use crate::ecs::events::PaiReaction;
use crate::ecs::relationships::{InhabitedBy, Inhabits};
use crate::ecs::resources::DeviceRecordKind;

use super::controller::DeviceCtx;

/// Remove the device's occupant, if any, and return who it was.
pub(crate) fn evict_occupant(world: &mut World, device: Entity) -> Option<Entity> {
    let player = world.get::<InhabitedBy>(device)?.0;
    world.entity_mut(device).remove::<InhabitedBy>();
    Some(player)
}

/// Name of `entity` if it still exists and has one.
fn resolve_name(world: &World, entity: Option<Entity>) -> Option<String> {
    let entity = entity?;
    world.get_entity(entity).ok()?;
    world.get::<Named>(entity).map(|n| n.0.clone())
}

/// Record the activating actor, then open the ghost role if the device can
/// take a player.
pub(crate) fn apply_activated(ctx: &mut DeviceCtx, world: &mut World, device: Entity, actor: Entity) {
    let occupied = world.get::<InhabitedBy>(device).is_some();
    let Some(mut pai) = world.get_mut::<PaiDevice>(device) else {
        tracing::warn!(?device, "Activated for an entity without PaiDevice");
        return;
    };

    pai.last_user = Some(actor);
    ctx.record(
        device,
        DeviceRecordKind::Activated,
        json!({ "actor": actor.to_bits() }),
    );

    if !pai.is_usable() {
        tracing::debug!(?device, bricked = pai.bricked, "activation of an unusable device");
        return;
    }
    if occupied || pai.searching {
        return;
    }

    pai.searching = true;
    ctx.record(device, DeviceRecordKind::GhostRoleOpened, json!(null));
    ctx.emit(PaiReaction::GhostRoleOpened { device });
}

/// First come, first served: the first player to take an open role gets it.
/// A player inhabits at most one device.
pub(crate) fn apply_take_ghost_role(
    ctx: &mut DeviceCtx,
    world: &mut World,
    device: Entity,
    player: Entity,
) {
    if player == device || world.get_entity(player).is_err() {
        tracing::warn!(?device, ?player, "ghost role taken by a missing entity");
        return;
    }
    if world.get::<InhabitedBy>(device).is_some() {
        tracing::debug!(?device, ?player, "ghost role already taken");
        return;
    }
    if world.get::<Inhabits>(player).is_some_and(|bodies| !bodies.is_empty()) {
        tracing::debug!(?device, ?player, "player already inhabits a device");
        return;
    }
    let last_user = {
        let Some(mut pai) = world.get_mut::<PaiDevice>(device) else {
            tracing::warn!(?device, "TakeGhostRole for an entity without PaiDevice");
            return;
        };
        if !pai.searching || !pai.is_usable() {
            tracing::debug!(?device, ?player, "ghost role is not open");
            return;
        }
        pai.searching = false;
        pai.last_user
    };

    let name = resolve_name(world, last_user).map(|owner| format!("{owner}'s pAI"));
    {
        let mut entity = world.entity_mut(device);
        entity.insert(InhabitedBy(player));
        if let Some(name) = &name {
            entity.insert(Named(name.clone()));
        }
    }

    ctx.record(
        device,
        DeviceRecordKind::OccupantJoined,
        json!({ "player": player.to_bits(), "name": name }),
    );
    ctx.emit(PaiReaction::OccupantJoined { device, player });
}

/// Kick the occupant out and close the role. Leaves the brick chance and the
/// granted actions alone; a bricked device has nobody left to wipe.
pub(crate) fn apply_wipe(ctx: &mut DeviceCtx, world: &mut World, device: Entity, requester: Entity) {
    {
        let Some(mut pai) = world.get_mut::<PaiDevice>(device) else {
            tracing::warn!(?device, "Wipe for an entity without PaiDevice");
            return;
        };
        if pai.bricked {
            return;
        }
        pai.searching = false;
    }

    let Some(player) = evict_occupant(world, device) else {
        tracing::debug!(?device, "wipe with no occupant");
        return;
    };
    ctx.record(
        device,
        DeviceRecordKind::OccupantWiped,
        json!({ "player": player.to_bits(), "requester": requester.to_bits() }),
    );
    ctx.emit(PaiReaction::OccupantWiped {
        device,
        player,
        requester: Some(requester),
    });
}
