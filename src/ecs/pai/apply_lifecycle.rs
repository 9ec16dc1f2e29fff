use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use serde_json::json;

use crate::ecs::components::{CHIP_SLOT_ID, PaiDevice};
use crate::ecs::containers;
use crate::ecs::error::CapabilityError;
use crate::ecs::events::PaiReaction;
use crate::ecs::resources::{ActionHandle, CapabilityRegistry, DeviceRecordKind};
use crate::model::{ActionProtoId, LifecyclePhase};

use super::controller::DeviceCtx;

/// Grant `template` into `slot` unless a handle is already recorded there.
/// Returns the new handle, if a grant happened.
fn grant_once(
    registry: &mut dyn CapabilityRegistry,
    owner: Entity,
    slot: &mut Option<ActionHandle>,
    template: &ActionProtoId,
) -> Result<Option<ActionHandle>, CapabilityError> {
    if slot.is_some() {
        return Ok(None);
    }
    let handle = registry.grant(owner, template)?;
    *slot = Some(handle);
    Ok(Some(handle))
}

/// Revoke whatever handle `slot` holds. An empty slot is a no-op. The handle
/// stays recorded when the registry refuses the revoke.
fn revoke_once(
    registry: &mut dyn CapabilityRegistry,
    owner: Entity,
    slot: &mut Option<ActionHandle>,
) -> Result<bool, CapabilityError> {
    let Some(handle) = *slot else {
        return Ok(false);
    };
    registry.revoke(owner, handle)?;
    *slot = None;
    Ok(true)
}

/// Grant the device's actions, collecting new handles into `granted` as they
/// succeed.
fn grant_actions(
    registry: &mut dyn CapabilityRegistry,
    device: Entity,
    pai: &mut PaiDevice,
    granted: &mut Vec<ActionHandle>,
) -> Result<(), CapabilityError> {
    if let Some(template) = &pai.midi_action_id {
        granted.extend(grant_once(registry, device, &mut pai.midi_action, template)?);
    }
    granted.extend(grant_once(
        registry,
        device,
        &mut pai.map_action,
        &pai.map_action_id,
    )?);
    Ok(())
}

fn revoke_actions(
    registry: &mut dyn CapabilityRegistry,
    device: Entity,
    pai: &mut PaiDevice,
    revoked: &mut usize,
) -> Result<(), CapabilityError> {
    *revoked += usize::from(revoke_once(registry, device, &mut pai.midi_action)?);
    *revoked += usize::from(revoke_once(registry, device, &mut pai.map_action)?);
    Ok(())
}

/// Ensure the chip slot exists and record it on the device.
///
/// Idempotent: a repeated startup reuses the existing slot and its contents.
/// An entity without a container manager runs without a chip slot.
pub(crate) fn apply_startup(ctx: &mut DeviceCtx, world: &mut World, device: Entity) {
    let Some(pai) = world.get::<PaiDevice>(device) else {
        tracing::warn!(?device, "Startup for an entity without PaiDevice");
        return;
    };
    if pai.phase == LifecyclePhase::Destroyed {
        tracing::warn!(?device, "Startup for a destroyed device ignored");
        return;
    }
    let previous = pai.chip_slot;

    let slot = containers::ensure_container_slot(world, device, CHIP_SLOT_ID);

    let Some(mut pai) = world.get_mut::<PaiDevice>(device) else {
        return;
    };
    if pai.phase == LifecyclePhase::Uninitialized {
        pai.phase = LifecyclePhase::Active;
    }
    let Some(slot) = slot else {
        tracing::debug!(?device, "no container manager; device runs without a chip slot");
        return;
    };
    pai.chip_slot = Some(slot);

    if previous == Some(slot) {
        tracing::debug!(?device, "repeated startup reused the chip slot");
        return;
    }
    ctx.record(
        device,
        DeviceRecordKind::SlotEnsured,
        json!({ "container": slot.raw() }),
    );
}

/// Grant the audio-play and open-map actions once per device.
pub(crate) fn apply_map_init(
    ctx: &mut DeviceCtx,
    world: &mut World,
    device: Entity,
) -> Result<(), CapabilityError> {
    let Some(mut pai) = world.get_mut::<PaiDevice>(device) else {
        tracing::warn!(?device, "MapInit for an entity without PaiDevice");
        return Ok(());
    };
    if pai.phase == LifecyclePhase::Destroyed {
        tracing::warn!(?device, "MapInit for a destroyed device ignored");
        return Ok(());
    }

    let mut granted = Vec::new();
    let outcome = grant_actions(ctx.capabilities.0.as_mut(), device, &mut pai, &mut granted);

    // Grants that went through before a failure are still recorded.
    if granted.is_empty() {
        if outcome.is_ok() {
            tracing::debug!(?device, "duplicate MapInit absorbed");
        }
        return outcome;
    }
    let handles: Vec<u64> = granted.iter().map(|h| h.raw()).collect();
    ctx.record(
        device,
        DeviceRecordKind::CapabilitiesGranted,
        json!({ "handles": handles }),
    );
    ctx.emit(PaiReaction::CapabilitiesGranted {
        device,
        count: granted.len(),
    });
    outcome
}

/// Revoke both actions and mark the device destroyed.
pub(crate) fn apply_shutdown(
    ctx: &mut DeviceCtx,
    world: &mut World,
    device: Entity,
) -> Result<(), CapabilityError> {
    let Some(mut pai) = world.get_mut::<PaiDevice>(device) else {
        tracing::warn!(?device, "Shutdown for an entity without PaiDevice");
        return Ok(());
    };

    let pai = &mut *pai;
    pai.phase = LifecyclePhase::Destroyed;
    pai.searching = false;

    let mut revoked = 0;
    let outcome = revoke_actions(ctx.capabilities.0.as_mut(), device, pai, &mut revoked);

    if revoked == 0 {
        return outcome;
    }
    ctx.record(
        device,
        DeviceRecordKind::CapabilitiesRevoked,
        json!({ "count": revoked }),
    );
    ctx.emit(PaiReaction::CapabilitiesRevoked {
        device,
        count: revoked,
    });
    outcome
}

/// Shut the device down, destroy the chip slot's contents, and despawn it.
pub(crate) fn apply_delete(
    ctx: &mut DeviceCtx,
    world: &mut World,
    device: Entity,
) -> Result<(), CapabilityError> {
    if world.get::<PaiDevice>(device).is_none() {
        tracing::warn!(?device, "Delete for an entity without PaiDevice");
        return Ok(());
    }
    apply_shutdown(ctx, world, device)?;

    let destroyed = containers::teardown(world, device);
    world.despawn(device);
    ctx.record(
        device,
        DeviceRecordKind::Deleted,
        json!({ "contents_destroyed": destroyed }),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bevy_ecs::message::MessageRegistry;

    use super::*;
    use crate::ecs::containers::ContainerManager;
    use crate::ecs::error::DeviceError;
    use crate::ecs::events::ContainerMessage;
    use crate::ecs::pai::controller::handle_device_events;
    use crate::ecs::events::DeviceEvent;
    use crate::ecs::resources::{ActionRegistry, Capabilities, DeviceLog};

    /// Registry that counts grants and revokes through shared state.
    #[derive(Default, Clone)]
    struct CountingRegistry {
        inner: Arc<Mutex<(ActionRegistry, usize, usize)>>,
    }

    impl CapabilityRegistry for CountingRegistry {
        fn grant(&mut self, owner: Entity, template: &ActionProtoId) -> Result<ActionHandle, CapabilityError> {
            let mut guard = self.inner.lock().unwrap();
            guard.1 += 1;
            guard.0.grant(owner, template)
        }

        fn revoke(&mut self, owner: Entity, handle: ActionHandle) -> Result<(), CapabilityError> {
            let mut guard = self.inner.lock().unwrap();
            guard.2 += 1;
            guard.0.revoke(owner, handle)
        }

        fn granted_to(&self, owner: Entity) -> Vec<ActionHandle> {
            self.inner.lock().unwrap().0.granted_to(owner)
        }
    }

    fn setup() -> (World, CountingRegistry) {
        let mut world = World::new();
        MessageRegistry::register_message::<ContainerMessage>(&mut world);
        let registry = CountingRegistry::default();
        world.insert_resource(Capabilities::new(registry.clone()));
        world.insert_resource(DeviceLog::new());
        (world, registry)
    }

    fn run(world: &mut World, events: impl IntoIterator<Item = DeviceEvent>) {
        handle_device_events(world, events).unwrap();
    }

    #[test]
    fn startup_twice_yields_one_slot() {
        let (mut world, _) = setup();
        let device = world.spawn((PaiDevice::default(), ContainerManager::default())).id();

        run(&mut world, [DeviceEvent::Startup { device }]);
        let first = world.get::<PaiDevice>(device).unwrap().chip_slot.unwrap();
        run(&mut world, [DeviceEvent::Startup { device }]);
        let second = world.get::<PaiDevice>(device).unwrap().chip_slot.unwrap();

        assert_eq!(first, second);
        assert_eq!(world.get::<ContainerManager>(device).unwrap().len(), 1);
        assert_eq!(
            world.resource::<DeviceLog>().count(device, DeviceRecordKind::SlotEnsured),
            1
        );
    }

    #[test]
    fn startup_without_container_manager_degrades() {
        let (mut world, _) = setup();
        let device = world.spawn(PaiDevice::default()).id();

        run(&mut world, [DeviceEvent::Startup { device }]);

        let pai = world.get::<PaiDevice>(device).unwrap();
        assert!(pai.chip_slot.is_none());
        assert_eq!(pai.phase, LifecyclePhase::Active);
    }

    #[test]
    fn map_init_grants_once() {
        let (mut world, registry) = setup();
        let device = world.spawn(PaiDevice::default()).id();

        run(&mut world, [DeviceEvent::MapInit { device }, DeviceEvent::MapInit { device }]);

        let pai = world.get::<PaiDevice>(device).unwrap();
        assert!(pai.midi_action.is_some());
        assert!(pai.map_action.is_some());
        assert_eq!(registry.inner.lock().unwrap().1, 2);
        assert_eq!(registry.granted_to(device).len(), 2);
    }

    #[test]
    fn map_init_without_midi_template_grants_map_only() {
        let (mut world, registry) = setup();
        let mut pai = PaiDevice::default();
        pai.midi_action_id = None;
        let device = world.spawn(pai).id();

        run(&mut world, [DeviceEvent::MapInit { device }]);

        let pai = world.get::<PaiDevice>(device).unwrap();
        assert!(pai.midi_action.is_none());
        assert!(pai.map_action.is_some());
        assert_eq!(registry.granted_to(device).len(), 1);
    }

    #[test]
    fn shutdown_revokes_everything_granted() {
        let (mut world, registry) = setup();
        let device = world.spawn((PaiDevice::default(), ContainerManager::default())).id();

        run(
            &mut world,
            [
                DeviceEvent::Startup { device },
                DeviceEvent::MapInit { device },
                DeviceEvent::MapInit { device },
                DeviceEvent::Shutdown { device },
                DeviceEvent::Shutdown { device },
            ],
        );

        let counts = registry.inner.lock().unwrap();
        assert_eq!(counts.1, counts.2, "grants and revokes must balance");
        assert!(counts.0.granted_to(device).is_empty());
        let pai = world.get::<PaiDevice>(device).unwrap();
        assert_eq!(pai.granted_actions(), 0);
        assert_eq!(pai.phase, LifecyclePhase::Destroyed);
    }

    #[test]
    fn shutdown_before_map_init_revokes_nothing() {
        let (mut world, registry) = setup();
        let device = world.spawn(PaiDevice::default()).id();
        run(&mut world, [DeviceEvent::Shutdown { device }]);
        assert_eq!(registry.inner.lock().unwrap().2, 0);
    }

    #[test]
    fn destroyed_device_ignores_map_init() {
        let (mut world, registry) = setup();
        let device = world.spawn(PaiDevice::default()).id();
        run(&mut world, [DeviceEvent::Shutdown { device }, DeviceEvent::MapInit { device }]);
        assert_eq!(registry.inner.lock().unwrap().1, 0);
    }

    #[test]
    fn grant_failure_propagates() {
        let mut world = World::new();
        world.insert_resource(Capabilities::new(ActionRegistry::with_known_templates(Vec::<ActionProtoId>::new())));
        let device = world.spawn(PaiDevice::default()).id();

        let err = handle_device_events(&mut world, [DeviceEvent::MapInit { device }]).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Capability(CapabilityError::UnknownTemplate(_))
        ));
        // Collaborators are back in the world after the failure.
        assert!(world.get_resource::<Capabilities>().is_some());
    }

    /// Registry that grants normally but refuses every revoke.
    #[derive(Default)]
    struct RefusingRevokes(ActionRegistry);

    impl CapabilityRegistry for RefusingRevokes {
        fn grant(&mut self, owner: Entity, template: &ActionProtoId) -> Result<ActionHandle, CapabilityError> {
            self.0.grant(owner, template)
        }

        fn revoke(&mut self, _owner: Entity, handle: ActionHandle) -> Result<(), CapabilityError> {
            Err(CapabilityError::UnknownHandle(handle))
        }

        fn granted_to(&self, owner: Entity) -> Vec<ActionHandle> {
            self.0.granted_to(owner)
        }
    }

    #[test]
    fn partial_grant_is_recorded_before_the_failure() {
        let mut world = World::new();
        let midi = PaiDevice::default().midi_action_id.unwrap();
        world.insert_resource(Capabilities::new(ActionRegistry::with_known_templates([midi])));
        world.insert_resource(DeviceLog::new());
        let device = world.spawn(PaiDevice::default()).id();

        let err = handle_device_events(&mut world, [DeviceEvent::MapInit { device }]).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Capability(CapabilityError::UnknownTemplate(_))
        ));

        let pai = world.get::<PaiDevice>(device).unwrap();
        let midi_handle = pai.midi_action.unwrap();
        assert!(pai.map_action.is_none());
        assert_eq!(
            world.resource::<Capabilities>().0.granted_to(device),
            vec![midi_handle]
        );
        let log = world.resource::<DeviceLog>();
        let grants: Vec<_> = log
            .for_device(device)
            .filter(|r| r.kind == DeviceRecordKind::CapabilitiesGranted)
            .collect();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].data["handles"], serde_json::json!([midi_handle.raw()]));
    }

    #[test]
    fn refused_revoke_keeps_the_handle() {
        let mut world = World::new();
        world.insert_resource(Capabilities::new(RefusingRevokes::default()));
        world.insert_resource(DeviceLog::new());
        let device = world.spawn(PaiDevice::default()).id();
        run(&mut world, [DeviceEvent::MapInit { device }]);

        let err = handle_device_events(&mut world, [DeviceEvent::Shutdown { device }]).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Capability(CapabilityError::UnknownHandle(_))
        ));

        let pai = world.get::<PaiDevice>(device).unwrap();
        assert_eq!(pai.granted_actions(), 2);
        assert_eq!(world.resource::<Capabilities>().0.granted_to(device).len(), 2);
        assert_eq!(
            world.resource::<DeviceLog>().count(device, DeviceRecordKind::CapabilitiesRevoked),
            0
        );
    }

    #[test]
    fn delete_despawns_device_and_chip() {
        let (mut world, registry) = setup();
        let device = world.spawn((PaiDevice::default(), ContainerManager::default())).id();
        run(&mut world, [DeviceEvent::Startup { device }, DeviceEvent::MapInit { device }]);

        let chip = world.spawn_empty().id();
        containers::insert_into(&mut world, device, CHIP_SLOT_ID, chip).unwrap();

        run(&mut world, [DeviceEvent::Delete { device }]);

        assert!(world.get_entity(device).is_err());
        assert!(world.get_entity(chip).is_err());
        assert!(registry.granted_to(device).is_empty());
        assert_eq!(
            world.resource::<DeviceLog>().count(device, DeviceRecordKind::Deleted),
            1
        );
    }
}
