use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};

use super::clock::DeviceClock;
use super::containers::ContainerIds;
use super::events::{ContainerMessage, DeviceEvent, PaiReaction};
use super::pai::PaiPlugin;
use super::pai::hooks::ChipSlotHooks;
use super::resources::{
    Capabilities, DeviceLog, DeviceRandom, DeviceSimConfig, ReactionFeed, SeededRandom,
};
use super::schedule::{TickPhase, configure_device_schedule};

/// Build a headless app hosting pAI devices, seeded for the brick roll.
///
/// Ticks are driven manually:
/// ```no_run
/// # use pai_sim::ecs::{build_device_app, DeviceTick};
/// let mut app = build_device_app(42);
/// app.world_mut().run_schedule(DeviceTick);
/// ```
pub fn build_device_app(seed: u64) -> App {
    build_device_app_with(DeviceSimConfig::seeded(seed), ExecutorKind::SingleThreaded)
}

/// Build the app from an explicit config and executor.
///
/// Collaborator resources (`Capabilities`, `DeviceRandom`, `ChipSlotHooks`)
/// are installed with their defaults and may be replaced before the first tick.
pub fn build_device_app_with(config: DeviceSimConfig, executor: ExecutorKind) -> App {
    let mut app = App::empty();

    // Core resources
    app.insert_resource(DeviceClock::new());
    app.insert_resource(DeviceLog::new());
    app.insert_resource(ReactionFeed::default());
    app.insert_resource(ContainerIds::default());

    // Collaborators
    app.insert_resource(Capabilities::default());
    app.insert_resource(DeviceRandom::new(SeededRandom::new(config.seed)));
    app.insert_resource(ChipSlotHooks::default());
    app.insert_resource(config);

    // Register message types
    MessageRegistry::register_message::<DeviceEvent>(app.world_mut());
    MessageRegistry::register_message::<ContainerMessage>(app.world_mut());
    MessageRegistry::register_message::<PaiReaction>(app.world_mut());

    let mut schedule = configure_device_schedule(executor);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(TickPhase::PreUpdate));
    app.add_schedule(schedule);
    app.add_plugins(PaiPlugin);
    app
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::ecs::schedule::DeviceTick;

    #[test]
    fn app_builds_and_ticks() {
        let mut app = build_device_app(42);
        app.world_mut().run_schedule(DeviceTick);
        app.world_mut().run_schedule(DeviceTick);
        assert_eq!(app.world().resource::<DeviceClock>().tick, 2);
    }

    #[test]
    fn config_is_installed() {
        let app = build_device_app(7);
        assert_eq!(app.world().resource::<DeviceSimConfig>().seed, 7);
    }

    #[test]
    fn phase_ordering_respected() {
        let log = Arc::new(Mutex::new(Vec::<&'static str>::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());

        let mut app = build_device_app(42);
        app.add_systems(DeviceTick, (move || l1.lock().unwrap().push("pre")).in_set(TickPhase::PreUpdate));
        app.add_systems(DeviceTick, (move || l2.lock().unwrap().push("update")).in_set(TickPhase::Update));
        app.add_systems(DeviceTick, (move || l3.lock().unwrap().push("last")).in_set(TickPhase::Last));

        app.world_mut().run_schedule(DeviceTick);

        let entries = log.lock().unwrap();
        let idx = |name| entries.iter().position(|&s| s == name).unwrap();
        assert!(idx("pre") < idx("update"));
        assert!(idx("update") < idx("last"));
    }
}
