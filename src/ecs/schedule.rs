use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for one device simulation tick.
/// Run manually via `app.world_mut().run_schedule(DeviceTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceTick;

/// Ordered phases within each tick: PreUpdate < Update < Last.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TickPhase {
    PreUpdate,
    Update,
    Last,
}

/// Build a `DeviceTick` schedule with phase ordering and the clock.
pub fn configure_device_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(DeviceTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            TickPhase::PreUpdate,
            TickPhase::Update,
            TickPhase::Last,
        )
            .chain(),
    );
    schedule.add_systems(advance_clock.in_set(TickPhase::Last));
    schedule
}
