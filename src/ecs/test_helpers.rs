use bevy_app::App;

use crate::ecs::events::{DeviceEvent, PaiReaction};
use crate::ecs::resources::ReactionFeed;
use crate::ecs::schedule::DeviceTick;
use crate::ecs::spawn::write_device_event;

/// Run one `DeviceTick`.
pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(DeviceTick);
}

/// Queue `event` and run one tick.
pub fn send(app: &mut App, event: DeviceEvent) {
    write_device_event(app.world_mut(), event);
    tick(app);
}

/// Drain everything the presentation layer has been sent so far.
pub fn take_reactions(app: &mut App) -> Vec<PaiReaction> {
    app.world_mut().resource_mut::<ReactionFeed>().drain()
}
