use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

/// Tick counter stamped onto device log records.
///
/// The `advance_clock` system bumps it at the end of each tick (in
/// `TickPhase::Last`), so handlers see the tick they are running in.
#[derive(Resource, Debug, Default)]
pub struct DeviceClock {
    pub tick: u64,
}

impl DeviceClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }
}

pub fn advance_clock(mut clock: ResMut<DeviceClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero_and_counts_ticks() {
        let mut clock = DeviceClock::new();
        assert_eq!(clock.tick, 0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.tick, 2);
    }
}
