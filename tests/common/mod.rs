#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bevy_app::App;
use bevy_ecs::entity::Entity;
use pai_sim::ecs::events::PaiReaction;
use pai_sim::ecs::pai::{ChipSlotChange, ChipSlotHooks, ChipSlotPolicy};
use pai_sim::ecs::resources::{DeviceRandom, FixedSequence, RandomSource};
use pai_sim::ecs::spawn::spawn_pai;
use pai_sim::ecs::test_helpers::tick;
use pai_sim::ecs::{PaiDevice, build_device_app};

/// Random source that replays fixed values and counts how often it was asked.
pub struct CountingRandom {
    inner: FixedSequence,
    draws: Arc<AtomicUsize>,
}

impl RandomSource for CountingRandom {
    fn next_unit(&mut self) -> f32 {
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.inner.next_unit()
    }
}

/// Chip slot policy that records every call it receives.
#[derive(Clone, Default)]
pub struct RecordingPolicy {
    pub calls: Arc<Mutex<Vec<(&'static str, ChipSlotChange)>>>,
}

impl RecordingPolicy {
    pub fn calls(&self) -> Vec<(&'static str, ChipSlotChange)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChipSlotPolicy for RecordingPolicy {
    fn on_inserted(&mut self, change: &ChipSlotChange, _: &mut PaiDevice, _: &mut Vec<PaiReaction>) {
        self.calls.lock().unwrap().push(("inserted", *change));
    }

    fn on_removed(&mut self, change: &ChipSlotChange, _: &mut PaiDevice, _: &mut Vec<PaiReaction>) {
        self.calls.lock().unwrap().push(("removed", *change));
    }
}

/// App whose brick rolls come from `rolls`. Returns the shared draw counter.
pub fn app_with_rolls(rolls: impl IntoIterator<Item = f32>) -> (App, Arc<AtomicUsize>) {
    let mut app = build_device_app(42);
    let draws = Arc::new(AtomicUsize::new(0));
    app.insert_resource(DeviceRandom::new(CountingRandom {
        inner: FixedSequence::new(rolls),
        draws: draws.clone(),
    }));
    (app, draws)
}

pub fn install_recording_policy(app: &mut App) -> RecordingPolicy {
    let policy = RecordingPolicy::default();
    app.insert_resource(ChipSlotHooks::new(policy.clone()));
    policy
}

/// Spawn a device from the configured template and run the tick that starts it up and grants its actions.
pub fn started_device(app: &mut App) -> Entity {
    let device = spawn_pai(app.world_mut(), "pAI");
    tick(app);
    device
}

pub fn popups(reactions: &[PaiReaction]) -> Vec<String> {
    reactions
        .iter()
        .filter_map(|r| match r {
            PaiReaction::Popup { loc_id, .. } => Some(loc_id.to_string()),
            _ => None,
        })
        .collect()
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
