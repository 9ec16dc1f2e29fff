use std::collections::VecDeque;

use bevy_ecs::resource::Resource;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform draws in `[0, 1)` for probabilistic device outcomes.
pub trait RandomSource: Send + Sync {
    fn next_unit(&mut self) -> f32;
}

/// Deterministic RNG seeded from the simulation seed.
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays injected values in order, then keeps returning the last one.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: VecDeque<f32>,
    last: f32,
}

impl FixedSequence {
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            last: 0.0,
        }
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&mut self) -> f32 {
        if let Some(next) = self.values.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// The random source the brick policy draws from.
#[derive(Resource)]
pub struct DeviceRandom(pub Box<dyn RandomSource>);

impl DeviceRandom {
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self(Box::new(source))
    }
}

impl Default for DeviceRandom {
    fn default() -> Self {
        Self::new(SeededRandom::new(0))
    }
}
