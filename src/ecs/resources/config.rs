use bevy_ecs::resource::Resource;

use crate::model::PaiPrototype;

/// App-level configuration: RNG seed and the template new devices are built from.
#[derive(Resource, Debug, Clone)]
pub struct DeviceSimConfig {
    pub seed: u64,
    pub prototype: PaiPrototype,
}

impl Default for DeviceSimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            prototype: PaiPrototype::default(),
        }
    }
}

impl DeviceSimConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}
