#[macro_use]
mod macros;

pub mod keys;
pub mod prototype;
pub mod snapshot;

pub use keys::{ActionProtoId, LocId, SoundPath, ToolQualityId};
pub use prototype::PaiPrototype;
pub use snapshot::{DeviceSnapshot, LifecyclePhase};
