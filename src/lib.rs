pub mod ecs;
pub mod flush;
pub mod id;
pub mod model;

pub use id::HandleSeq;
pub use model::{
    ActionProtoId, DeviceSnapshot, LifecyclePhase, LocId, PaiPrototype, SoundPath, ToolQualityId,
};
