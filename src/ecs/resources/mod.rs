pub mod capabilities;
pub mod config;
pub mod device_log;
pub mod feed;
pub mod random;

pub use capabilities::{ActionHandle, ActionRegistry, Capabilities, CapabilityRegistry};
pub use config::DeviceSimConfig;
pub use device_log::{DeviceLog, DeviceRecord, DeviceRecordKind};
pub use feed::{ReactionFeed, collect_reactions};
pub use random::{DeviceRandom, FixedSequence, RandomSource, SeededRandom};
