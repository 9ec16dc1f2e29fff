pub mod app;
pub mod clock;
pub mod components;
pub mod containers;
pub mod error;
pub mod events;
pub mod pai;
pub mod relationships;
pub mod resources;
pub mod schedule;
pub mod spawn;
pub mod test_helpers;

pub use app::{build_device_app, build_device_app_with};
pub use clock::DeviceClock;
pub use components::{AiChip, CHIP_SLOT_ID, Named, PaiDevice, ToolQualities};
pub use containers::{ContainerId, ContainerManager};
pub use error::{CapabilityError, ContainerError, DeviceError};
pub use events::{ContainerMessage, DeviceEvent, PaiReaction};
pub use pai::{
    ChipAudioPolicy, ChipSlotChange, ChipSlotHooks, ChipSlotPolicy, NoopChipPolicy, PaiPlugin,
    device_snapshot, snapshot_all, try_extract_chip, try_insert_chip,
};
pub use relationships::{InhabitedBy, Inhabits};
pub use resources::{
    ActionHandle, ActionRegistry, Capabilities, CapabilityRegistry, DeviceLog, DeviceRandom,
    DeviceRecordKind, DeviceSimConfig, FixedSequence, RandomSource, ReactionFeed, SeededRandom,
};
pub use schedule::{DeviceTick, TickPhase, configure_device_schedule};
